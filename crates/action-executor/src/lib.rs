//! Action Executor: turns a resolved element plus an abstract action into
//! DOM events a live page will accept as human input.

mod errors;
mod executor;
mod port;
mod primitives;
mod types;

pub use errors::ActionError;
pub use executor::{ActionExecutor, Action, DefaultActionExecutor};
pub use port::{ActionPort, KeyEventKind, MouseEventKind};
pub use types::{ActionOptions, DispatchReport, ScrollBehavior, ScrollBlock};

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
