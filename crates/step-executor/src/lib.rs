//! Step Executor: binds one recorded step to a locator bundle, injected
//! CSV values, and the finder/action-executor seams, reporting a single
//! `StepExecutionResult` (§4.4).

mod errors;
mod executor;
mod value_resolution;

pub use errors::StepExecutorError;
pub use executor::{DefaultStepExecutor, StepExecutionContext, StepExecutor, StepExecutorOptions};
pub use value_resolution::resolve_value;
