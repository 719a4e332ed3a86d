#![allow(dead_code)]

//! Shared data model for the replay core.
//!
//! Every other crate in this workspace builds on the types defined here:
//! the immutable [`LocatorBundle`] a recorder hands to replay, the [`Step`]
//! that wraps one recorded interaction, and the lifecycle state records
//! the engine and session stamp as they run.

mod bundle;
mod error;
mod result;
mod state;
mod step;
mod summary;

pub use bundle::{BoundingBox, IframeInfo, LocatorBundle, LocatorBundleBuilder, TEXT_CAP_CODEPOINTS};
pub use error::CoreError;
pub use result::{StepExecutionResult, ValueSource};
pub use state::{Lifecycle, ReplayEngineState, ReplaySessionState};
pub use step::{Step, StepEvent, StepStatus};
pub use summary::{ExecutionSummary, Progress, RowExecutionResult, SessionSummary};
