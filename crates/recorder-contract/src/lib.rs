//! Contract between the recorder (not reimplemented here, §4.7) and the
//! replay core: the `RecordedEvent` stream a capture layer must produce so
//! the core can build `Step` sequences from it.

mod errors;
mod events;
mod recorder;

pub use errors::RecorderError;
pub use events::{DebounceConfig, IgnoreRule, RecordedEvent, RecorderEventKind};
pub use recorder::{NullRecorder, Recorder, RecorderEventBus};
