//! DOM traversal seam: iframe chain discovery, shadow-root piercing, and
//! chain-based xpath resolution.
//!
//! [`DomPort`] is the trait boundary a real content script implements in
//! production; [`memory::InMemoryDom`] is the test double the rest of this
//! workspace's unit tests build a page out of by hand.

mod errors;
mod memory;
mod port;

pub use errors::TraversalError;
pub use memory::{InMemoryDom, InMemoryDomBuilder, NodeSpec};
pub use port::{DomPort, IframeRecord, NodeRef};

/// Recursion depth defended against cycles in iframe discovery (§4.1).
pub const DEFAULT_MAX_IFRAME_DEPTH: usize = 10;
