use async_trait::async_trait;
use core_types::BoundingBox;

use crate::errors::ActionError;
use crate::types::{ScrollBehavior, ScrollBlock};

pub type NodeRef = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    MouseDown,
    MouseUp,
    Click,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyPress,
    KeyUp,
}

/// The seam between the action executor and a live element. A production
/// implementation resolves the native value setter on the element's
/// prototype and dispatches real, trusted-adjacent DOM events; the `fake`
/// module's double records what was dispatched for test assertions.
#[async_trait]
pub trait ActionPort: Send + Sync {
    async fn is_attached(&self, node: &str) -> bool;
    async fn is_visible(&self, node: &str) -> bool;
    async fn is_disabled(&self, node: &str) -> bool;
    async fn bounding_of(&self, node: &str) -> Option<BoundingBox>;

    async fn scroll_into_view(
        &self,
        node: &str,
        block: ScrollBlock,
        behavior: ScrollBehavior,
    ) -> Result<(), ActionError>;

    async fn wait_animations_settled(
        &self,
        node: &str,
        timeout_ms: u64,
    ) -> Result<(), ActionError>;

    async fn highlight(&self, node: &str, duration_ms: u64);

    async fn focus(&self, node: &str) -> Result<(), ActionError>;

    async fn dispatch_mouse_event(
        &self,
        node: &str,
        kind: MouseEventKind,
    ) -> Result<(), ActionError>;

    async fn dispatch_key_event(
        &self,
        node: &str,
        key: &str,
        kind: KeyEventKind,
    ) -> Result<(), ActionError>;

    /// Resolves the element's native value setter (bypassing any
    /// framework override on the prototype), invokes it, then dispatches
    /// `input` (bubbles) followed by `change`.
    async fn set_value_native(&self, node: &str, value: &str) -> Result<(), ActionError>;

    async fn value_of(&self, node: &str) -> Option<String>;
}
