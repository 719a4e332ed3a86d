//! An in-memory [`ActionPort`] double for exercising the action primitives
//! and any downstream code built against this crate without a real page.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use core_types::BoundingBox;

use crate::errors::ActionError;
use crate::port::{ActionPort, KeyEventKind, MouseEventKind};
use crate::types::{ScrollBehavior, ScrollBlock};

#[derive(Clone, Debug, Default)]
struct NodeState {
    attached: bool,
    visible: bool,
    disabled: bool,
    value: Option<String>,
    events: Vec<String>,
}

/// Test double standing in for a live page. Every method records what
/// happened on the node so tests can assert on dispatch order.
pub struct FakeActionPort {
    nodes: Mutex<HashMap<String, NodeState>>,
}

impl FakeActionPort {
    pub fn new() -> Self {
        Self {
            nodes: Mutex::new(HashMap::new()),
        }
    }

    pub fn register(&self, node: &str, attached: bool, visible: bool, disabled: bool) {
        self.nodes.lock().unwrap().insert(
            node.to_string(),
            NodeState {
                attached,
                visible,
                disabled,
                value: None,
                events: Vec::new(),
            },
        );
    }

    pub fn events_of(&self, node: &str) -> Vec<String> {
        self.nodes
            .lock()
            .unwrap()
            .get(node)
            .map(|s| s.events.clone())
            .unwrap_or_default()
    }

    fn with_node<T>(&self, node: &str, f: impl FnOnce(&mut NodeState) -> T) -> Option<T> {
        let mut nodes = self.nodes.lock().unwrap();
        nodes.get_mut(node).map(f)
    }
}

impl Default for FakeActionPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionPort for FakeActionPort {
    async fn is_attached(&self, node: &str) -> bool {
        self.with_node(node, |s| s.attached).unwrap_or(false)
    }

    async fn is_visible(&self, node: &str) -> bool {
        self.with_node(node, |s| s.visible).unwrap_or(false)
    }

    async fn is_disabled(&self, node: &str) -> bool {
        self.with_node(node, |s| s.disabled).unwrap_or(false)
    }

    async fn bounding_of(&self, _node: &str) -> Option<BoundingBox> {
        None
    }

    async fn scroll_into_view(
        &self,
        node: &str,
        _block: ScrollBlock,
        _behavior: ScrollBehavior,
    ) -> Result<(), ActionError> {
        self.with_node(node, |s| s.events.push("scroll".into()));
        Ok(())
    }

    async fn wait_animations_settled(
        &self,
        _node: &str,
        _timeout_ms: u64,
    ) -> Result<(), ActionError> {
        Ok(())
    }

    async fn highlight(&self, node: &str, _duration_ms: u64) {
        self.with_node(node, |s| s.events.push("highlight".into()));
    }

    async fn focus(&self, node: &str) -> Result<(), ActionError> {
        self.with_node(node, |s| s.events.push("focus".into()));
        Ok(())
    }

    async fn dispatch_mouse_event(
        &self,
        node: &str,
        kind: MouseEventKind,
    ) -> Result<(), ActionError> {
        let label = match kind {
            MouseEventKind::MouseDown => "mousedown",
            MouseEventKind::MouseUp => "mouseup",
            MouseEventKind::Click => "click",
        };
        match self.with_node(node, |s| s.events.push(label.into())) {
            Some(()) => Ok(()),
            None => Err(ActionError::ElementNotActionable {
                reason: format!("unknown node '{node}'"),
            }),
        }
    }

    async fn dispatch_key_event(
        &self,
        node: &str,
        _key: &str,
        kind: KeyEventKind,
    ) -> Result<(), ActionError> {
        let label = match kind {
            KeyEventKind::KeyDown => "keydown",
            KeyEventKind::KeyPress => "keypress",
            KeyEventKind::KeyUp => "keyup",
        };
        match self.with_node(node, |s| s.events.push(label.into())) {
            Some(()) => Ok(()),
            None => Err(ActionError::ElementNotActionable {
                reason: format!("unknown node '{node}'"),
            }),
        }
    }

    async fn set_value_native(&self, node: &str, value: &str) -> Result<(), ActionError> {
        match self.with_node(node, |s| s.value = Some(value.to_string())) {
            Some(()) => Ok(()),
            None => Err(ActionError::ElementNotActionable {
                reason: format!("unknown node '{node}'"),
            }),
        }
    }

    async fn value_of(&self, node: &str) -> Option<String> {
        self.with_node(node, |s| s.value.clone()).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unregistered_node_reports_not_attached() {
        let port = FakeActionPort::new();
        assert!(!port.is_attached("ghost").await);
    }

    #[tokio::test]
    async fn set_value_native_round_trips() {
        let port = FakeActionPort::new();
        port.register("field", true, true, false);
        port.set_value_native("field", "abc").await.unwrap();
        assert_eq!(port.value_of("field").await, Some("abc".to_string()));
    }
}
