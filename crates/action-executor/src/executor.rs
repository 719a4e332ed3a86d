use async_trait::async_trait;

use crate::errors::ActionError;
use crate::port::ActionPort;
use crate::primitives::{execute_click, execute_input, execute_press_enter};
use crate::types::{ActionOptions, DispatchReport};

/// The three DOM-event actions a recorded step can replay (§4.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Click,
    Input(String),
    PressEnter,
}

#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(
        &self,
        node: &str,
        action: &Action,
        options: &ActionOptions,
    ) -> Result<DispatchReport, ActionError>;
}

/// Dispatches each [`Action`] to its primitive over a shared [`ActionPort`].
pub struct DefaultActionExecutor<P: ActionPort> {
    port: P,
}

impl<P: ActionPort> DefaultActionExecutor<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}

#[async_trait]
impl<P: ActionPort> ActionExecutor for DefaultActionExecutor<P> {
    async fn execute(
        &self,
        node: &str,
        action: &Action,
        options: &ActionOptions,
    ) -> Result<DispatchReport, ActionError> {
        match action {
            Action::Click => execute_click(&self.port, node, options).await,
            Action::Input(value) => execute_input(&self.port, node, value, options).await,
            Action::PressEnter => execute_press_enter(&self.port, node, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeActionPort;

    #[tokio::test]
    async fn dispatches_click_action() {
        let port = FakeActionPort::new();
        port.register("btn", true, true, false);
        let executor = DefaultActionExecutor::new(port);
        let options = ActionOptions {
            wait_for_animations: false,
            scroll_into_view: false,
            ..Default::default()
        };

        let report = executor.execute("btn", &Action::Click, &options).await.unwrap();
        assert!(report.success);
    }

    #[tokio::test]
    async fn dispatches_input_action_and_sets_value() {
        let port = FakeActionPort::new();
        port.register("field", true, true, false);
        let executor = DefaultActionExecutor::new(port);
        let options = ActionOptions {
            wait_for_animations: false,
            scroll_into_view: false,
            ..Default::default()
        };

        executor
            .execute("field", &Action::Input("hi".into()), &options)
            .await
            .unwrap();
        assert_eq!(
            executor.port().value_of("field").await,
            Some("hi".to_string())
        );
    }
}
