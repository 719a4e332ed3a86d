use std::time::Instant;

use crate::errors::ActionError;
use crate::port::{ActionPort, KeyEventKind};
use crate::primitives::check_preconditions;
use crate::types::{ActionOptions, DispatchReport};

/// Dispatches a bubbling Enter keypress on `node`.
///
/// 1. Check preconditions.
/// 2. `preActionDelay`.
/// 3. `keydown` then `keyup` for `"Enter"`.
/// 4. `postActionDelay`.
pub async fn execute_press_enter<P: ActionPort + ?Sized>(
    port: &P,
    node: &str,
    options: &ActionOptions,
) -> Result<DispatchReport, ActionError> {
    let start = Instant::now();

    check_preconditions(port, node, options).await?;

    sleep_ms(options.pre_action_delay_ms).await;

    port.dispatch_key_event(node, "Enter", KeyEventKind::KeyDown)
        .await?;
    port.dispatch_key_event(node, "Enter", KeyEventKind::KeyUp)
        .await?;

    sleep_ms(options.post_action_delay_ms).await;

    Ok(DispatchReport::ok(start.elapsed().as_millis() as u64))
}

async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeActionPort;

    #[tokio::test]
    async fn press_enter_dispatches_keydown_then_keyup() {
        let port = FakeActionPort::new();
        port.register("input", true, true, false);
        let options = ActionOptions::default();

        execute_press_enter(&port, "input", &options).await.unwrap();
        assert_eq!(port.events_of("input"), vec!["keydown", "keyup"]);
    }

    #[tokio::test]
    async fn press_enter_on_detached_element_fails_precondition() {
        let port = FakeActionPort::new();
        let options = ActionOptions::default();

        let err = execute_press_enter(&port, "ghost", &options).await.unwrap_err();
        assert!(matches!(err, ActionError::ElementNotActionable { .. }));
    }
}
