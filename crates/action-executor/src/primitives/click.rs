use std::time::Instant;

use rand::Rng;

use crate::errors::ActionError;
use crate::port::{ActionPort, MouseEventKind};
use crate::primitives::check_preconditions;
use crate::types::{ActionOptions, DispatchReport};

/// Synthesises a click on `node`.
///
/// 1. Check preconditions (attached, enabled, visible-or-allowed).
/// 2. Optionally scroll into view and wait for animations to settle.
/// 3. Optionally highlight for `highlightDuration`.
/// 4. `preActionDelay`.
/// 5. `humanLike`: dispatch `mousedown`, jitter, `mouseup`, `click`;
///    otherwise dispatch `click` alone.
/// 6. `postActionDelay`.
pub async fn execute_click<P: ActionPort + ?Sized>(
    port: &P,
    node: &str,
    options: &ActionOptions,
) -> Result<DispatchReport, ActionError> {
    let start = Instant::now();

    check_preconditions(port, node, options).await?;

    if options.scroll_into_view {
        port.scroll_into_view(node, options.scroll_block, options.scroll_behavior)
            .await?;
    }
    if options.wait_for_animations {
        port.wait_animations_settled(node, options.animation_timeout_ms)
            .await?;
    }
    if options.highlight_elements {
        port.highlight(node, options.highlight_duration_ms).await;
    }

    sleep_ms(options.pre_action_delay_ms).await;

    if options.human_like_mouse {
        port.dispatch_mouse_event(node, MouseEventKind::MouseDown).await?;
        let jitter_ms = rand::thread_rng().gen_range(10..40);
        sleep_ms(jitter_ms).await;
        port.dispatch_mouse_event(node, MouseEventKind::MouseUp).await?;
        port.dispatch_mouse_event(node, MouseEventKind::Click).await?;
    } else {
        port.dispatch_mouse_event(node, MouseEventKind::Click).await?;
    }

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
    async fn human_like_click_dispatches_mousedown_before_click() {
        let port = FakeActionPort::new();
        port.register("btn", true, true, false);
        let options = ActionOptions {
            wait_for_animations: false,
            scroll_into_view: false,
            ..Default::default()
        };

        execute_click(&port, "btn", &options).await.unwrap();
        let events = port.events_of("btn");
        assert_eq!(events, vec!["mousedown", "mouseup", "click"]);
    }

    #[tokio::test]
    async fn non_human_like_click_dispatches_click_alone() {
        let port = FakeActionPort::new();
        port.register("btn", true, true, false);
        let options = ActionOptions {
            human_like_mouse: false,
            wait_for_animations: false,
            scroll_into_view: false,
            ..Default::default()
        };

        execute_click(&port, "btn", &options).await.unwrap();
        assert_eq!(port.events_of("btn"), vec!["click"]);
    }

    #[tokio::test]
    async fn click_on_disabled_element_fails_precondition() {
        let port = FakeActionPort::new();
        port.register("btn", true, true, true);
        let options = ActionOptions::default();

        let err = execute_click(&port, "btn", &options).await.unwrap_err();
        assert!(matches!(err, ActionError::ElementNotActionable { .. }));
    }
}
