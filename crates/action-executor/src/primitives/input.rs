use std::time::Instant;

use crate::errors::ActionError;
use crate::port::{ActionPort, KeyEventKind};
use crate::primitives::check_preconditions;
use crate::types::{ActionOptions, DispatchReport};

/// Sets `node`'s value to `value`.
///
/// 1. Check preconditions.
/// 2. Optionally scroll into view and wait for animations.
/// 3. `focusBeforeAction`: focus the node first.
/// 4. `preActionDelay`.
/// 5. `keystrokeDelay == 0`: set the value via the native setter in one
///    shot (`reactSafeInput`'s fast path). `keystrokeDelay > 0`: dispatch
///    one `keydown`/`keypress`/`keyup` triple per character, each
///    separated by `keystrokeDelay`, accumulating the value through the
///    native setter after every character so framework-bound inputs see
///    the same mutation sequence a real typist produces.
/// 6. `postActionDelay`.
pub async fn execute_input<P: ActionPort + ?Sized>(
    port: &P,
    node: &str,
    value: &str,
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
    if options.focus_before_action {
        port.focus(node).await?;
    }

    sleep_ms(options.pre_action_delay_ms).await;

    if options.keystroke_delay_ms == 0 {
        port.set_value_native(node, value).await?;
    } else {
        let mut typed = String::new();
        for ch in value.chars() {
            typed.push(ch);
            port.dispatch_key_event(node, &ch.to_string(), KeyEventKind::KeyDown)
                .await?;
            port.dispatch_key_event(node, &ch.to_string(), KeyEventKind::KeyPress)
                .await?;
            port.set_value_native(node, &typed).await?;
            port.dispatch_key_event(node, &ch.to_string(), KeyEventKind::KeyUp)
                .await?;
            sleep_ms(options.keystroke_delay_ms).await;
        }
        if value.is_empty() {
            port.set_value_native(node, value).await?;
        }
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
    async fn native_path_sets_value_in_one_shot() {
        let port = FakeActionPort::new();
        port.register("input", true, true, false);
        let options = ActionOptions {
            wait_for_animations: false,
            scroll_into_view: false,
            ..Default::default()
        };

        execute_input(&port, "input", "hello", &options).await.unwrap();
        assert_eq!(port.value_of("input").await, Some("hello".to_string()));
        assert_eq!(port.events_of("input"), Vec::<String>::new());
    }

    #[tokio::test]
    async fn keystroke_path_dispatches_per_character_events() {
        let port = FakeActionPort::new();
        port.register("input", true, true, false);
        let options = ActionOptions {
            wait_for_animations: false,
            scroll_into_view: false,
            keystroke_delay_ms: 1,
            ..Default::default()
        };

        execute_input(&port, "input", "ab", &options).await.unwrap();
        assert_eq!(port.value_of("input").await, Some("ab".to_string()));
        assert_eq!(
            port.events_of("input"),
            vec!["keydown", "keypress", "keyup", "keydown", "keypress", "keyup"]
        );
    }

    #[tokio::test]
    async fn input_on_disabled_element_fails_precondition() {
        let port = FakeActionPort::new();
        port.register("input", true, true, true);
        let options = ActionOptions::default();

        let err = execute_input(&port, "input", "x", &options).await.unwrap_err();
        assert!(matches!(err, ActionError::ElementNotActionable { .. }));
    }
}
