mod click;
mod input;
mod press_enter;

pub use click::execute_click;
pub use input::execute_input;
pub use press_enter::execute_press_enter;

use crate::errors::ActionError;
use crate::port::ActionPort;
use crate::types::ActionOptions;

/// Preconditions shared by every action primitive: attached, visible (or
/// optionally temporarily un-hidden), and not disabled (§4.3).
pub(crate) async fn check_preconditions<P: ActionPort + ?Sized>(
    port: &P,
    node: &str,
    options: &ActionOptions,
) -> Result<(), ActionError> {
    if !options.verify_actionable {
        return Ok(());
    }
    if !port.is_attached(node).await {
        return Err(ActionError::ElementNotActionable {
            reason: "element is not attached to the document".into(),
        });
    }
    if port.is_disabled(node).await {
        return Err(ActionError::ElementNotActionable {
            reason: "element is disabled".into(),
        });
    }
    if !port.is_visible(node).await && !options.show_hidden_elements {
        return Err(ActionError::ElementNotActionable {
            reason: "element is not visible and showHiddenElements is false".into(),
        });
    }
    Ok(())
}
