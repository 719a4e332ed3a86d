#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBlock {
    Center,
    Start,
    End,
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

/// Options governing one dispatched action (§4.3, §6 `behavior`/`visual`
/// config groups).
#[derive(Clone, Debug)]
pub struct ActionOptions {
    pub scroll_into_view: bool,
    pub scroll_behavior: ScrollBehavior,
    pub scroll_block: ScrollBlock,
    pub human_like_mouse: bool,
    pub react_safe_input: bool,
    pub keystroke_delay_ms: u64,
    pub focus_before_action: bool,
    pub wait_for_animations: bool,
    pub animation_timeout_ms: u64,
    pub show_hidden_elements: bool,
    pub verify_actionable: bool,
    pub highlight_elements: bool,
    pub highlight_duration_ms: u64,
    pub pre_action_delay_ms: u64,
    pub post_action_delay_ms: u64,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            scroll_into_view: true,
            scroll_behavior: ScrollBehavior::Smooth,
            scroll_block: ScrollBlock::Center,
            human_like_mouse: true,
            react_safe_input: true,
            keystroke_delay_ms: 0,
            focus_before_action: true,
            wait_for_animations: true,
            animation_timeout_ms: 500,
            show_hidden_elements: true,
            verify_actionable: true,
            highlight_elements: false,
            highlight_duration_ms: 200,
            pre_action_delay_ms: 0,
            post_action_delay_ms: 0,
        }
    }
}

/// `{success, error?, duration}` returned by every action primitive (§4.3).
#[derive(Clone, Debug)]
pub struct DispatchReport {
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl DispatchReport {
    pub fn ok(duration_ms: u64) -> Self {
        Self {
            success: true,
            error: None,
            duration_ms,
        }
    }

    pub fn failed(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            duration_ms,
        }
    }
}
