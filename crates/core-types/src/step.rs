use crate::bundle::LocatorBundle;
use crate::error::CoreError;

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    Click,
    Input,
    Enter,
    Open,
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// One recorded user interaction; the atomic unit of replay.
///
/// A Step owns its bundle. `status`/`duration_ms`/`error_message` start
/// unset and are populated only after replay — a Step never mutates its
/// recorded fields once constructed.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub id: String,
    pub event: StepEvent,
    pub label: String,
    pub value: Option<String>,
    pub path: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub bundle: Option<LocatorBundle>,
    pub status: Option<StepStatus>,
    pub duration_ms: Option<u64>,
    pub error_message: Option<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, event: StepEvent, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event,
            label: label.into(),
            value: None,
            path: None,
            x: None,
            y: None,
            bundle: None,
            status: None,
            duration_ms: None,
            error_message: None,
        }
    }

    pub fn with_bundle(mut self, bundle: LocatorBundle) -> Self {
        self.path = self.path.or_else(|| bundle.xpath.clone());
        self.bundle = Some(bundle);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Validates the invariant from §3: every event except `open` must
    /// carry a bundle or a usable path.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.event != StepEvent::Open && self.bundle.is_none() && self.path.is_none() {
            return Err(CoreError::invalid_field(
                "bundle",
                "non-open steps require a locator bundle or a usable path",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_step_needs_no_bundle() {
        let step = Step::new("s1", StepEvent::Open, "Navigate").with_value("https://example.com");
        assert!(step.validate().is_ok());
    }

    #[test]
    fn click_step_requires_bundle_or_path() {
        let step = Step::new("s1", StepEvent::Click, "Submit");
        assert!(step.validate().is_err());

        let step = step.with_path("//button[@id='submit']");
        assert!(step.validate().is_ok());
    }
}
