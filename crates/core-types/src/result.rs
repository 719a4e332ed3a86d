use crate::step::StepStatus;

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSource {
    Recorded,
    CsvDirect,
    CsvMapped,
    None,
}

/// Outcome of running one step through the step executor (§4.4).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct StepExecutionResult {
    pub step_id: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    pub locator_strategy: Option<String>,
    pub locator_confidence: Option<f64>,
    pub retry_attempts: u32,
    pub used_value: Option<String>,
    pub value_source: Option<ValueSource>,
    pub error: Option<String>,
}

impl StepExecutionResult {
    pub fn duration_is_consistent(&self) -> bool {
        self.start_time_ms <= self.end_time_ms
            && self.duration_ms == (self.end_time_ms - self.start_time_ms) as u64
    }
}
