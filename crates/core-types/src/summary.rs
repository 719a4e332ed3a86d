use crate::result::StepExecutionResult;

/// Emitted once per run when the engine reaches a terminal lifecycle state.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct ExecutionSummary {
    pub total_steps: usize,
    pub passed_steps: usize,
    pub failed_steps: usize,
    pub skipped_steps: usize,
    pub duration_ms: u64,
    pub results: Vec<StepExecutionResult>,
}

impl ExecutionSummary {
    pub fn success(&self) -> bool {
        self.failed_steps == 0
    }
}

/// `{currentStep, totalSteps, percentage, passed, failed, elapsedMs, etaMs?}` (§4.5).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct Progress {
    pub current_step: usize,
    pub total_steps: usize,
    pub percentage: u8,
    pub passed: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
    pub eta_ms: Option<u64>,
}

impl Progress {
    pub fn compute(
        current_step: usize,
        total_steps: usize,
        passed: usize,
        failed: usize,
        skipped: usize,
        elapsed_ms: u64,
        completed_step_durations_ms: &[u64],
    ) -> Self {
        let done = passed + failed + skipped;
        let percentage = if total_steps == 0 {
            100
        } else {
            ((100 * done) as f64 / total_steps as f64).round() as u8
        };
        let eta_ms = if completed_step_durations_ms.is_empty() || done >= total_steps {
            None
        } else {
            let avg = completed_step_durations_ms.iter().sum::<u64>()
                / completed_step_durations_ms.len() as u64;
            Some(avg * (total_steps - done) as u64)
        };
        Self {
            current_step,
            total_steps,
            percentage,
            passed,
            failed,
            elapsed_ms,
            eta_ms,
        }
    }
}

/// Per-row outcome aggregated by the session driver (§4.6).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct RowExecutionResult {
    pub row_index: usize,
    pub row_data: Vec<(String, String)>,
    pub skipped: bool,
    pub success: bool,
    pub passed: usize,
    pub failed: usize,
    pub skipped_steps: usize,
    pub duration_ms: u64,
    pub step_results: Vec<StepExecutionResult>,
    pub error: Option<String>,
}

/// Aggregate summary over every row a session executed.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub total_rows: usize,
    pub row_results: Vec<RowExecutionResult>,
    pub duration_ms: u64,
}

impl SessionSummary {
    pub fn success(&self) -> bool {
        self.row_results.iter().all(|r| r.skipped || r.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percentage_reaches_100_when_all_steps_resolved() {
        let p = Progress::compute(5, 5, 4, 1, 0, 1000, &[100, 100, 100, 100]);
        assert_eq!(p.percentage, 100);
        assert!(p.eta_ms.is_none());
    }

    #[test]
    fn progress_eta_extrapolates_average_duration() {
        let p = Progress::compute(2, 4, 2, 0, 0, 200, &[100, 100]);
        assert_eq!(p.eta_ms, Some(200));
    }

    #[test]
    fn progress_eta_absent_before_any_step_completes() {
        let p = Progress::compute(0, 4, 0, 0, 0, 0, &[]);
        assert!(p.eta_ms.is_none());
    }
}
