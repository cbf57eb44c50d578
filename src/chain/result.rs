use serde::Serialize;

use crate::assertions::AssertionOutcome;
use crate::error::{ExtractionError, StepError};
use crate::http::response::ResponseView;

/// Everything recorded about one executed step. The response, when present,
/// is owned by this record; cross-step comparisons go through the context,
/// never through another step's result.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub name: String,
    pub response: Option<ResponseView>,
    pub error: Option<StepError>,
    pub outcomes: Vec<AssertionOutcome>,
    /// Extraction failures are reported here rather than failing the step:
    /// a later step that needed the value surfaces the gap as an unresolved
    /// reference of its own.
    pub extraction_errors: Vec<ExtractionError>,
    pub duration_ms: u128,
}

impl StepResult {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.outcomes.iter().all(AssertionOutcome::passed)
    }
}

/// Ordered step results for one chain run. The chain verdict is the
/// conjunction of every assertion outcome across every step.
#[derive(Debug, Clone, Serialize)]
pub struct ChainResult {
    pub name: String,
    pub steps: Vec<StepResult>,
}

impl ChainResult {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(StepResult::passed)
    }

    pub fn assertion_count(&self) -> usize {
        self.steps.iter().map(|step| step.outcomes.len()).sum()
    }

    pub fn assertions_passed(&self) -> usize {
        self.steps
            .iter()
            .flat_map(|step| &step.outcomes)
            .filter(|outcome| outcome.passed())
            .count()
    }

    pub fn duration_ms(&self) -> u128 {
        self.steps.iter().map(|step| step.duration_ms).sum()
    }
}
