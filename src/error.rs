//! # Error Taxonomy
//!
//! Step-level failures are captured in the owning `StepResult` and never
//! propagate out of a chain run. `ChainError` is the one exception: it marks
//! a malformed chain definition, which is a programmer error.

use serde::Serialize;
use thiserror::Error;

/// Failure that prevents a step from producing an inspectable response.
///
/// A step that hits one of these still appears in the chain result, with all
/// of its assertions marked as failed preconditions, and the chain moves on
/// to the next step.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum StepError {
    #[error("template references missing context key `{key}`")]
    UnresolvedReference { key: String },
    #[error("unterminated placeholder in template `{template}`")]
    UnterminatedPlaceholder { template: String },
    #[error("transport unavailable: {reason}")]
    TransportUnavailable { reason: String },
    #[error("transport timed out after {millis}ms")]
    TransportTimeout { millis: u64 },
}

/// A post-response value extraction that could not be applied.
///
/// Recorded on the step that declared it; non-fatal to the chain. Later steps
/// that reference the missing key fail with `StepError::UnresolvedReference`.
// `thiserror` treats any field named `source` as the error source, which a
// `String` cannot be, so Display/Error are implemented by hand here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionError {
    pub key: String,
    pub source: String,
    pub reason: String,
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to extract `{}` from `{}`: {}",
            self.key, self.source, self.reason
        )
    }
}

impl std::error::Error for ExtractionError {}

/// Malformed chain definition, reported before any step executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain `{chain}` has no steps")]
    EmptySteps { chain: String },
    #[error("step `{step}` in chain `{chain}` declares no assertions")]
    NoAssertions { chain: String, step: String },
}
