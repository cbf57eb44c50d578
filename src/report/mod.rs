//! # Reporting
//!
//! Renders chain results for the shell that invoked the suite. The core
//! defines only the structured results; this module is one consumer of them
//! (plain text for humans, JSON for CI).

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

use crate::chain::result::ChainResult;

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Aggregate totals for a batch of chain runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub chains: usize,
    pub chains_passed: usize,
    pub assertions: usize,
    pub assertions_passed: usize,
    pub duration_ms: u128,
}

impl RunReport {
    pub fn from_results(results: &[ChainResult]) -> Self {
        let mut report = RunReport::default();
        for result in results {
            report.chains += 1;
            if result.passed() {
                report.chains_passed += 1;
            }
            report.assertions += result.assertion_count();
            report.assertions_passed += result.assertions_passed();
            report.duration_ms += result.duration_ms();
        }
        report
    }

    pub fn all_passed(&self) -> bool {
        self.chains_passed == self.chains && self.assertions_passed == self.assertions
    }
}

/// Render a batch of chain results in the requested format.
pub fn render(results: &[ChainResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(results),
        OutputFormat::Json => {
            let document = json!({
                "report": RunReport::from_results(results),
                "chains": results,
            });
            serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

fn render_text(results: &[ChainResult]) -> String {
    let mut out = String::new();
    for result in results {
        let verdict = if result.passed() { "PASS" } else { "FAIL" };
        let _ = writeln!(
            out,
            "{verdict} {} ({} steps, {}/{} assertions, {}ms)",
            result.name,
            result.steps.len(),
            result.assertions_passed(),
            result.assertion_count(),
            result.duration_ms(),
        );

        for step in &result.steps {
            if step.passed() && step.extraction_errors.is_empty() {
                continue;
            }
            if let Some(error) = &step.error {
                let _ = writeln!(out, "  step {} `{}`: {error}", step.index + 1, step.name);
            }
            for outcome in step.outcomes.iter().filter(|outcome| !outcome.passed()) {
                let _ = writeln!(
                    out,
                    "  step {} `{}`: {} - {}",
                    step.index + 1,
                    step.name,
                    outcome.assertion,
                    outcome.message,
                );
            }
            for extraction in &step.extraction_errors {
                let _ = writeln!(out, "  step {} `{}`: {extraction}", step.index + 1, step.name);
            }
        }
    }

    let report = RunReport::from_results(results);
    let _ = writeln!(
        out,
        "{}/{} chains passed, {}/{} assertions passed ({}ms)",
        report.chains_passed, report.chains, report.assertions_passed, report.assertions, report.duration_ms,
    );
    out
}
