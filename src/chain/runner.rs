use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::assertions::{AssertionOutcome, FieldLookup, evaluate};
use crate::error::{ChainError, ExtractionError, StepError};
use crate::http::response::ResponseView;
use crate::http::transport::{Transport, TransportError};
use crate::template;

use super::context::Context;
use super::result::{ChainResult, StepResult};
use super::{Chain, ExtractSource, Step};

/// Runner tunables. The timeout bounds each transport dispatch, not the
/// chain as a whole.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Executes chains step by step against a transport.
///
/// Steps run strictly in order and every step is dispatched regardless of
/// earlier outcomes: a failing assertion, a missing context key, or a dead
/// transport marks its own step and the run moves on, so one hiccup cannot
/// hide later independent failures. Each run owns a fresh [`Context`];
/// distinct chains never share state, so separate runs may proceed
/// concurrently.
pub struct ChainRunner<T> {
    transport: T,
    config: RunnerConfig,
}

impl<T: Transport> ChainRunner<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: RunnerConfig::default(),
        }
    }

    pub fn with_config(transport: T, config: RunnerConfig) -> Self {
        Self { transport, config }
    }

    /// Run every step of the chain in order and collect per-step results.
    ///
    /// Errors only on a malformed definition; execution-time failures are
    /// recorded inside the returned [`ChainResult`].
    pub async fn run(&self, chain: &Chain) -> Result<ChainResult, ChainError> {
        Self::validate(chain)?;
        info!(chain = %chain.name, steps = chain.steps.len(), "running chain");

        let mut context = Context::new();
        let mut steps = Vec::with_capacity(chain.steps.len());
        for (index, step) in chain.steps.iter().enumerate() {
            let result = self.run_step(index, step, &mut context).await;
            debug!(
                chain = %chain.name,
                step = %step.name,
                passed = result.passed(),
                "step finished"
            );
            steps.push(result);
        }

        Ok(ChainResult {
            name: chain.name.clone(),
            steps,
        })
    }

    fn validate(chain: &Chain) -> Result<(), ChainError> {
        if chain.steps.is_empty() {
            return Err(ChainError::EmptySteps {
                chain: chain.name.clone(),
            });
        }
        for step in &chain.steps {
            if step.assertions.is_empty() {
                return Err(ChainError::NoAssertions {
                    chain: chain.name.clone(),
                    step: step.name.clone(),
                });
            }
        }
        Ok(())
    }

    async fn run_step(&self, index: usize, step: &Step, context: &mut Context) -> StepResult {
        let started = Instant::now();

        let resolved = match template::resolve_request(&step.spec, context) {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(step = %step.name, %error, "template resolution failed");
                return Self::failed_before_dispatch(index, step, error, started);
            }
        };

        let response = match timeout(self.config.timeout, self.transport.send(&resolved)).await {
            Err(_elapsed) => {
                let error = StepError::TransportTimeout {
                    millis: self.config.timeout.as_millis() as u64,
                };
                warn!(step = %step.name, %error, "dispatch failed");
                return Self::failed_before_dispatch(index, step, error, started);
            }
            Ok(Err(TransportError::Timeout)) => {
                let error = StepError::TransportTimeout {
                    millis: self.config.timeout.as_millis() as u64,
                };
                warn!(step = %step.name, %error, "dispatch failed");
                return Self::failed_before_dispatch(index, step, error, started);
            }
            Ok(Err(TransportError::Unavailable(reason))) => {
                let error = StepError::TransportUnavailable { reason };
                warn!(step = %step.name, %error, "dispatch failed");
                return Self::failed_before_dispatch(index, step, error, started);
            }
            // Status checking belongs to assertions, not control flow.
            Ok(Err(TransportError::ErrorStatus(view))) => view,
            Ok(Ok(view)) => view,
        };

        let outcomes = step
            .assertions
            .iter()
            .map(|assertion| evaluate(assertion, &response, context))
            .collect();
        let extraction_errors = Self::apply_extractions(step, &response, context);

        StepResult {
            index,
            name: step.name.clone(),
            response: Some(response),
            error: None,
            outcomes,
            extraction_errors,
            duration_ms: started.elapsed().as_millis(),
        }
    }

    fn failed_before_dispatch(
        index: usize,
        step: &Step,
        error: StepError,
        started: Instant,
    ) -> StepResult {
        let reason = error.to_string();
        let outcomes = step
            .assertions
            .iter()
            .map(|assertion| AssertionOutcome::precondition(assertion, &reason))
            .collect();

        StepResult {
            index,
            name: step.name.clone(),
            response: None,
            error: Some(error),
            outcomes,
            extraction_errors: Vec::new(),
            duration_ms: started.elapsed().as_millis(),
        }
    }

    fn apply_extractions(
        step: &Step,
        response: &ResponseView,
        context: &mut Context,
    ) -> Vec<ExtractionError> {
        let mut errors = Vec::new();
        for extraction in &step.extract {
            match &extraction.source {
                ExtractSource::BodyField(path) => match response.body.as_json() {
                    None => errors.push(ExtractionError {
                        key: extraction.key.clone(),
                        source: path.as_str().to_string(),
                        reason: "response body is not structured".to_string(),
                    }),
                    Some(body) => match path.resolve(body) {
                        FieldLookup::Found(value) => {
                            context.set(extraction.key.as_str(), value.clone());
                        }
                        FieldLookup::NotFound { segment } => errors.push(ExtractionError {
                            key: extraction.key.clone(),
                            source: path.as_str().to_string(),
                            reason: format!("field segment `{segment}` is absent"),
                        }),
                        FieldLookup::TypeMismatch { segment, found } => {
                            errors.push(ExtractionError {
                                key: extraction.key.clone(),
                                source: path.as_str().to_string(),
                                reason: format!("cannot descend into `{segment}`: value is a {found}"),
                            })
                        }
                    },
                },
                ExtractSource::Header(name) => match response.header(name) {
                    Some(value) => {
                        context.set(extraction.key.as_str(), Value::String(value.to_string()));
                    }
                    None => errors.push(ExtractionError {
                        key: extraction.key.clone(),
                        source: name.clone(),
                        reason: "header is absent".to_string(),
                    }),
                },
            }
        }
        errors
    }
}
