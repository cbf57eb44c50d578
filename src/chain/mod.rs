//! # Chains & Steps
//!
//! A chain is an ordered sequence of steps sharing one [`context::Context`]
//! for the duration of a single run. Each step declares its request template,
//! the assertions that must hold on the response, and the values it writes
//! back into the context for later steps.

pub mod context;
pub mod result;
pub mod runner;

use serde::{Deserialize, Serialize};

use crate::assertions::{Assertion, Expected, FieldPath};
use crate::http::request::RequestSpec;

/// Where an extracted value is read from on the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractSource {
    BodyField(FieldPath),
    Header(String),
}

/// One value to carry forward: read `source` from the response, write it into
/// the context under `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub key: String,
    pub source: ExtractSource,
}

/// One request, its assertions, and its context extractions.
///
/// Steps are constructed at chain-definition time and bound to live values
/// only during a run; they hold no state between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub spec: RequestSpec,
    pub assertions: Vec<Assertion>,
    pub extract: Vec<Extraction>,
}

impl Step {
    pub fn new(name: impl Into<String>, spec: RequestSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            assertions: Vec::new(),
            extract: Vec::new(),
        }
    }

    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    pub fn expect_status(self, status: u16) -> Self {
        self.assert(Assertion::StatusEquals(status))
    }

    pub fn expect_header(self, name: impl Into<String>, expected: impl Into<String>) -> Self {
        self.assert(Assertion::HeaderEquals {
            name: name.into(),
            expected: expected.into(),
        })
    }

    pub fn expect_body_field(self, path: impl Into<FieldPath>, expected: Expected) -> Self {
        self.assert(Assertion::BodyFieldEquals {
            path: path.into(),
            expected,
        })
    }

    pub fn expect_body_field_differs(self, path: impl Into<FieldPath>, expected: Expected) -> Self {
        self.assert(Assertion::BodyFieldNotEquals {
            path: path.into(),
            expected,
        })
    }

    pub fn extract_body(mut self, key: impl Into<String>, path: impl Into<FieldPath>) -> Self {
        self.extract.push(Extraction {
            key: key.into(),
            source: ExtractSource::BodyField(path.into()),
        });
        self
    }

    pub fn extract_header(mut self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.extract.push(Extraction {
            key: key.into(),
            source: ExtractSource::Header(header.into()),
        });
        self
    }
}

/// Ordered steps sharing one context for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Chain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::http::method::HttpMethod;

    use super::*;

    #[test]
    fn step_builder_accumulates_assertions_and_extractions() {
        let step = Step::new("create post", RequestSpec::new(HttpMethod::Post, "/posts"))
            .expect_status(201)
            .expect_body_field("title", Expected::literal("t"))
            .extract_body("postId", "id")
            .extract_header("trace", "x-request-id");

        assert_eq!(step.assertions.len(), 2);
        assert_eq!(step.extract.len(), 2);
        assert_eq!(step.extract[0].key, "postId");
        assert_eq!(
            step.extract[1].source,
            ExtractSource::Header("x-request-id".to_string())
        );
    }

    #[test]
    fn chain_keeps_step_order() {
        let chain = Chain::new("lifecycle")
            .step(Step::new("a", RequestSpec::new(HttpMethod::Get, "/a")).expect_status(200))
            .step(Step::new("b", RequestSpec::new(HttpMethod::Get, "/b")).expect_status(200));

        assert_eq!(chain.steps[0].name, "a");
        assert_eq!(chain.steps[1].name, "b");
    }
}
