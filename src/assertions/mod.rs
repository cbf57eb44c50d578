//! # Assertions
//!
//! Declarative checks over a response plus the chain context, evaluated as
//! pure functions. Evaluation is order-independent within a step and never
//! short-circuits: every assertion of a step gets its own outcome.

pub mod path;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::chain::context::Context;
use crate::http::response::{ResponseBody, ResponseView};

pub use path::{FieldLookup, FieldPath};

use path::json_type;

/// Right-hand side of an equality check: a literal, or a value written to the
/// context by an earlier step (cross-step comparisons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expected {
    Literal(Value),
    FromContext(String),
}

impl Expected {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expected::Literal(value.into())
    }

    pub fn from_context(key: impl Into<String>) -> Self {
        Expected::FromContext(key.into())
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(value) => write!(f, "{value}"),
            Expected::FromContext(key) => write!(f, "{{{{{key}}}}}"),
        }
    }
}

/// A single declarative check against a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Assertion {
    StatusEquals(u16),
    HeaderEquals { name: String, expected: String },
    BodyFieldEquals { path: FieldPath, expected: Expected },
    BodyFieldNotEquals { path: FieldPath, expected: Expected },
    /// Structural subset: every key of the expected object must be present
    /// in the actual body with an equal value, recursing through nested
    /// objects. Not a substring check.
    BodyContains(Value),
    BodyLengthEquals(usize),
}

impl Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assertion::StatusEquals(status) => write!(f, "status == {status}"),
            Assertion::HeaderEquals { name, expected } => {
                write!(f, "header `{name}` == `{expected}`")
            }
            Assertion::BodyFieldEquals { path, expected } => {
                write!(f, "body.{path} == {expected}")
            }
            Assertion::BodyFieldNotEquals { path, expected } => {
                write!(f, "body.{path} != {expected}")
            }
            Assertion::BodyContains(subset) => write!(f, "body contains {subset}"),
            Assertion::BodyLengthEquals(len) => write!(f, "body length == {len}"),
        }
    }
}

/// How an assertion fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Pass,
    Fail,
    /// The assertion was applied to a structurally incompatible response
    /// (e.g. a length check on a non-sequence body).
    TypeError,
    /// The step never produced a response to assert against.
    Precondition,
}

/// Recorded outcome of one assertion, with the actual value where one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionOutcome {
    pub assertion: Assertion,
    pub verdict: Verdict,
    pub actual: Option<Value>,
    pub message: String,
}

impl AssertionOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    pub(crate) fn precondition(assertion: &Assertion, reason: &str) -> Self {
        Self {
            assertion: assertion.clone(),
            verdict: Verdict::Precondition,
            actual: None,
            message: format!("not evaluated: {reason}"),
        }
    }
}

/// Evaluate one assertion against a response and the current context.
///
/// Pure: the same assertion against the same stored response always yields
/// the same outcome.
pub fn evaluate(assertion: &Assertion, response: &ResponseView, context: &Context) -> AssertionOutcome {
    match assertion {
        Assertion::StatusEquals(expected) => {
            let actual = response.status;
            finish(
                assertion,
                actual == *expected,
                Some(json!(actual)),
                format!("expected status {expected}, got {actual}"),
            )
        }
        Assertion::HeaderEquals { name, expected } => match response.header(name) {
            None => fail(assertion, None, format!("header `{name}` is absent")),
            Some(actual) => finish(
                assertion,
                actual == expected,
                Some(Value::String(actual.to_string())),
                format!("header `{name}` is `{actual}`, expected `{expected}`"),
            ),
        },
        Assertion::BodyFieldEquals { path, expected } => {
            field_comparison(assertion, response, context, path, expected, true)
        }
        Assertion::BodyFieldNotEquals { path, expected } => {
            field_comparison(assertion, response, context, path, expected, false)
        }
        Assertion::BodyContains(subset) => contains(assertion, response, subset),
        Assertion::BodyLengthEquals(expected) => length(assertion, response, *expected),
    }
}

fn field_comparison(
    assertion: &Assertion,
    response: &ResponseView,
    context: &Context,
    path: &FieldPath,
    expected: &Expected,
    want_equal: bool,
) -> AssertionOutcome {
    let Some(body) = response.body.as_json() else {
        return type_error(assertion, "response body is not structured".to_string());
    };

    let actual = match path.resolve(body) {
        FieldLookup::Found(value) => value,
        FieldLookup::NotFound { segment } => {
            return fail(assertion, None, format!("body field segment `{segment}` is absent"));
        }
        FieldLookup::TypeMismatch { segment, found } => {
            return type_error(
                assertion,
                format!("cannot descend into `{segment}`: value is a {found}"),
            );
        }
    };

    let expected_value = match expected {
        Expected::Literal(value) => value,
        Expected::FromContext(key) => match context.get(key) {
            Some(value) => value,
            None => {
                return fail(
                    assertion,
                    Some(actual.clone()),
                    format!("context key `{key}` is absent"),
                );
            }
        },
    };

    let equal = actual == expected_value;
    let message = if want_equal {
        format!("body.{path} is `{actual}`, expected `{expected_value}`")
    } else {
        format!("body.{path} is `{actual}`, expected a different value")
    };
    finish(assertion, equal == want_equal, Some(actual.clone()), message)
}

fn contains(assertion: &Assertion, response: &ResponseView, subset: &Value) -> AssertionOutcome {
    let Some(body) = response.body.as_json() else {
        return type_error(assertion, "response body is not structured".to_string());
    };
    if !subset.is_object() {
        return type_error(
            assertion,
            format!("containment expects an object subset, got {}", json_type(subset)),
        );
    }
    if !body.is_object() {
        return type_error(
            assertion,
            format!("containment expects an object body, got {}", json_type(body)),
        );
    }

    match subset_mismatch(subset, body, "") {
        None => pass(assertion, Some(body.clone())),
        Some(mismatch) => fail(assertion, Some(body.clone()), mismatch),
    }
}

fn length(assertion: &Assertion, response: &ResponseView, expected: usize) -> AssertionOutcome {
    let actual = match &response.body {
        ResponseBody::Json(Value::Array(items)) => items.len(),
        ResponseBody::Bytes(bytes) => bytes.len(),
        ResponseBody::Json(other) => {
            return type_error(
                assertion,
                format!("length assertion on non-sequence body ({})", json_type(other)),
            );
        }
    };
    finish(
        assertion,
        actual == expected,
        Some(json!(actual)),
        format!("body length is {actual}, expected {expected}"),
    )
}

/// First difference between an expected subset and the actual value, if any.
fn subset_mismatch(expected: &Value, actual: &Value, at: &str) -> Option<String> {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            for (key, expected_value) in expected_map {
                let field = if at.is_empty() {
                    key.clone()
                } else {
                    format!("{at}.{key}")
                };
                match actual_map.get(key) {
                    None => return Some(format!("field `{field}` is absent")),
                    Some(actual_value) => {
                        if let Some(mismatch) = subset_mismatch(expected_value, actual_value, &field) {
                            return Some(mismatch);
                        }
                    }
                }
            }
            None
        }
        _ => {
            if expected == actual {
                None
            } else {
                Some(format!("field `{at}` is `{actual}`, expected `{expected}`"))
            }
        }
    }
}

fn finish(assertion: &Assertion, passed: bool, actual: Option<Value>, failure: String) -> AssertionOutcome {
    if passed {
        pass(assertion, actual)
    } else {
        fail(assertion, actual, failure)
    }
}

fn pass(assertion: &Assertion, actual: Option<Value>) -> AssertionOutcome {
    AssertionOutcome {
        assertion: assertion.clone(),
        verdict: Verdict::Pass,
        actual,
        message: String::new(),
    }
}

fn fail(assertion: &Assertion, actual: Option<Value>, message: String) -> AssertionOutcome {
    AssertionOutcome {
        assertion: assertion.clone(),
        verdict: Verdict::Fail,
        actual,
        message,
    }
}

fn type_error(assertion: &Assertion, message: String) -> AssertionOutcome {
    AssertionOutcome {
        assertion: assertion.clone(),
        verdict: Verdict::TypeError,
        actual: None,
        message,
    }
}

#[cfg(test)]
mod tests {
    use crate::http::response::ResponseBody;

    use super::*;

    fn json_response(status: u16, body: Value) -> ResponseView {
        ResponseView::new(
            status,
            [("Content-Type".to_string(), "application/json; charset=utf-8".to_string())],
            ResponseBody::Json(body),
        )
    }

    #[test]
    fn status_equals() {
        let response = json_response(201, json!({}));
        let context = Context::new();

        let ok = evaluate(&Assertion::StatusEquals(201), &response, &context);
        assert_eq!(ok.verdict, Verdict::Pass);

        let bad = evaluate(&Assertion::StatusEquals(200), &response, &context);
        assert_eq!(bad.verdict, Verdict::Fail);
        assert_eq!(bad.actual, Some(json!(201)));
    }

    #[test]
    fn header_equals_ignores_name_case() {
        let response = json_response(200, json!({}));
        let assertion = Assertion::HeaderEquals {
            name: "CONTENT-TYPE".to_string(),
            expected: "application/json; charset=utf-8".to_string(),
        };
        assert!(evaluate(&assertion, &response, &Context::new()).passed());
    }

    #[test]
    fn header_absent_fails() {
        let response = json_response(200, json!({}));
        let assertion = Assertion::HeaderEquals {
            name: "x-request-id".to_string(),
            expected: "1".to_string(),
        };
        let outcome = evaluate(&assertion, &response, &Context::new());
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert!(outcome.message.contains("absent"));
    }

    #[test]
    fn body_field_equals_literal() {
        let response = json_response(200, json!({"post": {"id": 55}}));
        let assertion = Assertion::BodyFieldEquals {
            path: "post.id".into(),
            expected: Expected::literal(55),
        };
        assert!(evaluate(&assertion, &response, &Context::new()).passed());
    }

    #[test]
    fn body_field_equals_from_context() {
        let response = json_response(200, json!({"id": 101}));
        let mut context = Context::new();
        context.set("postId", json!(101));

        let assertion = Assertion::BodyFieldEquals {
            path: "id".into(),
            expected: Expected::from_context("postId"),
        };
        assert!(evaluate(&assertion, &response, &context).passed());
    }

    #[test]
    fn body_field_equals_missing_context_key_fails() {
        let response = json_response(200, json!({"id": 101}));
        let assertion = Assertion::BodyFieldEquals {
            path: "id".into(),
            expected: Expected::from_context("postId"),
        };
        let outcome = evaluate(&assertion, &response, &Context::new());
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert!(outcome.message.contains("postId"));
    }

    #[test]
    fn body_field_not_equals_detects_change() {
        let response = json_response(200, json!({"body": "b2"}));
        let mut context = Context::new();
        context.set("prevBody", json!("b1"));

        let changed = Assertion::BodyFieldNotEquals {
            path: "body".into(),
            expected: Expected::from_context("prevBody"),
        };
        assert!(evaluate(&changed, &response, &context).passed());

        let unchanged = Assertion::BodyFieldNotEquals {
            path: "body".into(),
            expected: Expected::literal("b2"),
        };
        assert_eq!(
            evaluate(&unchanged, &response, &context).verdict,
            Verdict::Fail
        );
    }

    #[test]
    fn contains_is_structural_not_substring() {
        let response = json_response(200, json!({"title": "x", "id": 9, "extra": true}));
        let context = Context::new();

        let subset = Assertion::BodyContains(json!({"title": "x"}));
        assert!(evaluate(&subset, &response, &context).passed());

        // "x" is a substring of "xy" but the values differ structurally.
        let other = json_response(200, json!({"title": "xy"}));
        assert_eq!(evaluate(&subset, &other, &context).verdict, Verdict::Fail);
    }

    #[test]
    fn contains_recurses_into_nested_objects() {
        let response = json_response(200, json!({"user": {"name": "a", "age": 3}, "id": 1}));
        let assertion = Assertion::BodyContains(json!({"user": {"name": "a"}}));
        assert!(evaluate(&assertion, &response, &Context::new()).passed());

        let missing = Assertion::BodyContains(json!({"user": {"email": "e"}}));
        let outcome = evaluate(&missing, &response, &Context::new());
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert!(outcome.message.contains("user.email"));
    }

    #[test]
    fn length_on_array_and_bytes() {
        let array = json_response(200, json!([1, 2, 3]));
        assert!(evaluate(&Assertion::BodyLengthEquals(3), &array, &Context::new()).passed());

        let bytes = ResponseView::new(200, [], ResponseBody::Bytes(vec![1, 2]));
        assert!(evaluate(&Assertion::BodyLengthEquals(2), &bytes, &Context::new()).passed());
    }

    #[test]
    fn length_on_object_is_a_type_error() {
        let response = json_response(200, json!({"id": 1}));
        let outcome = evaluate(&Assertion::BodyLengthEquals(1), &response, &Context::new());
        assert_eq!(outcome.verdict, Verdict::TypeError);
    }

    #[test]
    fn field_assertion_on_byte_body_is_a_type_error() {
        let response = ResponseView::new(200, [], ResponseBody::Bytes(b"nope".to_vec()));
        let assertion = Assertion::BodyFieldEquals {
            path: "id".into(),
            expected: Expected::literal(1),
        };
        let outcome = evaluate(&assertion, &response, &Context::new());
        assert_eq!(outcome.verdict, Verdict::TypeError);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let response = json_response(200, json!({"id": 1}));
        let assertion = Assertion::BodyFieldEquals {
            path: "id".into(),
            expected: Expected::literal(1),
        };
        let first = evaluate(&assertion, &response, &Context::new());
        let second = evaluate(&assertion, &response, &Context::new());
        assert_eq!(first, second);
    }
}
