use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::method::HttpMethod;

/// Payload attached to a request: either a structured value serialized at
/// dispatch time, or a pre-serialized string sent verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestBody {
    Json(Value),
    Raw(String),
}

/// Template form of a request, as declared on a step.
///
/// `path` and header values may reference context keys with `{{key}}`
/// placeholders. A spec never reaches the transport directly; it is first
/// resolved into a [`ResolvedRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<RequestBody>,
    /// When true, non-2xx responses are returned for inspection instead of
    /// being surfaced as a transport failure.
    #[serde(default)]
    pub tolerate_error_status: bool,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            tolerate_error_status: false,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn json_body(mut self, value: Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    pub fn raw_body(mut self, raw: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw(raw.into()));
        self
    }

    pub fn tolerate_error_status(mut self) -> Self {
        self.tolerate_error_status = true;
        self
    }
}

/// A request with every placeholder substituted. Only this form is handed to
/// a `Transport`, so an unresolved reference can never reach the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
    pub tolerate_error_status: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_collects_headers_and_body() {
        let spec = RequestSpec::new(HttpMethod::Post, "/posts")
            .header("Content-Type", "application/json")
            .json_body(json!({"title": "t"}));

        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(spec.body, Some(RequestBody::Json(json!({"title": "t"}))));
        assert!(!spec.tolerate_error_status);
    }

    #[test]
    fn tolerate_error_status_flag() {
        let spec = RequestSpec::new(HttpMethod::Get, "/posts/1").tolerate_error_status();
        assert!(spec.tolerate_error_status);
    }
}
