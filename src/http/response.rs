use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Response payload: parsed JSON when the body is valid JSON, raw bytes
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResponseBody {
    Json(Value),
    Bytes(Vec<u8>),
}

impl ResponseBody {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match serde_json::from_slice(&bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Bytes(bytes),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Bytes(_) => None,
        }
    }
}

/// Immutable view of a received response. Header lookup is case-insensitive;
/// names are lowercased on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseView {
    pub status: u16,
    headers: HashMap<String, String>,
    pub body: ResponseBody,
}

impl ResponseView {
    pub fn new(
        status: u16,
        headers: impl IntoIterator<Item = (String, String)>,
        body: ResponseBody,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self { status, headers, body }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let view = ResponseView::new(
            200,
            [("Content-Type".to_string(), "application/json".to_string())],
            ResponseBody::from_bytes(b"{}".to_vec()),
        );

        assert_eq!(view.header("content-type"), Some("application/json"));
        assert_eq!(view.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(view.header("x-missing"), None);
    }

    #[test]
    fn body_parses_json_when_valid() {
        let body = ResponseBody::from_bytes(br#"{"id": 7}"#.to_vec());
        assert_eq!(body.as_json(), Some(&json!({"id": 7})));
    }

    #[test]
    fn body_keeps_bytes_when_not_json() {
        let body = ResponseBody::from_bytes(b"<html></html>".to_vec());
        assert_eq!(body.as_json(), None);
        assert_eq!(body, ResponseBody::Bytes(b"<html></html>".to_vec()));
    }

    #[test]
    fn success_covers_2xx_only() {
        let ok = ResponseView::new(204, [], ResponseBody::from_bytes(Vec::new()));
        let not_found = ResponseView::new(404, [], ResponseBody::from_bytes(Vec::new()));
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }
}
