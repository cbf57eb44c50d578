use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dotted path into a structured body (`user.address.city`, `items.0.id`).
/// Numeric segments index into arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    raw: String,
}

/// Tagged result of a path lookup. Absent fields and shape mismatches are
/// distinct outcomes, never conflated with an equality failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldLookup<'a> {
    Found(&'a Value),
    NotFound { segment: String },
    TypeMismatch { segment: String, found: &'static str },
}

impl FieldPath {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }

    /// Walk the path from `root`, descending through objects by key and
    /// arrays by numeric index.
    pub fn resolve<'a>(&self, root: &'a Value) -> FieldLookup<'a> {
        let mut current = root;
        for segment in self.segments() {
            current = match current {
                Value::Object(map) => match map.get(segment) {
                    Some(value) => value,
                    None => {
                        return FieldLookup::NotFound {
                            segment: segment.to_string(),
                        };
                    }
                },
                Value::Array(items) => match segment.parse::<usize>() {
                    Ok(index) => match items.get(index) {
                        Some(value) => value,
                        None => {
                            return FieldLookup::NotFound {
                                segment: segment.to_string(),
                            };
                        }
                    },
                    Err(_) => {
                        return FieldLookup::TypeMismatch {
                            segment: segment.to_string(),
                            found: "array",
                        };
                    }
                },
                other => {
                    return FieldLookup::TypeMismatch {
                        segment: segment.to_string(),
                        found: json_type(other),
                    };
                }
            };
        }
        FieldLookup::Found(current)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_nested_fields() {
        let body = json!({"user": {"address": {"city": "Kyiv"}}});
        let lookup = FieldPath::from("user.address.city").resolve(&body);
        assert_eq!(lookup, FieldLookup::Found(&json!("Kyiv")));
    }

    #[test]
    fn resolves_array_indices() {
        let body = json!({"items": [{"id": 1}, {"id": 2}]});
        let lookup = FieldPath::from("items.1.id").resolve(&body);
        assert_eq!(lookup, FieldLookup::Found(&json!(2)));
    }

    #[test]
    fn missing_field_is_not_found() {
        let body = json!({"id": 1});
        let lookup = FieldPath::from("title").resolve(&body);
        assert_eq!(
            lookup,
            FieldLookup::NotFound { segment: "title".to_string() }
        );
    }

    #[test]
    fn index_past_the_end_is_not_found() {
        let body = json!([1, 2]);
        let lookup = FieldPath::from("5").resolve(&body);
        assert_eq!(lookup, FieldLookup::NotFound { segment: "5".to_string() });
    }

    #[test]
    fn descending_into_a_scalar_is_a_type_mismatch() {
        let body = json!({"id": 1});
        let lookup = FieldPath::from("id.nested").resolve(&body);
        assert_eq!(
            lookup,
            FieldLookup::TypeMismatch {
                segment: "nested".to_string(),
                found: "number",
            }
        );
    }

    #[test]
    fn non_numeric_segment_into_array_is_a_type_mismatch() {
        let body = json!([1, 2]);
        let lookup = FieldPath::from("first").resolve(&body);
        assert_eq!(
            lookup,
            FieldLookup::TypeMismatch {
                segment: "first".to_string(),
                found: "array",
            }
        );
    }
}
