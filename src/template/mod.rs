//! # Placeholder Resolution
//!
//! `{{key}}` interpolation against a chain's [`Context`]. Unlike a
//! best-effort variable system, a placeholder that cannot be resolved is an
//! error: no unresolved reference may reach the transport.

use std::collections::HashMap;

use serde_json::Value;

use crate::chain::context::Context;
use crate::error::StepError;
use crate::http::request::{RequestSpec, ResolvedRequest};

/// Substitute every `{{key}}` placeholder in `template` with the matching
/// context value.
pub fn interpolate(template: &str, context: &Context) -> Result<String, StepError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            return Err(StepError::UnterminatedPlaceholder {
                template: template.to_string(),
            });
        };

        let key = after[..end].trim();
        let value = context
            .get(key)
            .ok_or_else(|| StepError::UnresolvedReference { key: key.to_string() })?;
        out.push_str(&render(value));
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Resolve a request template into the form the transport accepts: path and
/// header values interpolated, body carried over verbatim.
pub fn resolve_request(spec: &RequestSpec, context: &Context) -> Result<ResolvedRequest, StepError> {
    let path = interpolate(&spec.path, context)?;
    let mut headers = HashMap::with_capacity(spec.headers.len());
    for (name, value) in &spec.headers {
        headers.insert(name.clone(), interpolate(value, context)?);
    }

    Ok(ResolvedRequest {
        method: spec.method,
        path,
        headers,
        body: spec.body.clone(),
        tolerate_error_status: spec.tolerate_error_status,
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::http::method::HttpMethod;

    use super::*;

    #[test]
    fn interpolates_string_and_numeric_values() {
        let mut context = Context::new();
        context.set("postId", json!(101));
        context.set("token", json!("abc"));

        let resolved = interpolate("/posts/{{postId}}?t={{token}}", &context).unwrap();
        assert_eq!(resolved, "/posts/101?t=abc");
    }

    #[test]
    fn missing_key_is_an_error() {
        let context = Context::new();
        let error = interpolate("/posts/{{postId}}", &context).unwrap_err();
        assert_eq!(
            error,
            StepError::UnresolvedReference { key: "postId".to_string() }
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let context = Context::new();
        let error = interpolate("/posts/{{postId", &context).unwrap_err();
        assert!(matches!(error, StepError::UnterminatedPlaceholder { .. }));
    }

    #[test]
    fn text_without_placeholders_passes_through() {
        let context = Context::new();
        assert_eq!(interpolate("/posts", &context).unwrap(), "/posts");
    }

    #[test]
    fn resolve_request_covers_path_and_headers() {
        let mut context = Context::new();
        context.set("postId", json!(7));
        context.set("token", json!("secret"));

        let spec = RequestSpec::new(HttpMethod::Get, "/posts/{{postId}}")
            .header("Authorization", "Bearer {{token}}");
        let resolved = resolve_request(&spec, &context).unwrap();

        assert_eq!(resolved.path, "/posts/7");
        assert_eq!(
            resolved.headers.get("Authorization").unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn resolve_request_reports_missing_header_key() {
        let context = Context::new();
        let spec = RequestSpec::new(HttpMethod::Get, "/posts")
            .header("Authorization", "Bearer {{token}}");
        let error = resolve_request(&spec, &context).unwrap_err();
        assert_eq!(
            error,
            StepError::UnresolvedReference { key: "token".to_string() }
        );
    }
}
