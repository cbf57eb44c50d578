use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};

use super::request::{RequestBody, ResolvedRequest};
use super::response::{ResponseBody, ResponseView};
use super::transport::{Transport, TransportError};

/// Transport adapter backed by a shared `reqwest` client.
///
/// Paths are joined onto a fixed base URL, so chains stay portable across
/// environments.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, request: &ResolvedRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.into(), url);

        // Default content type first, so an explicit header on the spec wins.
        match &request.body {
            Some(RequestBody::Json(value)) => {
                builder = builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(value.to_string());
            }
            Some(RequestBody::Raw(raw)) => {
                builder = builder.body(raw.clone());
            }
            None => {}
        }

        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Unavailable(format!("invalid header name `{name}`: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Unavailable(format!("invalid header value `{value}`: {e}")))?;
            builder = builder.header(header_name, header_value);
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ResolvedRequest) -> Result<ResponseView, TransportError> {
        let response = self.build(request)?.send().await.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Unavailable(format!("failed to read response body: {e}")))?;

        let view = ResponseView::new(status, headers, ResponseBody::from_bytes(bytes.to_vec()));
        if !request.tolerate_error_status && !view.is_success() {
            return Err(TransportError::ErrorStatus(view));
        }
        Ok(view)
    }
}

fn map_send_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Unavailable(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = ReqwestTransport::new("http://localhost:3000/");
        assert_eq!(transport.base_url(), "http://localhost:3000");
    }
}
