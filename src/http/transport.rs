use async_trait::async_trait;
use thiserror::Error;

use super::request::ResolvedRequest;
use super::response::ResponseView;

/// Collaborator-level failure reported by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    #[error("transport timed out")]
    Timeout,
    /// The server answered, but with a non-2xx status and the request did not
    /// tolerate error statuses. The runner unwraps this back into a normal
    /// response: status checking is an assertion concern, not control flow.
    #[error("server answered with error status {}", .0.status)]
    ErrorStatus(ResponseView),
}

/// Seam between the chain runner and the HTTP client.
///
/// Implementations must complete one dispatch per call; the runner awaits the
/// result before resolving the next step's template.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ResolvedRequest) -> Result<ResponseView, TransportError>;
}
