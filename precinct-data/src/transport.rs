//! The transport seam between the orchestrator and the network.

use async_trait::async_trait;

use crate::TransportError;

/// Per-request facts reported alongside every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDiagnostics {
    /// URL the caller asked for.
    pub url: String,
    /// URL actually requested, after any proxy rewriting.
    pub requested_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Request start, in milliseconds since the Unix epoch.
    pub started_at: u64,
    /// Whether an edge cache served the response.
    pub from_cache: bool,
}

impl FetchDiagnostics {
    /// Diagnostics for a direct, uncached request.
    #[must_use]
    pub fn direct(url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        Self {
            requested_url: url.clone(),
            url,
            status,
            started_at: 0,
            from_cache: false,
        }
    }
}

/// A response as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
    /// Request diagnostics.
    pub diagnostics: FetchDiagnostics,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Capability to GET a URL.
///
/// Implementations return any response that arrived, whatever its status;
/// classification is the caller's job. Errors are reserved for requests
/// that produced no response at all.
#[async_trait(?Send)]
pub trait Transport {
    /// Fetch `url`.
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

