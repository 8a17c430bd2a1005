//! Test utilities for exercising the orchestrator without a network.
//!
//! [`StubTransport`] serves scripted responses keyed by URL and records
//! every request it receives. Replies can be held back for a number of
//! polls to make requests finish out of order.
//!
//! # Example
//!
//! ```
//! use precinct_data::Transport;
//! use precinct_data::test_support::StubTransport;
//!
//! let transport = StubTransport::new().with_response("https://a.test/x.json", 404, "missing");
//! let runtime = tokio::runtime::Runtime::new()?;
//! let response = runtime.block_on(transport.get("https://a.test/x.json"))?;
//! assert_eq!(response.status, 404);
//! assert_eq!(transport.calls(), ["https://a.test/x.json"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::poll_fn;
use std::io;
use std::task::Poll;

use async_trait::async_trait;
use serde_json::Value;

use crate::{FetchDiagnostics, Transport, TransportError, TransportResponse};

#[derive(Debug, Clone)]
enum StubReply {
    Response { status: u16, body: String },
    Timeout,
}

/// Stub [`Transport`] backed by in-memory responses.
///
/// URLs without a scripted reply fail with [`TransportError::Network`].
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: HashMap<String, StubReply>,
    delays: HashMap<String, usize>,
    calls: RefCell<Vec<String>>,
}

impl StubTransport {
    /// Create a transport with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and a raw `body`.
    #[must_use]
    pub fn with_response(mut self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.replies.insert(
            url.into(),
            StubReply::Response {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Answer `url` with `200 OK` and `body` serialised as JSON.
    #[must_use]
    pub fn with_json(self, url: impl Into<String>, body: Value) -> Self {
        self.with_response(url, 200, body.to_string())
    }

    /// Make requests for `url` time out.
    #[must_use]
    pub fn with_timeout(mut self, url: impl Into<String>) -> Self {
        self.replies.insert(url.into(), StubReply::Timeout);
        self
    }

    /// Stay pending for `polls` polls before answering `url`.
    #[must_use]
    pub fn with_delay(mut self, url: impl Into<String>, polls: usize) -> Self {
        self.delays.insert(url.into(), polls);
        self
    }

    /// URLs requested so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for StubTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.calls.borrow_mut().push(url.to_owned());
        yield_polls(self.delays.get(url).copied().unwrap_or_default()).await;
        match self.replies.get(url) {
            Some(StubReply::Response { status, body }) => Ok(TransportResponse {
                status: *status,
                body: body.clone(),
                diagnostics: FetchDiagnostics::direct(url, *status),
            }),
            Some(StubReply::Timeout) => Err(TransportError::Timeout {
                url: url.to_owned(),
            }),
            None => Err(TransportError::Network {
                url: url.to_owned(),
                source: io::Error::new(io::ErrorKind::NotFound, "no stub reply scripted"),
            }),
        }
    }
}

async fn yield_polls(mut remaining: usize) {
    poll_fn(move |cx| {
        if remaining == 0 {
            return Poll::Ready(());
        }
        remaining -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    })
    .await;
}
