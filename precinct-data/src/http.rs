//! reqwest-backed [`Transport`], optionally routed through a CORS proxy.
//!
//! Some state portals sit behind anti-bot protection that rejects direct
//! requests. A proxy base such as `https://proxy.example/?url=` can be
//! configured; the target URL is then percent-encoded and appended to it.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use precinct_data::{HttpTransport, HttpTransportConfig, Transport};
//!
//! let config = HttpTransportConfig::new()
//!     .with_proxy("https://proxy.example/?url=")
//!     .with_timeout(Duration::from_secs(60));
//! let transport = HttpTransport::with_config(config)?;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let response = runtime.block_on(transport.get("https://www.sos.mn.gov/media/2785/mn-cd1-precincts.json"))?;
//! assert_eq!(response.diagnostics.url, "https://www.sos.mn.gov/media/2785/mn-cd1-precincts.json");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::form_urlencoded;

use crate::{FetchDiagnostics, Transport, TransportError, TransportResponse};

/// Default user agent for boundary requests.
pub const DEFAULT_USER_AGENT: &str = "precinct-engine/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CACHE_STATUS_HEADER: &str = "cf-cache-status";

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Prefix prepended to the percent-encoded target URL, if any.
    pub proxy_base: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            proxy_base: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTransportConfig {
    /// Create a direct, unproxied configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route requests through `proxy_base`.
    #[must_use]
    pub fn with_proxy(mut self, proxy_base: impl Into<String>) -> Self {
        self.proxy_base = Some(proxy_base.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL actually requested for `url` under this configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_data::HttpTransportConfig;
    ///
    /// let config = HttpTransportConfig::new().with_proxy("https://proxy.example/?url=");
    /// assert_eq!(
    ///     config.requested_url("https://a.test/x.json"),
    ///     "https://proxy.example/?url=https%3A%2F%2Fa.test%2Fx.json"
    /// );
    /// assert_eq!(HttpTransportConfig::new().requested_url("https://a.test"), "https://a.test");
    /// ```
    #[must_use]
    pub fn requested_url(&self, url: &str) -> String {
        match &self.proxy_base {
            Some(base) => {
                let encoded: String = form_urlencoded::byte_serialize(url.as_bytes()).collect();
                format!("{base}{encoded}")
            }
            None => url.to_owned(),
        }
    }
}

/// HTTP implementation of [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Construct a direct transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] when the HTTP client cannot be
    /// initialised.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Construct a transport from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] when the HTTP client cannot be
    /// initialised.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| TransportError::Build { source })?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let requested_url = self.config.requested_url(url);
        let started_at = unix_millis();
        log::debug!("GET {requested_url}");
        let response = self
            .client
            .get(&requested_url)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(ACCEPT, "application/geo+json, application/json")
            .send()
            .await
            .map_err(|err| convert_reqwest_error(err, url))?;

        let status = response.status().as_u16();
        let from_cache = response
            .headers()
            .get(CACHE_STATUS_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("HIT"));
        let body = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(err, url))?;

        Ok(TransportResponse {
            status,
            body,
            diagnostics: FetchDiagnostics {
                url: url.to_owned(),
                requested_url,
                status,
                started_at,
                from_cache,
            },
        })
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        source: io::Error::other(error),
    }
}
