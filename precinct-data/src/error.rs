//! Error types produced while resolving configuration and fetching sources.

use std::io;

use precinct_core::TransformError;
use thiserror::Error;

/// Transport-level errors encountered while issuing HTTP requests.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status the transport refused to read.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
        message: String,
    },
    /// The request failed due to an I/O error.
    #[error("network error contacting {url}: {source}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// I/O error reported by the transport.
        source: io::Error,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Build {
        /// Client builder failure.
        source: reqwest::Error,
    },
}

/// Why a single source could not contribute features.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceFetchError {
    /// The transport failed before a response arrived.
    #[error(transparent)]
    Transport {
        /// Underlying transport failure.
        #[from]
        source: TransportError,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body was an HTML page, typically an anti-bot challenge.
    #[error("{url} returned an HTML page instead of GeoJSON")]
    HtmlBody {
        /// Requested URL.
        url: String,
    },
    /// The body was not valid JSON.
    #[error("{url} returned invalid JSON: {source}")]
    InvalidJson {
        /// Requested URL.
        url: String,
        /// Parser failure.
        source: serde_json::Error,
    },
    /// The JSON was not a feature collection.
    #[error("{url} returned a malformed feature collection: {source}")]
    Malformed {
        /// Requested URL.
        url: String,
        /// Shape check failure.
        source: TransformError,
    },
}

/// A partition that was skipped, with its cause.
#[derive(Debug)]
pub struct PartitionFailure {
    /// Partition identifier.
    pub id: String,
    /// Why the partition was skipped.
    pub error: SourceFetchError,
}

/// Fatal outcomes of [`fetch_precincts`](crate::fetch_precincts).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchPrecinctsError {
    /// The statewide source failed; there is no fallback.
    #[error("statewide source failed: {source}")]
    Statewide {
        /// Underlying source failure.
        source: SourceFetchError,
    },
    /// Every partition failed.
    #[error("no data from any of {attempted} partitions")]
    AllSourcesFailed {
        /// Number of partitions attempted.
        attempted: usize,
        /// Per-partition causes in plan order.
        failures: Vec<PartitionFailure>,
    },
}

/// Configuration that cannot yield a fetch plan.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Neither the layer nor the jurisdiction supplied any partition sources.
    #[error("no statewide URL and no partition sources are configured")]
    NoPartitionSources,
    /// The manifest document could not be parsed.
    #[error("failed to parse manifest: {source}")]
    ParseManifest {
        /// Parser failure.
        source: serde_json::Error,
    },
    /// The manifest has no layer with this name.
    #[error("layer '{layer}' is not defined in the manifest")]
    MissingLayer {
        /// Requested layer name.
        layer: String,
    },
    /// The layer is marked unavailable.
    #[error("layer '{layer}' is marked unavailable")]
    LayerUnavailable {
        /// Requested layer name.
        layer: String,
    },
    /// The layer definition is malformed.
    #[error("layer '{layer}' is invalid: {source}")]
    InvalidLayer {
        /// Requested layer name.
        layer: String,
        /// Decoder failure.
        source: serde_json::Error,
    },
}
