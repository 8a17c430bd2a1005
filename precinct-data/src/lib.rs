//! Fetching and merging precinct boundaries from remote sources.
//!
//! Responsibilities:
//! - Resolve a manifest layer into an immutable [`FetchPlan`].
//! - Fetch one statewide resource or fan out across partitions through an
//!   injected [`Transport`].
//! - Classify unusable responses uniformly and merge survivors in plan order.
//!
//! Boundaries:
//! - Schema rules live in `precinct-core`; this crate only applies them.
//! - No persistent caching. Timeouts and proxying are transport settings.
//!
//! Invariants:
//! - Merge order follows the resolved source list, never completion order.
//! - No global mutable state; diagnostics travel with each response.
//!
//! # Example
//!
//! ```
//! use precinct_data::test_support::StubTransport;
//! use precinct_data::{AdapterConfig, LayerConfig, Minnesota, fetch_precincts};
//! use serde_json::json;
//!
//! let layer = LayerConfig::statewide("https://example.test/mn.json");
//! let config = AdapterConfig::resolve(Some(&layer), &[])?;
//! let transport = StubTransport::new().with_json(
//!     "https://example.test/mn.json",
//!     json!({"type": "FeatureCollection", "features": []}),
//! );
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let collection = runtime.block_on(fetch_precincts(&config, &Minnesota, &transport))?;
//! assert_eq!(collection.metadata.state, "MN");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]

mod config;
mod error;
mod fetch;
mod http;
mod jurisdiction;
mod manifest;
mod source;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use config::{AdapterConfig, FetchPlan};
pub use error::{
    ConfigurationError, FetchPrecinctsError, PartitionFailure, SourceFetchError, TransportError,
};
pub use fetch::{FetchReport, SourceAttempt, fetch_precincts, fetch_precincts_with_report};
pub use http::{DEFAULT_USER_AGENT, HttpTransport, HttpTransportConfig};
pub use jurisdiction::{Jurisdiction, Minnesota};
pub use manifest::{LayerConfig, Manifest, StateInfo};
pub use source::{FetchedSource, fetch_source};
pub use transport::{FetchDiagnostics, Transport, TransportResponse};
