//! Error types emitted by the precincts CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use precinct_data::{ConfigurationError, FetchPrecinctsError, TransportError};
use thiserror::Error;

/// Errors emitted by the precincts CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// An option holds a value the command cannot use.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },
    /// The manifest file could not be read.
    #[error("failed to read manifest {path:?}: {source}")]
    ReadManifest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The manifest or the selected layer is unusable.
    #[error("manifest {path:?} is unusable: {source}")]
    Manifest {
        path: Utf8PathBuf,
        #[source]
        source: ConfigurationError,
    },
    /// No fetch plan could be resolved.
    #[error(transparent)]
    Plan(#[from] ConfigurationError),
    /// The HTTP transport could not be built.
    #[error("failed to build HTTP transport: {0}")]
    BuildTransport(#[source] TransportError),
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Fetching or merging precincts failed.
    #[error(transparent)]
    Fetch(#[from] FetchPrecinctsError),
    /// Strict mode rejected features with validation issues.
    #[error("{count} feature(s) failed validation")]
    InvalidFeatures { count: usize },
    /// Serialising the unified collection failed.
    #[error("failed to serialise collection: {0}")]
    SerialiseCollection(#[source] serde_json::Error),
    /// Writing the collection to the output file failed.
    #[error("failed to write collection to {path:?}: {source}")]
    WriteOutputFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing the collection to stdout failed.
    #[error("failed to write collection: {0}")]
    WriteOutput(#[source] std::io::Error),
}
