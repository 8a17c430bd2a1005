//! Fetch command implementation for the precincts CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use precinct_data::{
    AdapterConfig, HttpTransport, HttpTransportConfig, Jurisdiction, LayerConfig, Manifest,
    Minnesota, Transport,
};
use serde::{Deserialize, Serialize};

use crate::report::{Checks, emit_collection, execute_plan};
use crate::{
    ARG_LAYER, ARG_MANIFEST, ARG_OUTPUT, ARG_PROXY, ARG_REQUIRE, ARG_STRICT, ARG_TIMEOUT_SECS,
    ARG_USER_AGENT, CliError, DEFAULT_LAYER,
};

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a layer from a manifest, fetch its statewide resource or \
                 every partition, apply the layer schema, and write one \
                 unified FeatureCollection. Without a manifest the built-in \
                 Minnesota districts and default schema are used.",
    about = "Fetch and merge a precinct layer"
)]
#[ortho_config(prefix = "PRECINCTS")]
pub(crate) struct FetchArgs {
    /// Path to the manifest JSON document.
    #[arg(long = ARG_MANIFEST, value_name = "path")]
    #[serde(default)]
    pub(crate) manifest: Option<Utf8PathBuf>,
    /// Manifest layer to fetch (default `precincts`).
    #[arg(long = ARG_LAYER, value_name = "name")]
    #[serde(default)]
    pub(crate) layer: Option<String>,
    /// Write the collection here instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Proxy prefix; the percent-encoded source URL is appended to it.
    #[arg(long = ARG_PROXY, value_name = "url")]
    #[serde(default)]
    pub(crate) proxy: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent with every request.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Comma-separated unified properties every feature must carry.
    #[arg(long = ARG_REQUIRE, value_name = "keys")]
    #[serde(default)]
    pub(crate) require: Option<String>,
    /// Fail when any feature has validation issues.
    #[arg(long = ARG_STRICT)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) strict: bool,
}

impl FetchArgs {
    pub(crate) fn into_config(self) -> Result<FetchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FetchConfig::try_from(merged)
    }
}

/// Resolved `fetch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchConfig {
    /// Manifest to read, if any.
    pub(crate) manifest: Option<Utf8PathBuf>,
    /// Layer looked up in the manifest.
    pub(crate) layer: String,
    /// Output file; stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Settings for the HTTP transport.
    pub(crate) transport: HttpTransportConfig,
    /// Post-fetch validation.
    pub(crate) checks: Checks,
}

impl TryFrom<FetchArgs> for FetchConfig {
    type Error = CliError;

    fn try_from(args: FetchArgs) -> Result<Self, Self::Error> {
        let layer = args.layer.unwrap_or_else(|| DEFAULT_LAYER.to_owned());
        if layer.trim().is_empty() {
            return Err(CliError::InvalidArgument {
                field: ARG_LAYER,
                reason: "layer name must not be blank",
            });
        }

        let mut transport = HttpTransportConfig::new();
        if let Some(proxy) = args.proxy.filter(|proxy| !proxy.trim().is_empty()) {
            transport = transport.with_proxy(proxy);
        }
        match args.timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    reason: "timeout must be at least one second",
                });
            }
            Some(secs) => transport = transport.with_timeout(Duration::from_secs(secs)),
            None => {}
        }
        if let Some(user_agent) = args.user_agent {
            transport = transport.with_user_agent(user_agent);
        }

        Ok(Self {
            manifest: args.manifest,
            layer,
            output: args.output,
            transport,
            checks: Checks::new(args.require.as_deref(), args.strict),
        })
    }
}

/// Builds the transport used for the current fetch invocation.
pub(crate) trait FetchTransportBuilder {
    fn build(&self, config: &HttpTransportConfig) -> Result<Box<dyn Transport>, CliError>;
}

pub(crate) struct DefaultFetchTransportBuilder;

impl FetchTransportBuilder for DefaultFetchTransportBuilder {
    fn build(&self, config: &HttpTransportConfig) -> Result<Box<dyn Transport>, CliError> {
        let transport =
            HttpTransport::with_config(config.clone()).map_err(CliError::BuildTransport)?;
        Ok(Box::new(transport))
    }
}

pub(crate) fn run_fetch(args: FetchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_fetch_with(args, &DefaultFetchTransportBuilder, &mut stdout)
}

pub(crate) fn run_fetch_with(
    args: FetchArgs,
    builder: &dyn FetchTransportBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let plan = resolve_plan(&config)?;
    let transport = builder.build(&config.transport)?;
    let collection = execute_plan(&plan, transport.as_ref(), &config.checks)?;
    emit_collection(&collection, config.output.as_deref(), writer)
}

/// Resolve the fetch plan for `config` against the Minnesota profile.
///
/// Without a manifest the built-in partitions and default schema apply.
pub(crate) fn resolve_plan(config: &FetchConfig) -> Result<AdapterConfig, CliError> {
    let fallback = Minnesota.fallback_sources();
    match &config.manifest {
        Some(path) => {
            let layer = load_layer(path, &config.layer)?;
            Ok(AdapterConfig::resolve(Some(&layer), &fallback)?)
        }
        None => {
            log::debug!("no manifest given; using built-in Minnesota partitions");
            Ok(AdapterConfig::resolve(None, &fallback)?.with_schema(Minnesota::default_schema()))
        }
    }
}

/// Read `path` as a manifest and look up `layer`.
pub(crate) fn load_layer(path: &Utf8Path, layer: &str) -> Result<LayerConfig, CliError> {
    let text = precinct_fs::read_utf8(path).map_err(|source| CliError::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;
    Manifest::from_json(&text)
        .and_then(|manifest| manifest.layer(layer))
        .map_err(|source| CliError::Manifest {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<FetchConfig, CliError> {
    let merged = FetchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    FetchConfig::try_from(merged)
}
