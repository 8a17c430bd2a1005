//! Demo command: the full pipeline against sample partitions held in memory.

use std::io;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use precinct_core::{PartitionSource, UnifiedFeatureCollection};
use precinct_data::{
    AdapterConfig, FetchDiagnostics, Jurisdiction, Minnesota, Transport, TransportError,
    TransportResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::report::{Checks, execute_plan, write_collection_file};
use crate::{ARG_OUTPUT, CliError, DEFAULT_DEMO_OUTPUT};

/// CLI arguments for the `demo` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Serve one sample polygon per built-in Minnesota district \
                 from memory, run it through the fetch, transform, and \
                 merge pipeline, and write the result. No network access.",
    about = "Write a sample unified collection without touching the network"
)]
#[ortho_config(prefix = "PRECINCTS")]
pub(crate) struct DemoArgs {
    /// Output file (default `demo-mn-precincts.json`).
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl DemoArgs {
    fn into_output(self) -> Result<Utf8PathBuf, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(merged
            .output
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DEMO_OUTPUT)))
    }
}

/// Serves a one-feature collection for every known partition URL.
#[derive(Debug, Clone)]
pub(crate) struct DemoTransport {
    sources: Vec<PartitionSource>,
}

impl DemoTransport {
    pub(crate) const fn new(sources: Vec<PartitionSource>) -> Self {
        Self { sources }
    }
}

#[async_trait(?Send)]
impl Transport for DemoTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.url == url)
            .ok_or_else(|| TransportError::Network {
                url: url.to_owned(),
                source: io::Error::new(io::ErrorKind::NotFound, "no demo partition for URL"),
            })?;
        Ok(TransportResponse {
            status: 200,
            body: sample_collection(source.district()).to_string(),
            diagnostics: FetchDiagnostics::direct(url, 200),
        })
    }
}

/// One square precinct labelled with `district`.
pub(crate) fn sample_collection(district: &str) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "PrecinctID": format!("000{district}"),
                "Precinct": format!("Sample Precinct CD{district}"),
                "County": "Sample County",
                "CongDist": district
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-93.1, 45.0], [-93.0, 45.0], [-93.0, 45.1], [-93.1, 45.1], [-93.1, 45.0]
                ]]
            }
        }]
    })
}

/// Run the Minnesota fallback plan against [`DemoTransport`].
pub(crate) fn demo_collection() -> Result<UnifiedFeatureCollection, CliError> {
    let sources = Minnesota.fallback_sources();
    let plan = AdapterConfig::resolve(None, &sources)?.with_schema(Minnesota::default_schema());
    let transport = DemoTransport::new(sources);
    execute_plan(&plan, &transport, &Checks::default())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), CliError> {
    let output = args.into_output()?;
    let collection = demo_collection()?;
    write_collection_file(&collection, &output)
}
