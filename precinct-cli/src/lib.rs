//! Command-line interface for fetching unified precinct boundaries.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod demo;
mod error;
mod fetch;
mod logging;
mod report;

pub use error::CliError;

use demo::{DemoArgs, run_demo};
use fetch::{FetchArgs, run_fetch};

const ARG_MANIFEST: &str = "manifest";
const ARG_LAYER: &str = "layer";
const ARG_OUTPUT: &str = "output";
const ARG_PROXY: &str = "proxy";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_USER_AGENT: &str = "user-agent";
const ARG_REQUIRE: &str = "require";
const ARG_STRICT: &str = "strict";

/// Layer fetched when none is named.
const DEFAULT_LAYER: &str = "precincts";
/// Output file written by `demo` when none is named.
const DEFAULT_DEMO_OUTPUT: &str = "demo-mn-precincts.json";

/// Run the precincts CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init();
    match cli.command {
        Command::Fetch(args) => run_fetch(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "precincts",
    about = "Fetch precinct boundaries and emit one unified GeoJSON collection",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, transform, and merge the precinct layer named by a manifest.
    Fetch(FetchArgs),
    /// Run the pipeline against built-in sample partitions.
    Demo(DemoArgs),
}

#[cfg(test)]
mod tests;
