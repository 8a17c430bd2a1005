//! Shared pipeline steps: run a plan, log what happened, write the result.

use std::io::Write;

use camino::Utf8Path;
use precinct_core::{CollectionSummary, UnifiedFeatureCollection, validate_feature};
use precinct_data::{
    AdapterConfig, FetchReport, Minnesota, Transport, fetch_precincts_with_report,
};

use crate::CliError;

/// Validation applied to every fetched feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Checks {
    /// Unified properties that must be present and non-empty.
    pub(crate) required: Vec<String>,
    /// Turn validation issues into an error.
    pub(crate) strict: bool,
}

impl Checks {
    pub(crate) fn new(required: Option<&str>, strict: bool) -> Self {
        let required = required
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Self { required, strict }
    }

    /// Log every issue and return the number of features with issues.
    fn inspect(&self, collection: &UnifiedFeatureCollection) -> usize {
        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();
        let mut flagged = 0;
        for (index, feature) in collection.features.iter().enumerate() {
            let issues = validate_feature(feature, &required);
            if issues.is_empty() {
                continue;
            }
            flagged += 1;
            for issue in issues {
                log::warn!("feature {index}: {issue}");
            }
        }
        flagged
    }
}

/// Fetch `plan` through `transport`, then log and check the result.
pub(crate) fn execute_plan(
    plan: &AdapterConfig,
    transport: &dyn Transport,
    checks: &Checks,
) -> Result<UnifiedFeatureCollection, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let (collection, report) =
        runtime.block_on(fetch_precincts_with_report(plan, &Minnesota, transport))?;
    log_report(&report);
    log_summary(&CollectionSummary::of(&collection.features));

    let flagged = checks.inspect(&collection);
    if flagged > 0 {
        if checks.strict {
            return Err(CliError::InvalidFeatures { count: flagged });
        }
        log::warn!("{flagged} feature(s) have validation issues");
    }
    Ok(collection)
}

fn log_report(report: &FetchReport) {
    for attempt in &report.attempts {
        let cached = attempt
            .diagnostics
            .as_ref()
            .is_some_and(|diagnostics| diagnostics.from_cache);
        match &attempt.failure {
            None => log::debug!("{} ok (cached: {cached})", attempt.id),
            Some(reason) => log::warn!("{} skipped: {reason}", attempt.id),
        }
    }
}

fn log_summary(summary: &CollectionSummary) {
    log::info!(
        "{} features: {} polygons, {} multipolygons, {} other",
        summary.features,
        summary.polygons,
        summary.multi_polygons,
        summary.geometry_collections + summary.other_geometries + summary.missing_geometries,
    );
    if let Some(bounds) = summary.bounds {
        log::info!(
            "bounds: ({}, {}) to ({}, {})",
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y,
        );
    }
}

/// Write `collection` as pretty JSON to `output`, or to `writer` when no
/// output path is set.
pub(crate) fn emit_collection(
    collection: &UnifiedFeatureCollection,
    output: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match output {
        Some(path) => write_collection_file(collection, path),
        None => writer
            .write_all(render(collection)?.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}

/// Write `collection` as pretty JSON to `path`, creating parent directories.
pub(crate) fn write_collection_file(
    collection: &UnifiedFeatureCollection,
    path: &Utf8Path,
) -> Result<(), CliError> {
    precinct_fs::write_utf8(path, render(collection)?.as_bytes()).map_err(|source| {
        CliError::WriteOutputFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::info!("wrote {} features to {path}", collection.features.len());
    Ok(())
}

fn render(collection: &UnifiedFeatureCollection) -> Result<String, CliError> {
    let mut payload =
        serde_json::to_string_pretty(collection).map_err(CliError::SerialiseCollection)?;
    payload.push('\n');
    Ok(payload)
}
