//! The fetch-merge orchestrator.
//!
//! A statewide plan issues one request and propagates its failure. A
//! partitioned plan issues every request at once, awaits them all, skips
//! the failures, and merges the survivors in plan order.

use futures_util::future::join_all;
use precinct_core::{
    FeatureCollection, PartitionSource, SchemaDescriptor, UnifiedFeatureCollection,
    merge_feature_collections,
};

use crate::source::fetch_with_diagnostics;
use crate::{
    AdapterConfig, FetchDiagnostics, FetchPlan, FetchPrecinctsError, FetchedSource, Jurisdiction,
    PartitionFailure, Transport,
};

const STATEWIDE_ID: &str = "statewide";

/// What happened to one source during a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    /// Partition identifier, or `statewide`.
    pub id: String,
    /// Source URL.
    pub url: String,
    /// Diagnostics, when a response arrived.
    pub diagnostics: Option<FetchDiagnostics>,
    /// Why the source was skipped, if it was.
    pub failure: Option<String>,
}

impl SourceAttempt {
    /// Returns `true` when the source contributed features.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Per-source outcomes of a successful fetch, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// One entry per attempted source.
    pub attempts: Vec<SourceAttempt>,
}

impl FetchReport {
    /// Number of sources attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempts.len()
    }

    /// Number of sources that contributed features.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.attempts
            .iter()
            .filter(|attempt| attempt.succeeded())
            .count()
    }
}

/// Fetch every source in `config`, transform, merge, and attach metadata.
///
/// `jurisdiction.metadata()` is consulted after the fetches settle.
///
/// # Errors
///
/// Returns [`FetchPrecinctsError::Statewide`] when a statewide plan's only
/// source fails, and [`FetchPrecinctsError::AllSourcesFailed`] when no
/// partition succeeds.
pub async fn fetch_precincts<J, T>(
    config: &AdapterConfig,
    jurisdiction: &J,
    transport: &T,
) -> Result<UnifiedFeatureCollection, FetchPrecinctsError>
where
    J: Jurisdiction + ?Sized,
    T: Transport + ?Sized,
{
    fetch_precincts_with_report(config, jurisdiction, transport)
        .await
        .map(|(collection, _)| collection)
}

/// Like [`fetch_precincts`] but also returns a [`FetchReport`].
///
/// # Errors
///
/// See [`fetch_precincts`].
pub async fn fetch_precincts_with_report<J, T>(
    config: &AdapterConfig,
    jurisdiction: &J,
    transport: &T,
) -> Result<(UnifiedFeatureCollection, FetchReport), FetchPrecinctsError>
where
    J: Jurisdiction + ?Sized,
    T: Transport + ?Sized,
{
    let (merged, report) = match config.plan() {
        FetchPlan::Single(url) => fetch_statewide(url, config.schema(), transport).await?,
        FetchPlan::Partitioned(sources) | FetchPlan::PartitionedFallback(sources) => {
            fetch_partitions(sources, config.schema(), transport).await?
        }
    };
    Ok((merged.with_metadata(jurisdiction.metadata()), report))
}

async fn fetch_statewide<T>(
    url: &str,
    schema: Option<&SchemaDescriptor>,
    transport: &T,
) -> Result<(FeatureCollection, FetchReport), FetchPrecinctsError>
where
    T: Transport + ?Sized,
{
    log::debug!("fetching statewide precincts from {url}");
    let (diagnostics, outcome) = fetch_with_diagnostics(transport, url).await;
    let fetched = outcome.map_err(|source| FetchPrecinctsError::Statewide { source })?;
    let collection = unify(fetched, schema);
    log::info!(
        "fetched {} statewide features",
        collection.features.len()
    );
    let report = FetchReport {
        attempts: vec![SourceAttempt {
            id: STATEWIDE_ID.to_owned(),
            url: url.to_owned(),
            diagnostics,
            failure: None,
        }],
    };
    Ok((collection, report))
}

async fn fetch_partitions<T>(
    sources: &[PartitionSource],
    schema: Option<&SchemaDescriptor>,
    transport: &T,
) -> Result<(FeatureCollection, FetchReport), FetchPrecinctsError>
where
    T: Transport + ?Sized,
{
    let settled = join_all(sources.iter().map(|source| async move {
        log::debug!("fetching partition {} from {}", source.id, source.url);
        fetch_with_diagnostics(transport, &source.url).await
    }))
    .await;

    let mut collections = Vec::with_capacity(sources.len());
    let mut attempts = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();
    for (source, (diagnostics, outcome)) in sources.iter().zip(settled) {
        let failure = match outcome {
            Ok(fetched) => {
                collections.push(Some(unify(fetched, schema)));
                None
            }
            Err(error) => {
                log::warn!("skipping partition {}: {error}", source.id);
                let message = error.to_string();
                failures.push(PartitionFailure {
                    id: source.id.clone(),
                    error,
                });
                collections.push(None);
                Some(message)
            }
        };
        attempts.push(SourceAttempt {
            id: source.id.clone(),
            url: source.url.clone(),
            diagnostics,
            failure,
        });
    }

    let report = FetchReport { attempts };
    log::info!(
        "fetched {} of {} partitions",
        report.succeeded(),
        report.attempted()
    );
    if report.succeeded() == 0 {
        return Err(FetchPrecinctsError::AllSourcesFailed {
            attempted: report.attempted(),
            failures,
        });
    }
    Ok((merge_feature_collections(collections), report))
}

fn unify(fetched: FetchedSource, schema: Option<&SchemaDescriptor>) -> FeatureCollection {
    match schema {
        Some(schema) => fetched.collection.transform(schema),
        None => fetched.collection.into_unified(),
    }
}
