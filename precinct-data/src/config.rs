//! Resolution of layer configuration into an immutable fetch plan.

use precinct_core::{PartitionSource, SchemaDescriptor};

use crate::{ConfigurationError, LayerConfig};

/// Where a layer's features come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// One statewide resource; its failure is fatal.
    Single(String),
    /// Partitions named by the layer configuration.
    Partitioned(Vec<PartitionSource>),
    /// The jurisdiction's built-in partition list.
    PartitionedFallback(Vec<PartitionSource>),
}

impl FetchPlan {
    /// Partitions to fetch, or `None` for a statewide plan.
    #[must_use]
    pub fn partitions(&self) -> Option<&[PartitionSource]> {
        match self {
            Self::Single(_) => None,
            Self::Partitioned(sources) | Self::PartitionedFallback(sources) => Some(sources),
        }
    }
}

/// A resolved, immutable adapter configuration.
///
/// Only [`AdapterConfig::resolve`] builds one, so a partitioned plan always
/// names at least one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    plan: FetchPlan,
    schema: Option<SchemaDescriptor>,
}

impl AdapterConfig {
    /// Resolve `layer` against a built-in `fallback` partition list.
    ///
    /// A non-blank statewide URL wins. Otherwise a non-empty source list is
    /// used, and failing that, the fallback list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoPartitionSources`] when resolution
    /// falls back to an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_data::{AdapterConfig, FetchPlan, Jurisdiction, LayerConfig, Minnesota};
    ///
    /// let config = AdapterConfig::resolve(None, &Minnesota.fallback_sources())?;
    /// assert!(matches!(config.plan(), FetchPlan::PartitionedFallback(sources) if sources.len() == 8));
    ///
    /// let statewide = LayerConfig::statewide("https://a.test/all.json");
    /// let config = AdapterConfig::resolve(Some(&statewide), &[])?;
    /// assert_eq!(config.plan(), &FetchPlan::Single("https://a.test/all.json".to_owned()));
    /// # Ok::<(), precinct_data::ConfigurationError>(())
    /// ```
    pub fn resolve(
        layer: Option<&LayerConfig>,
        fallback: &[PartitionSource],
    ) -> Result<Self, ConfigurationError> {
        let schema = layer.and_then(|layer| layer.schema.clone());
        let plan = match layer {
            Some(layer) => {
                if let Some(url) = layer.statewide_url() {
                    FetchPlan::Single(url.to_owned())
                } else if layer.sources.is_empty() {
                    fallback_plan(fallback)?
                } else {
                    FetchPlan::Partitioned(layer.sources.clone())
                }
            }
            None => fallback_plan(fallback)?,
        };
        Ok(Self { plan, schema })
    }

    /// Replace the schema.
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sources to fetch.
    #[must_use]
    pub const fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    /// Schema applied to every fetched collection, if any.
    #[must_use]
    pub const fn schema(&self) -> Option<&SchemaDescriptor> {
        self.schema.as_ref()
    }
}

fn fallback_plan(fallback: &[PartitionSource]) -> Result<FetchPlan, ConfigurationError> {
    if fallback.is_empty() {
        return Err(ConfigurationError::NoPartitionSources);
    }
    Ok(FetchPlan::PartitionedFallback(fallback.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Jurisdiction, Minnesota};
    use rstest::{fixture, rstest};

    #[fixture]
    fn configured() -> Vec<PartitionSource> {
        vec![
            PartitionSource::new("north", "https://a.test/north.json"),
            PartitionSource::new("south", "https://a.test/south.json"),
        ]
    }

    #[rstest]
    fn statewide_url_takes_precedence(configured: Vec<PartitionSource>) {
        let mut layer = LayerConfig::partitioned(configured);
        layer.url = Some("https://a.test/all.json".to_owned());
        let config = AdapterConfig::resolve(Some(&layer), &Minnesota.fallback_sources())
            .expect("resolves");
        assert_eq!(config.plan(), &FetchPlan::Single("https://a.test/all.json".to_owned()));
        assert!(config.plan().partitions().is_none());
    }

    #[rstest]
    fn configured_sources_beat_fallback(configured: Vec<PartitionSource>) {
        let layer = LayerConfig::partitioned(configured.clone());
        let config = AdapterConfig::resolve(Some(&layer), &Minnesota.fallback_sources())
            .expect("resolves");
        assert_eq!(config.plan(), &FetchPlan::Partitioned(configured));
    }

    #[rstest]
    fn empty_sources_fall_back() {
        let layer = LayerConfig::default();
        let fallback = Minnesota.fallback_sources();
        let config = AdapterConfig::resolve(Some(&layer), &fallback).expect("resolves");
        assert_eq!(config.plan(), &FetchPlan::PartitionedFallback(fallback));
        assert!(config.schema().is_none());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(LayerConfig::default()))]
    #[case(Some(LayerConfig::partitioned(Vec::new())))]
    fn empty_fallback_is_a_configuration_error(#[case] layer: Option<LayerConfig>) {
        assert!(matches!(
            AdapterConfig::resolve(layer.as_ref(), &[]),
            Err(ConfigurationError::NoPartitionSources)
        ));
    }

    #[rstest]
    fn schema_is_carried_from_the_layer() {
        let layer = LayerConfig::statewide("https://a.test/all.json")
            .with_schema(Minnesota::default_schema());
        let config = AdapterConfig::resolve(Some(&layer), &[]).expect("resolves");
        assert_eq!(config.schema(), Some(&Minnesota::default_schema()));
    }
}
