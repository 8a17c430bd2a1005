//! Manifest documents describing where each layer's data lives.

use precinct_core::{PartitionSource, SchemaDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigurationError;

/// State identity recorded in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    /// Two-letter state code.
    pub code: String,
    /// Human-readable state name.
    pub name: String,
}

/// A manifest document.
///
/// Layers are kept as raw JSON and decoded on lookup, so one malformed
/// layer does not prevent using the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// State identity, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateInfo>,
    /// Manifest version, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Layer definitions by name.
    #[serde(default)]
    pub layers: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ParseManifest`] when `text` is not a
    /// manifest document.
    pub fn from_json(text: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(text).map_err(|source| ConfigurationError::ParseManifest { source })
    }

    /// Decode the layer called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingLayer`] when the layer is absent,
    /// [`ConfigurationError::InvalidLayer`] when it cannot be decoded, and
    /// [`ConfigurationError::LayerUnavailable`] when it is marked
    /// unavailable.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_data::{ConfigurationError, Manifest};
    ///
    /// let manifest = Manifest::from_json(r#"{"layers": {"precincts": {"available": false}}}"#)?;
    /// assert!(matches!(
    ///     manifest.layer("precincts"),
    ///     Err(ConfigurationError::LayerUnavailable { .. })
    /// ));
    /// # Ok::<(), ConfigurationError>(())
    /// ```
    pub fn layer(&self, name: &str) -> Result<LayerConfig, ConfigurationError> {
        let raw = self
            .layers
            .get(name)
            .ok_or_else(|| ConfigurationError::MissingLayer {
                layer: name.to_owned(),
            })?;
        let layer = LayerConfig::deserialize(raw).map_err(|source| {
            ConfigurationError::InvalidLayer {
                layer: name.to_owned(),
                source,
            }
        })?;
        if layer.available {
            Ok(layer)
        } else {
            Err(ConfigurationError::LayerUnavailable {
                layer: name.to_owned(),
            })
        }
    }
}

/// One layer's source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Whether the layer may be used. Absent means available.
    #[serde(default = "available_by_default")]
    pub available: bool,
    /// Statewide URL, preferred over partitions when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Partition sources in merge order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<PartitionSource>,
    /// Schema applied to fetched features. Absent means pass-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDescriptor>,
}

const fn available_by_default() -> bool {
    true
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            available: true,
            url: None,
            sources: Vec::new(),
            schema: None,
        }
    }
}

impl LayerConfig {
    /// A layer served from one statewide URL.
    #[must_use]
    pub fn statewide(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// A layer split across partitions.
    #[must_use]
    pub fn partitioned(sources: Vec<PartitionSource>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Attach a schema.
    #[must_use]
    pub fn with_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Statewide URL, ignoring blank values.
    #[must_use]
    pub fn statewide_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use precinct_core::GeometryTransform;
    use rstest::{fixture, rstest};

    #[fixture]
    fn manifest() -> Manifest {
        Manifest::from_json(
            r#"{
                "state": {"code": "MN", "name": "Minnesota"},
                "version": "1.0.0",
                "layers": {
                    "precincts": {
                        "sources": [
                            {"id": "cd1", "url": "https://example.test/cd1.json"},
                            {"id": "cd2", "url": "https://example.test/cd2.json"}
                        ],
                        "schema": {
                            "propertyMap": {"precinct_id": "PrecinctID"},
                            "geometryTransform": "geometryCollection_to_multiPolygon"
                        }
                    },
                    "counties": {"available": false, "url": "https://example.test/c.json"},
                    "wards": {"schema": {"geometryTransform": "explode"}}
                }
            }"#,
        )
        .expect("manifest fixture parses")
    }

    #[rstest]
    fn decodes_partitioned_layer(manifest: Manifest) {
        let layer = manifest.layer("precincts").expect("layer decodes");
        assert!(layer.available);
        assert_eq!(layer.sources.len(), 2);
        assert_eq!(
            layer.schema.map(|schema| schema.geometry_transform),
            Some(GeometryTransform::GeometryCollectionToMultiPolygon)
        );
        assert_eq!(
            manifest.state.map(|state| state.code),
            Some("MN".to_owned())
        );
    }

    #[rstest]
    #[case("counties", "unavailable")]
    #[case("wards", "invalid")]
    #[case("districts", "missing")]
    fn lookup_failures_are_distinguished(manifest: Manifest, #[case] name: &str, #[case] kind: &str) {
        let outcome = manifest.layer(name);
        let actual = match outcome {
            Err(ConfigurationError::LayerUnavailable { .. }) => "unavailable",
            Err(ConfigurationError::InvalidLayer { .. }) => "invalid",
            Err(ConfigurationError::MissingLayer { .. }) => "missing",
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(actual, kind);
    }

    #[rstest]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(
            Manifest::from_json("[]"),
            Err(ConfigurationError::ParseManifest { .. })
        ));
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    #[case(Some("https://a.test"), Some("https://a.test"))]
    fn blank_statewide_urls_are_ignored(#[case] url: Option<&str>, #[case] expected: Option<&str>) {
        let layer = LayerConfig {
            url: url.map(str::to_owned),
            ..LayerConfig::default()
        };
        assert_eq!(layer.statewide_url(), expected);
    }
}
