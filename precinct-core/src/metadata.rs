//! Provenance attached to unified collections and partition descriptors.

use serde::{Deserialize, Serialize};

/// Provenance and licensing details for a jurisdiction's dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Two-letter state code.
    pub state: String,
    /// Human-readable state name.
    pub state_name: String,
    /// Publishing authority.
    pub source: String,
    /// Landing page for the dataset.
    pub source_url: String,
    /// Licence or terms statement.
    pub license: String,
    /// Layers offered by this jurisdiction.
    #[serde(default)]
    pub layers: Vec<String>,
    /// Redistribution or usage note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One geographic partition of a layer, fetched independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionSource {
    /// Short identifier such as `cd1`.
    pub id: String,
    /// Absolute URL of the partition's GeoJSON.
    pub url: String,
}

impl PartitionSource {
    /// Build a partition descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// District label derived from the identifier by dropping a leading `cd`.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_core::PartitionSource;
    ///
    /// assert_eq!(PartitionSource::new("cd7", "https://example.test/7.json").district(), "7");
    /// assert_eq!(PartitionSource::new("north", "https://example.test/n.json").district(), "north");
    /// ```
    #[must_use]
    pub fn district(&self) -> &str {
        self.id.strip_prefix("cd").unwrap_or(&self.id)
    }
}
