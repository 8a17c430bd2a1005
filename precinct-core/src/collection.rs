//! Feature collections: raw inputs and unified outputs.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::json_type_name;
use crate::{Feature, SourceMetadata, TransformError};

/// Name assigned to every unified collection.
pub const UNIFIED_COLLECTION_NAME: &str = "full";

/// URN of the WGS 84 longitude/latitude reference system.
pub const CRS84_NAME: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// The fixed CRS84 named-CRS object emitted on unified collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crs84;

impl Serialize for Crs84 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Named {
            name: &'static str,
        }

        let mut state = serializer.serialize_struct("Crs", 2)?;
        state.serialize_field("type", "name")?;
        state.serialize_field("properties", &Named { name: CRS84_NAME })?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// A raw collection as published by a jurisdiction.
///
/// Only the `features` member is retained; other top-level members are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeatureCollection {
    /// Features in source order.
    pub features: Vec<Feature>,
}

impl RawFeatureCollection {
    /// Decode a raw collection from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NotAnObject`] when `value` is not an object,
    /// [`TransformError::MissingFeatures`] when `features` is absent or not
    /// an array, and [`TransformError::InvalidFeature`] when a member cannot
    /// be decoded.
    pub fn from_value(value: Value) -> Result<Self, TransformError> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(TransformError::NotAnObject {
                    found: json_type_name(&other),
                });
            }
        };
        let Some(Value::Array(members)) = object.remove("features") else {
            return Err(TransformError::MissingFeatures);
        };
        let features = members
            .into_iter()
            .enumerate()
            .map(|(index, member)| {
                serde_json::from_value(member)
                    .map_err(|source| TransformError::InvalidFeature { index, source })
            })
            .collect::<Result<Vec<Feature>, _>>()?;
        Ok(Self { features })
    }

    /// Wrap the features, unchanged, in a unified envelope.
    #[must_use]
    pub fn into_unified(self) -> FeatureCollection {
        FeatureCollection::new(self.features)
    }
}

impl TryFrom<Value> for RawFeatureCollection {
    type Error = TransformError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// A collection in the unified shape, without provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    tag: CollectionTag,
    /// Always [`UNIFIED_COLLECTION_NAME`].
    pub name: String,
    /// Always CRS84.
    pub crs: Crs84,
    /// Features in order.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Build a unified collection over `features`.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            name: UNIFIED_COLLECTION_NAME.to_owned(),
            crs: Crs84,
            features,
        }
    }

    /// An empty unified collection.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Attach provenance, producing the final output shape.
    #[must_use]
    pub fn with_metadata(self, metadata: SourceMetadata) -> UnifiedFeatureCollection {
        UnifiedFeatureCollection {
            tag: self.tag,
            name: self.name,
            metadata,
            crs: self.crs,
            features: self.features,
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}

/// The final output: a unified collection carrying provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedFeatureCollection {
    #[serde(rename = "type")]
    tag: CollectionTag,
    /// Always [`UNIFIED_COLLECTION_NAME`].
    pub name: String,
    /// Provenance of the features.
    pub metadata: SourceMetadata,
    /// Always CRS84.
    pub crs: Crs84,
    /// Features in order.
    pub features: Vec<Feature>,
}
