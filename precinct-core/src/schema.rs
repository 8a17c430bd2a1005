//! Schema descriptors: how one jurisdiction's raw attributes map onto the
//! unified precinct shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::SchemaError;
use crate::error::json_type_name;

/// Geometry normalisation applied while transforming features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryTransform {
    /// Leave geometries untouched (`"none"`).
    #[default]
    #[serde(rename = "none")]
    Identity,
    /// Collapse polygon-bearing collections and single polygons into
    /// multipolygons (`"geometryCollection_to_multiPolygon"`).
    #[serde(rename = "geometryCollection_to_multiPolygon")]
    GeometryCollectionToMultiPolygon,
}

/// Ordered mapping from unified property names to raw source keys.
///
/// Target names are unique; inserting an existing target replaces its
/// source key in place. Iteration follows insertion order, which is also
/// the property order of transformed features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Map `target` to the raw key `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_core::PropertyMap;
    ///
    /// let map = PropertyMap::new()
    ///     .with("county", "County")
    ///     .with("precinct_id", "PrecinctID")
    ///     .with("county", "CountyName");
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [("county", "CountyName"), ("precinct_id", "PrecinctID")]);
    /// ```
    #[must_use]
    pub fn with(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(target.into(), source.into());
        self
    }

    /// Iterate `(target, source)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(target, source)| (target.as_str(), source.as_str()))
    }

    /// Unified property names in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(target, _)| target.as_str())
    }

    /// Number of mapped properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no properties are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, target: String, source: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == target) {
            Some(entry) => entry.1 = source,
            None => self.entries.push((target, source)),
        }
    }
}

impl<T, S> FromIterator<(T, S)> for PropertyMap
where
    T: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, S)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (target, source) in iter {
            map.insert(target.into(), source.into());
        }
        map
    }
}

impl TryFrom<Map<String, Value>> for PropertyMap {
    type Error = SchemaError;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for (target, source) in raw {
            match source {
                Value::String(key) => map.insert(target, key),
                other => {
                    return Err(SchemaError::NonStringSource {
                        target,
                        found: json_type_name(&other).to_owned(),
                    });
                }
            }
        }
        Ok(map)
    }
}

impl From<PropertyMap> for Map<String, Value> {
    fn from(map: PropertyMap) -> Self {
        map.entries
            .into_iter()
            .map(|(target, source)| (target, Value::String(source)))
            .collect()
    }
}

/// Declarative description of a jurisdiction's raw schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    /// Unified property name to raw key.
    #[serde(default)]
    pub property_map: PropertyMap,
    /// Geometry normalisation to apply.
    #[serde(default)]
    pub geometry_transform: GeometryTransform,
}

impl SchemaDescriptor {
    /// Build a descriptor from its parts.
    #[must_use]
    pub const fn new(property_map: PropertyMap, geometry_transform: GeometryTransform) -> Self {
        Self {
            property_map,
            geometry_transform,
        }
    }
}
