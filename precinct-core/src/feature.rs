//! GeoJSON features with free-form properties.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{ForeignMembers, Geometry};

/// Property bag attached to a feature, in insertion order.
pub type Properties = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

/// A single GeoJSON feature.
///
/// Missing or `null` properties decode as an empty map. A missing geometry
/// decodes as `None` and serialises as `null`. Any other members, such as
/// `bbox`, are kept in [`Feature::foreign`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    /// Optional feature identifier carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Attribute map.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    /// Boundary geometry.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Members outside the GeoJSON feature core.
    #[serde(flatten)]
    pub foreign: ForeignMembers,
}

impl Feature {
    /// Build a feature from its properties and geometry.
    #[must_use]
    pub fn new(properties: Properties, geometry: Option<Geometry>) -> Self {
        Self {
            tag: FeatureTag::Feature,
            id: None,
            properties,
            geometry,
            foreign: ForeignMembers::new(),
        }
    }

    /// Attach an identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Look up a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Properties>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"type": "Feature", "properties": null, "geometry": null}))]
    #[case(json!({"type": "Feature"}))]
    fn absent_properties_decode_as_empty(#[case] value: Value) {
        let feature: Feature = serde_json::from_value(value).expect("decode feature");
        assert!(feature.properties.is_empty());
        assert!(feature.geometry.is_none());
    }

    #[rstest]
    fn foreign_type_is_rejected() {
        let outcome = serde_json::from_value::<Feature>(json!({"type": "Point"}));
        assert!(outcome.is_err());
    }

    #[rstest]
    fn foreign_members_round_trip() {
        let value = json!({
            "type": "Feature",
            "bbox": [0, 0, 1, 1],
            "properties": {"A": 1},
            "geometry": null,
            "title": "ward 3"
        });
        let feature: Feature = serde_json::from_value(value.clone()).expect("decode feature");
        assert_eq!(feature.foreign.get("bbox"), Some(&json!([0, 0, 1, 1])));
        assert_eq!(feature.foreign.len(), 2);
        assert_eq!(serde_json::to_value(&feature).expect("serialise"), value);
    }

    #[rstest]
    fn serialises_type_tag_and_null_geometry() {
        let feature = Feature::new(Properties::new(), None);
        let value = serde_json::to_value(&feature).expect("serialise feature");
        assert_eq!(
            value,
            json!({"type": "Feature", "properties": {}, "geometry": null})
        );
    }
}
