//! GeoJSON geometry values relevant to precinct boundaries.
//!
//! Only the shapes the transform engine acts on are recognised. Recognised
//! shapes keep their source object, so members such as `bbox` and the
//! exact coordinate values survive a round trip untouched. Everything else
//! is carried as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A single coordinate tuple, typically `[longitude, latitude]`.
pub type Position = Vec<f64>;
/// A closed ring of positions.
pub type Ring = Vec<Position>;
/// Polygon coordinates: an outer ring followed by any holes.
pub type PolygonCoordinates = Vec<Ring>;
/// Object members outside the GeoJSON core, such as `bbox`.
pub type ForeignMembers = Map<String, Value>;

/// A GeoJSON geometry.
///
/// Decoding never fails. A `Polygon` or `MultiPolygon` whose coordinates
/// have the expected nesting keeps its full source object. A
/// `GeometryCollection` decodes its members and keeps its other members.
/// Anything else becomes [`Geometry::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Geometry {
    /// A single polygon object.
    Polygon(Value),
    /// A multipolygon object.
    MultiPolygon(Value),
    /// A heterogeneous collection of member geometries.
    GeometryCollection {
        /// Members in source order.
        geometries: Vec<Geometry>,
        /// Members of the collection object besides `type` and `geometries`.
        foreign: ForeignMembers,
    },
    /// Any other geometry, kept verbatim.
    Other(Value),
}

impl Geometry {
    /// Build a polygon from its rings.
    #[must_use]
    pub fn polygon(coordinates: PolygonCoordinates) -> Self {
        Self::Polygon(json!({"type": "Polygon", "coordinates": coordinates}))
    }

    /// Build a multipolygon from its polygons.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_core::Geometry;
    ///
    /// let geometry = Geometry::multi_polygon(Vec::new());
    /// assert_eq!(geometry.type_name(), Some("MultiPolygon"));
    /// ```
    #[must_use]
    pub fn multi_polygon(polygons: Vec<PolygonCoordinates>) -> Self {
        Self::MultiPolygon(json!({"type": "MultiPolygon", "coordinates": polygons}))
    }

    /// Build a geometry collection without foreign members.
    #[must_use]
    pub fn collection(geometries: Vec<Self>) -> Self {
        Self::GeometryCollection {
            geometries,
            foreign: ForeignMembers::new(),
        }
    }

    /// GeoJSON `type` discriminator for this geometry, if known.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Polygon(_) => Some("Polygon"),
            Self::MultiPolygon(_) => Some("MultiPolygon"),
            Self::GeometryCollection { .. } => Some("GeometryCollection"),
            Self::Other(value) => value.get("type").and_then(Value::as_str),
        }
    }

    /// Returns `true` when this geometry is a well-formed [`Geometry::Polygon`].
    #[must_use]
    pub const fn is_polygon(&self) -> bool {
        matches!(self, Self::Polygon(_))
    }

    /// The raw `coordinates` member, if the geometry carries one.
    #[must_use]
    pub fn coordinates(&self) -> Option<&Value> {
        match self {
            Self::Polygon(value) | Self::MultiPolygon(value) | Self::Other(value) => {
                value.get("coordinates")
            }
            Self::GeometryCollection { .. } => None,
        }
    }
}

impl From<Value> for Geometry {
    fn from(value: Value) -> Self {
        let tag = value.get("type").and_then(Value::as_str);
        if tag == Some("Polygon") && nests_as::<PolygonCoordinates>(&value) {
            Self::Polygon(value)
        } else if tag == Some("MultiPolygon") && nests_as::<Vec<PolygonCoordinates>>(&value) {
            Self::MultiPolygon(value)
        } else if tag == Some("GeometryCollection") {
            decode_collection(value)
        } else {
            Self::Other(value)
        }
    }
}

impl From<Geometry> for Value {
    fn from(geometry: Geometry) -> Self {
        match geometry {
            Geometry::Polygon(value) | Geometry::MultiPolygon(value) | Geometry::Other(value) => {
                value
            }
            Geometry::GeometryCollection {
                geometries,
                foreign,
            } => {
                let mut object = Map::new();
                object.insert("type".to_owned(), Self::from("GeometryCollection"));
                object.insert(
                    "geometries".to_owned(),
                    geometries.into_iter().map(Self::from).collect(),
                );
                object.extend(foreign);
                Self::Object(object)
            }
        }
    }
}

fn nests_as<'de, T: Deserialize<'de>>(value: &'de Value) -> bool {
    value
        .get("coordinates")
        .is_some_and(|coordinates| T::deserialize(coordinates).is_ok())
}

fn decode_collection(value: Value) -> Geometry {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Geometry::Other(other),
    };
    let members = match object.get_mut("geometries") {
        Some(Value::Array(members)) => std::mem::take(members),
        _ => return Geometry::Other(Value::Object(object)),
    };
    object.retain(|key, _| key != "type" && key != "geometries");
    Geometry::GeometryCollection {
        geometries: members.into_iter().map(Geometry::from).collect(),
        foreign: object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(json!({"type": "Point", "coordinates": [1.0, 2.0]}))]
    #[case(json!({"type": "Polygon", "coordinates": "not-a-ring"}))]
    #[case(json!({"type": "Polygon", "coordinates": [[[0.0, "x"]]]}))]
    #[case(json!({"type": "GeometryCollection"}))]
    #[case(json!("Polygon"))]
    fn unrecognised_values_are_kept_verbatim(#[case] value: Value) {
        let geometry = Geometry::from(value.clone());
        assert_eq!(geometry, Geometry::Other(value.clone()));
        assert_eq!(Value::from(geometry), value);
    }

    #[rstest]
    fn nested_collections_decode_recursively() {
        let value = json!({
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]},
                {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
            ]
        });
        let Geometry::GeometryCollection { geometries, foreign } = Geometry::from(value) else {
            panic!("expected a geometry collection");
        };
        assert_eq!(geometries.len(), 2);
        assert!(foreign.is_empty());
        assert!(geometries.first().is_some_and(Geometry::is_polygon));
        assert_eq!(geometries.get(1).and_then(Geometry::type_name), Some("LineString"));
    }

    #[rstest]
    #[case(json!({
        "type": "Polygon",
        "bbox": [0.0, 0.0, 1.0, 1.0],
        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
    }))]
    #[case(json!({
        "type": "MultiPolygon",
        "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]],
        "bbox": [0, 0, 1, 1],
        "title": "ward 3"
    }))]
    #[case(json!({
        "type": "GeometryCollection",
        "bbox": [-1.0, -1.0, 1.0, 1.0],
        "geometries": [
            {"type": "Polygon", "bbox": [0, 0, 1, 1], "coordinates": [[[0, 0], [1, 1], [0, 0]]]}
        ]
    }))]
    fn foreign_members_survive_a_round_trip(#[case] value: Value) {
        let geometry: Geometry = serde_json::from_value(value.clone()).expect("decode geometry");
        assert_eq!(serde_json::to_value(&geometry).expect("serialise"), value);
    }

    #[rstest]
    fn integer_coordinates_are_not_rewritten() {
        let text = r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[3,0],[3,4],[0,0]]]]}"#;
        let geometry: Geometry = serde_json::from_str(text).expect("decode geometry");
        assert!(matches!(geometry, Geometry::MultiPolygon(_)));
        assert_eq!(serde_json::to_string(&geometry).expect("serialise"), text);
    }

    #[rstest]
    fn high_precision_coordinates_decode_exactly() {
        let literal = "-96.96783183009256391";
        let text = format!(r#"{{"type":"Polygon","coordinates":[[[{literal},45.5],[0.0,0.0]]]}}"#);
        let geometry: Geometry = serde_json::from_str(&text).expect("decode geometry");
        let decoded = geometry
            .coordinates()
            .and_then(|coordinates| coordinates.pointer("/0/0/0"))
            .and_then(Value::as_f64);
        let expected: f64 = literal.parse().expect("valid float literal");
        assert_eq!(decoded, Some(expected));
    }

    #[rstest]
    fn built_collections_serialise_their_members() {
        let geometry = Geometry::collection(vec![Geometry::polygon(vec![vec![vec![0.0, 0.0]]])]);
        let value = serde_json::to_value(&geometry).expect("serialise geometry");
        assert_eq!(
            value,
            json!({
                "type": "GeometryCollection",
                "geometries": [{"type": "Polygon", "coordinates": [[[0.0, 0.0]]]}]
            })
        );
    }
}
