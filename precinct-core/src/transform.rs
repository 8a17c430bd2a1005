//! Schema-driven rewriting of raw features into the unified shape.

use serde_json::{Value, json};

use crate::{
    Feature, FeatureCollection, Geometry, GeometryTransform, Properties, PropertyMap,
    RawFeatureCollection, SchemaDescriptor, TransformError,
};

/// Project `source` through `property_map`.
///
/// The result holds exactly the map's targets, in map order. Targets whose
/// source key is absent resolve to `null`; unmapped keys are dropped.
///
/// # Examples
///
/// ```
/// use precinct_core::{PropertyMap, map_properties};
/// use serde_json::{Value, json};
///
/// let source = json!({"A": 1, "C": 3}).as_object().cloned().unwrap_or_default();
/// let map = PropertyMap::new().with("x", "A").with("y", "B");
/// let mapped = map_properties(&source, &map);
/// assert_eq!(Value::Object(mapped), json!({"x": 1, "y": null}));
/// ```
#[must_use]
pub fn map_properties(source: &Properties, property_map: &PropertyMap) -> Properties {
    property_map
        .iter()
        .map(|(target, key)| {
            let value = source.get(key).cloned().unwrap_or(Value::Null);
            (target.to_owned(), value)
        })
        .collect()
}

/// Apply `transform` to `geometry`.
///
/// [`GeometryTransform::Identity`] returns `geometry` untouched. With
/// [`GeometryTransform::GeometryCollectionToMultiPolygon`], a collection
/// containing members tagged `Polygon` becomes a multipolygon of their
/// coordinates in member order, and a lone polygon becomes a one-member
/// multipolygon. Collections without polygons and every other geometry,
/// including an existing multipolygon, pass through unchanged. Non-polygon
/// members of a mixed collection are discarded.
#[must_use]
pub fn normalize_geometry(geometry: Geometry, transform: GeometryTransform) -> Geometry {
    match transform {
        GeometryTransform::Identity => geometry,
        GeometryTransform::GeometryCollectionToMultiPolygon => collapse_to_multipolygon(geometry),
    }
}

fn collapse_to_multipolygon(geometry: Geometry) -> Geometry {
    let polygons: Vec<Value> = match &geometry {
        Geometry::GeometryCollection { geometries, .. } => geometries
            .iter()
            .filter(|member| member.type_name() == Some("Polygon"))
            .map(polygon_coordinates)
            .collect(),
        Geometry::Polygon(_) => vec![polygon_coordinates(&geometry)],
        _ => Vec::new(),
    };
    if polygons.is_empty() {
        return geometry;
    }
    Geometry::from(json!({"type": "MultiPolygon", "coordinates": polygons}))
}

fn polygon_coordinates(polygon: &Geometry) -> Value {
    polygon.coordinates().cloned().unwrap_or(Value::Null)
}

/// Rewrite one raw feature according to `schema`.
///
/// The output carries only the mapped properties and the normalised
/// geometry; the identifier and foreign members are dropped. A missing
/// geometry stays missing.
#[must_use]
pub fn transform_feature(feature: Feature, schema: &SchemaDescriptor) -> Feature {
    let properties = map_properties(&feature.properties, &schema.property_map);
    let geometry = feature
        .geometry
        .map(|geometry| normalize_geometry(geometry, schema.geometry_transform));
    Feature::new(properties, geometry)
}

impl RawFeatureCollection {
    /// Rewrite every feature according to `schema`, preserving order.
    #[must_use]
    pub fn transform(self, schema: &SchemaDescriptor) -> FeatureCollection {
        FeatureCollection::new(
            self.features
                .into_iter()
                .map(|feature| transform_feature(feature, schema))
                .collect(),
        )
    }
}

/// Decode a raw collection and rewrite it according to `schema`.
///
/// # Errors
///
/// Returns a [`TransformError`] when `raw` is not an object with a
/// `features` array of decodable features.
pub fn transform_feature_collection(
    raw: Value,
    schema: &SchemaDescriptor,
) -> Result<FeatureCollection, TransformError> {
    RawFeatureCollection::from_value(raw).map(|collection| collection.transform(schema))
}

/// Concatenate collections in order, skipping absent entries.
///
/// # Examples
///
/// ```
/// use precinct_core::{Feature, FeatureCollection, Properties, merge_feature_collections};
///
/// let one = FeatureCollection::new(vec![Feature::new(Properties::new(), None)]);
/// let merged = merge_feature_collections([Some(one.clone()), None, Some(one)]);
/// assert_eq!(merged.features.len(), 2);
/// ```
#[must_use]
pub fn merge_feature_collections<I>(collections: I) -> FeatureCollection
where
    I: IntoIterator<Item = Option<FeatureCollection>>,
{
    FeatureCollection::new(
        collections
            .into_iter()
            .flatten()
            .flat_map(|collection| collection.features)
            .collect(),
    )
}
