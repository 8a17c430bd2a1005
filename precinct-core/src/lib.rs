//! Core data model and schema-driven transforms for precinct boundaries.
//!
//! Jurisdictions publish precinct boundaries as GeoJSON with their own
//! property names and geometry conventions. This crate rewrites those raw
//! collections into a single unified shape:
//!
//! - [`map_properties`] renames attributes according to a [`PropertyMap`].
//! - [`normalize_geometry`] applies a [`GeometryTransform`].
//! - [`transform_feature`] and [`transform_feature_collection`] combine both.
//! - [`merge_feature_collections`] concatenates partitioned results.
//!
//! Every operation here is pure; fetching lives in `precinct-data`.
//!
//! # Example
//!
//! ```
//! use precinct_core::{GeometryTransform, PropertyMap, SchemaDescriptor, transform_feature_collection};
//! use serde_json::json;
//!
//! let schema = SchemaDescriptor::new(
//!     PropertyMap::new().with("precinct_id", "PrecinctID"),
//!     GeometryTransform::GeometryCollectionToMultiPolygon,
//! );
//! let raw = json!({
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "properties": { "PrecinctID": "0001", "Extra": true },
//!         "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]] }
//!     }]
//! });
//!
//! let unified = transform_feature_collection(raw, &schema)?;
//! assert_eq!(unified.name, "full");
//! assert_eq!(unified.features.len(), 1);
//! # Ok::<(), precinct_core::TransformError>(())
//! ```
#![forbid(unsafe_code)]

mod collection;
mod error;
mod feature;
mod geometry;
mod metadata;
mod schema;
mod summary;
mod transform;
mod validate;

pub use collection::{
    CRS84_NAME, Crs84, FeatureCollection, RawFeatureCollection, UNIFIED_COLLECTION_NAME,
    UnifiedFeatureCollection,
};
pub use error::{SchemaError, TransformError};
pub use feature::{Feature, Properties};
pub use geometry::{ForeignMembers, Geometry, PolygonCoordinates, Position, Ring};
pub use metadata::{PartitionSource, SourceMetadata};
pub use schema::{GeometryTransform, PropertyMap, SchemaDescriptor};
pub use summary::CollectionSummary;
pub use transform::{
    map_properties, merge_feature_collections, normalize_geometry, transform_feature,
    transform_feature_collection,
};
pub use validate::{FeatureIssue, validate_feature};
