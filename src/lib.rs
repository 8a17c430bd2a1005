//! Facade crate for the precinct boundary engine.
//!
//! This crate re-exports the schema-transform engine and, behind the `http`
//! feature (on by default), the fetch-merge orchestrator with its HTTP
//! transport and jurisdiction profiles.

#![forbid(unsafe_code)]

pub use precinct_core::{
    CRS84_NAME, CollectionSummary, Feature, FeatureCollection, FeatureIssue, ForeignMembers,
    Geometry, GeometryTransform, PartitionSource, Properties, PropertyMap, RawFeatureCollection,
    SchemaDescriptor, SchemaError, SourceMetadata, TransformError, UNIFIED_COLLECTION_NAME,
    UnifiedFeatureCollection, map_properties, merge_feature_collections, normalize_geometry,
    transform_feature, transform_feature_collection, validate_feature,
};

#[cfg(feature = "http")]
pub use precinct_data::{
    AdapterConfig, ConfigurationError, FetchDiagnostics, FetchPlan, FetchPrecinctsError,
    FetchReport, HttpTransport, HttpTransportConfig, Jurisdiction, LayerConfig, Manifest,
    Minnesota, SourceFetchError, Transport, TransportError, TransportResponse, fetch_precincts,
    fetch_precincts_with_report, fetch_source,
};
