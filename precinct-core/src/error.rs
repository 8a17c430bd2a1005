//! Error types produced while decoding schemas and raw collections.

use thiserror::Error;

/// Errors raised when a raw payload cannot be treated as a feature collection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The payload was not a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type name of the rejected payload.
        found: &'static str,
    },
    /// The payload had no `features` array.
    #[error("collection has no `features` array")]
    MissingFeatures,
    /// A member of `features` could not be decoded as a feature.
    #[error("feature at index {index} is invalid: {source}")]
    InvalidFeature {
        /// Position of the offending feature.
        index: usize,
        /// Decoder failure.
        source: serde_json::Error,
    },
}

/// Errors raised while decoding a [`SchemaDescriptor`](crate::SchemaDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A property map entry pointed at something other than a string key.
    #[error("property map entry `{target}` must name a source key, found {found}")]
    NonStringSource {
        /// Unified property name being mapped.
        target: String,
        /// JSON rendering of the rejected value.
        found: String,
    },
}

pub(crate) const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
