//! Structural checks applied to unified features.

use serde_json::Value;
use thiserror::Error;

use crate::{Feature, Geometry};

/// A problem found on a unified feature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FeatureIssue {
    /// A required property is absent, `null`, or an empty string.
    #[error("required property `{key}` is missing or empty")]
    MissingProperty {
        /// Unified property name.
        key: String,
    },
    /// The feature has no geometry.
    #[error("feature has no geometry")]
    MissingGeometry,
    /// The geometry is neither a polygon nor a multipolygon.
    #[error("expected Polygon or MultiPolygon geometry, found {found}")]
    UnexpectedGeometry {
        /// Type of the offending geometry.
        found: String,
    },
    /// A polygonal geometry has no rings.
    #[error("polygonal geometry has no coordinates")]
    EmptyGeometry,
}

/// Check that `feature` is a usable precinct boundary.
///
/// Every key in `required` must hold a non-empty value, and the geometry
/// must be a non-empty polygon or multipolygon. Issues are reported in
/// that order.
///
/// # Examples
///
/// ```
/// use precinct_core::{Feature, FeatureIssue, Properties, validate_feature};
///
/// let issues = validate_feature(&Feature::new(Properties::new(), None), &["precinct_id"]);
/// assert_eq!(
///     issues,
///     [
///         FeatureIssue::MissingProperty { key: "precinct_id".to_owned() },
///         FeatureIssue::MissingGeometry,
///     ]
/// );
/// ```
#[must_use]
pub fn validate_feature(feature: &Feature, required: &[&str]) -> Vec<FeatureIssue> {
    let mut issues: Vec<FeatureIssue> = required
        .iter()
        .filter(|key| is_blank(feature.property(key)))
        .map(|key| FeatureIssue::MissingProperty {
            key: (*key).to_owned(),
        })
        .collect();
    if let Some(issue) = geometry_issue(feature.geometry.as_ref()) {
        issues.push(issue);
    }
    issues
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

fn geometry_issue(geometry: Option<&Geometry>) -> Option<FeatureIssue> {
    match geometry {
        None => Some(FeatureIssue::MissingGeometry),
        Some(polygonal @ (Geometry::Polygon(_) | Geometry::MultiPolygon(_))) => polygonal
            .coordinates()
            .and_then(Value::as_array)
            .is_none_or(Vec::is_empty)
            .then_some(FeatureIssue::EmptyGeometry),
        Some(other) => Some(FeatureIssue::UnexpectedGeometry {
            found: other.type_name().unwrap_or("unknown").to_owned(),
        }),
    }
}
