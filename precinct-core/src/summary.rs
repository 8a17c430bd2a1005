//! Aggregate statistics over a set of features.

use geo::{Coord, Rect};

use serde_json::Value;

use crate::{Feature, Geometry};

/// Counts by geometry kind plus the bounding box of every polygonal
/// coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollectionSummary {
    /// Number of features inspected.
    pub features: usize,
    /// Features carrying a single polygon.
    pub polygons: usize,
    /// Features carrying a multipolygon.
    pub multi_polygons: usize,
    /// Features carrying a geometry collection.
    pub geometry_collections: usize,
    /// Features carrying any other geometry.
    pub other_geometries: usize,
    /// Features with no geometry.
    pub missing_geometries: usize,
    /// Bounding box of finite polygon coordinates, if any.
    pub bounds: Option<Rect<f64>>,
}

impl CollectionSummary {
    /// Summarise `features`.
    ///
    /// # Examples
    ///
    /// ```
    /// use precinct_core::{CollectionSummary, Feature, Geometry, Properties};
    ///
    /// let ring = vec![vec![-93.1, 45.0], vec![-93.0, 45.1], vec![-93.1, 45.0]];
    /// let feature = Feature::new(Properties::new(), Some(Geometry::polygon(vec![ring])));
    /// let summary = CollectionSummary::of(&[feature]);
    /// assert_eq!(summary.polygons, 1);
    /// assert_eq!(summary.bounds.map(|rect| rect.max().y), Some(45.1));
    /// ```
    #[must_use]
    pub fn of(features: &[Feature]) -> Self {
        features
            .iter()
            .map(Self::from_feature)
            .fold(Self::default(), Self::combine)
    }

    fn combine(mut self, other: Self) -> Self {
        self.features += other.features;
        self.polygons += other.polygons;
        self.multi_polygons += other.multi_polygons;
        self.geometry_collections += other.geometry_collections;
        self.other_geometries += other.other_geometries;
        self.missing_geometries += other.missing_geometries;
        self.bounds = merge_bounds(self.bounds, other.bounds);
        self
    }

    fn from_feature(feature: &Feature) -> Self {
        let mut summary = Self {
            features: 1,
            bounds: feature.geometry.as_ref().and_then(geometry_bounds),
            ..Self::default()
        };
        match &feature.geometry {
            None => summary.missing_geometries = 1,
            Some(Geometry::Polygon(_)) => summary.polygons = 1,
            Some(Geometry::MultiPolygon(_)) => summary.multi_polygons = 1,
            Some(Geometry::GeometryCollection { .. }) => summary.geometry_collections = 1,
            Some(Geometry::Other(_)) => summary.other_geometries = 1,
        }
        summary
    }
}

fn geometry_bounds(geometry: &Geometry) -> Option<Rect<f64>> {
    match geometry {
        Geometry::Polygon(_) => geometry.coordinates().and_then(|rings| positions_bounds(rings, 2)),
        Geometry::MultiPolygon(_) => geometry
            .coordinates()
            .and_then(|polygons| positions_bounds(polygons, 3)),
        Geometry::GeometryCollection { geometries, .. } => geometries
            .iter()
            .map(geometry_bounds)
            .fold(None, merge_bounds),
        Geometry::Other(_) => None,
    }
}

/// Bounds of the positions found `depth` array levels below `coordinates`.
fn positions_bounds(coordinates: &Value, depth: usize) -> Option<Rect<f64>> {
    let items = coordinates.as_array()?;
    if depth == 0 {
        return position_rect(items);
    }
    items
        .iter()
        .map(|item| positions_bounds(item, depth - 1))
        .fold(None, merge_bounds)
}

fn position_rect(position: &[Value]) -> Option<Rect<f64>> {
    match position {
        [x, y, ..] => {
            let coord = Coord {
                x: x.as_f64()?,
                y: y.as_f64()?,
            };
            Some(Rect::new(coord, coord))
        }
        _ => None,
    }
}

fn merge_bounds(lhs: Option<Rect<f64>>, rhs: Option<Rect<f64>>) -> Option<Rect<f64>> {
    match (lhs, rhs) {
        (Some(left), Some(right)) => {
            let left_min = left.min();
            let left_max = left.max();
            let right_min = right.min();
            let right_max = right.max();

            Some(Rect::new(
                Coord {
                    x: left_min.x.min(right_min.x),
                    y: left_min.y.min(right_min.y),
                },
                Coord {
                    x: left_max.x.max(right_max.x),
                    y: left_max.y.max(right_max.y),
                },
            ))
        }
        (Some(bounds), None) | (None, Some(bounds)) => Some(bounds),
        (None, None) => None,
    }
}
