//! Polygon geometry.
//!
//! Coordinates follow GeoJSON ordering: each position is `[longitude, latitude]`. Ring point order
//! is significant and is never rearranged.

use serde::Serialize;

use crate::GeometryError;

/// A single position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Point {
    /// Creates a point from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Builds a point from a GeoJSON position (`[lon, lat, ...]`).
    ///
    /// Extra coordinates such as altitude are ignored.
    pub fn from_position(position: &[f64]) -> Result<Self, GeometryError> {
        match position {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(GeometryError::InvalidPosition {
                found: position.len(),
            }),
        }
    }
}

/// An ordered sequence of points forming a closed boundary.
pub type Ring = Vec<Point>;

/// A polygon: an outer boundary with zero or more holes cut out of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Polygon {
    /// The enclosing boundary.
    pub outer: Ring,
    /// Excluded inner boundaries.
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Builds a polygon from GeoJSON polygon coordinates: `[outer, hole, hole, ...]`.
    pub fn from_coordinates(rings: &[Vec<Vec<f64>>]) -> Result<Self, GeometryError> {
        let mut rings = rings.iter().map(|ring| ring_from_positions(ring));
        let outer = rings.next().ok_or(GeometryError::EmptyPolygon)??;
        let holes = rings.collect::<Result<Vec<_>, _>>()?;
        Ok(Self { outer, holes })
    }

    /// Returns true if this polygon has at least one hole.
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }
}

/// A collection of polygons treated as a single area.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MultiPolygon {
    /// Member polygons in source order.
    pub polygons: Vec<Polygon>,
}

impl MultiPolygon {
    /// Creates a multipolygon from polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Builds a multipolygon from GeoJSON `MultiPolygon` coordinates.
    pub fn from_coordinates(coordinates: &[Vec<Vec<Vec<f64>>>]) -> Result<Self, GeometryError> {
        coordinates
            .iter()
            .map(|polygon| Polygon::from_coordinates(polygon))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Appends a polygon unless an identical one is already present.
    ///
    /// Returns true if the polygon was added.
    pub fn push_unique(&mut self, polygon: Polygon) -> bool {
        if self.polygons.contains(&polygon) {
            return false;
        }
        self.polygons.push(polygon);
        true
    }

    /// Number of member polygons.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Returns true if there are no member polygons.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self::new(vec![polygon])
    }
}

/// Converts a list of GeoJSON positions into a ring.
fn ring_from_positions(positions: &[Vec<f64>]) -> Result<Ring, GeometryError> {
    positions
        .iter()
        .map(|position| Point::from_position(position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(offset: f64) -> Vec<Vec<f64>> {
        vec![
            vec![offset, offset],
            vec![offset + 1.0, offset],
            vec![offset + 1.0, offset + 1.0],
            vec![offset, offset],
        ]
    }

    #[test]
    fn point_ignores_altitude() {
        let point = Point::from_position(&[10.0, 20.0, 300.0]).unwrap();
        assert_eq!(point, Point::new(10.0, 20.0));
    }

    #[test]
    fn point_requires_two_coordinates() {
        let err = Point::from_position(&[10.0]).unwrap_err();
        assert_eq!(err, GeometryError::InvalidPosition { found: 1 });
    }

    #[test]
    fn polygon_splits_outer_and_holes() {
        let polygon = Polygon::from_coordinates(&[square(0.0), square(0.2), square(0.5)]).unwrap();
        assert_eq!(polygon.outer.len(), 4);
        assert_eq!(polygon.holes.len(), 2);
        assert_eq!(polygon.holes[0][0], Point::new(0.2, 0.2));
        assert!(polygon.has_holes());
    }

    #[test]
    fn polygon_preserves_point_order() {
        let polygon = Polygon::from_coordinates(&[square(0.0)]).unwrap();
        let lons: Vec<f64> = polygon.outer.iter().map(|p| p.lon).collect();
        assert_eq!(lons, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_polygon_is_rejected() {
        let err = Polygon::from_coordinates(&[]).unwrap_err();
        assert_eq!(err, GeometryError::EmptyPolygon);
    }

    #[test]
    fn push_unique_skips_duplicates() {
        let polygon = Polygon::from_coordinates(&[square(0.0)]).unwrap();
        let mut multi = MultiPolygon::default();
        assert!(multi.push_unique(polygon.clone()));
        assert!(!multi.push_unique(polygon));
        assert_eq!(multi.len(), 1);
    }

    #[test]
    fn multipolygon_from_coordinates() {
        let multi = MultiPolygon::from_coordinates(&[vec![square(0.0)], vec![square(5.0)]]).unwrap();
        assert_eq!(multi.len(), 2);
        assert!(!multi.polygons[1].has_holes());
    }
}
