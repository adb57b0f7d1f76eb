//! Multipolygon handling shared by the translator and the hasher.
//!
//! A record is inside a multipolygon if it is inside any member polygon's outer ring and outside
//! all of that polygon's holes.

use serde_json::Number;
use vds_geo::{MultiPolygon, Point, Polygon};

use crate::{QueryNode, document::Coordinates};

/// Builds the query matching points inside `area`.
pub fn multipolygon_query(geo_field: &str, area: &MultiPolygon) -> QueryNode {
    QueryNode::any(
        area.polygons
            .iter()
            .map(|polygon| polygon_query(geo_field, polygon))
            .collect(),
    )
}

/// Builds the query for one polygon: the outer ring minus any holes.
fn polygon_query(geo_field: &str, polygon: &Polygon) -> QueryNode {
    let outer = ring_query(geo_field, &polygon.outer);
    if !polygon.has_holes() {
        return outer;
    }
    QueryNode::BoolAll {
        children: vec![outer],
        must_not: polygon
            .holes
            .iter()
            .map(|hole| ring_query(geo_field, hole))
            .collect(),
    }
}

/// Builds a polygon query for a single ring.
fn ring_query(geo_field: &str, ring: &[Point]) -> QueryNode {
    QueryNode::GeoPolygon {
        field: geo_field.to_string(),
        ring: ring.to_vec(),
    }
}

/// Canonical string for multipolygon coordinates.
///
/// Numbers are rendered exactly as written. Ring point order is kept as-is because it defines
/// the shape; holes are sorted because they form a set. Polygons are joined with `;` in their
/// given order.
pub fn canonical_multipolygon(coordinates: &Coordinates) -> String {
    let polygons: Vec<String> = coordinates
        .iter()
        .map(|rings| canonical_polygon(rings))
        .collect();
    polygons.join(";")
}

/// Canonical string for one polygon: `outer` or `outer/[hole|hole]`.
fn canonical_polygon(rings: &[Vec<Vec<Number>>]) -> String {
    let Some((outer, holes)) = rings.split_first() else {
        return String::new();
    };
    let outer = canonical_ring(outer);
    if holes.is_empty() {
        return outer;
    }
    let mut holes: Vec<String> = holes.iter().map(|h| canonical_ring(h)).collect();
    holes.sort();
    format!("{outer}/[{}]", holes.join("|"))
}

/// Canonical string for a ring: `[lat,lon],[lat,lon],...`.
fn canonical_ring(ring: &[Vec<Number>]) -> String {
    let points: Vec<String> = ring
        .iter()
        .filter_map(|position| match position.as_slice() {
            [lon, lat, ..] => Some(format!("[{lat},{lon}]")),
            _ => None,
        })
        .collect();
    points.join(",")
}
