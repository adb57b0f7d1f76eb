//! Geometry types and named boundary sets for vds.
//!
//! This crate provides:
//!
//! - **Geometry**: [`Point`], [`Polygon`] (outer ring plus holes) and [`MultiPolygon`], built
//!   from GeoJSON-style coordinate arrays.
//! - **Boundary sets**: [`RegionSet`] maps display names to multipolygons, loaded from a GeoJSON
//!   `FeatureCollection` with a priority list of name properties.
//! - **Region lookup**: [`GeoRegions`] is the immutable `category -> name -> MultiPolygon`
//!   snapshot built once at startup and shared with every query translator.
//!
//! # Example
//!
//! ```
//! use vds_geo::{GeoRegions, RegionCategory, RegionSet};
//!
//! let source = r#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "properties": {"name": "north sea"},
//!         "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
//!     }]
//! }"#;
//! let keys = vec!["name".to_string()];
//! let set = RegionSet::parse(source, "inline", &keys).unwrap();
//!
//! let regions = GeoRegions::builder().insert(RegionCategory::Marine, set).build();
//! assert!(regions.get("marine", "North Sea").is_some());
//! ```

#![warn(missing_docs)]

mod error;
mod geometry;
mod load;
mod regions;

pub use error::{GeometryError, RegionError};
pub use geometry::{MultiPolygon, Point, Polygon, Ring};
pub use load::{RegionSet, capwords};
pub use regions::{GeoRegions, GeoRegionsBuilder, RegionCategory, RegionSource};
