//! Error types for geometry conversion and boundary-set loading.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while converting coordinate arrays into geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A position had fewer than the two required coordinates.
    #[error("position must have at least 2 coordinates, found {found}")]
    InvalidPosition {
        /// Number of coordinates present.
        found: usize,
    },

    /// A polygon had no rings at all.
    #[error("polygon must have an outer ring")]
    EmptyPolygon,
}

/// Errors that can occur when loading boundary sets.
///
/// Any of these is fatal at startup: a partially loaded region lookup is never returned.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Failed to read a boundary-set file.
    #[error("failed to read boundary set {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The boundary set is not a valid GeoJSON feature collection.
    #[error("failed to parse boundary set {origin}: {source}")]
    ParseJson {
        /// Where the data came from (usually a file path).
        origin: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A feature had no non-empty value for any of the name keys.
    #[error("feature {index} in {origin} has no value for any of the name keys {keys:?}")]
    MissingName {
        /// Where the data came from.
        origin: String,
        /// Index of the feature in the collection.
        index: usize,
        /// The name keys that were tried.
        keys: Vec<String>,
    },

    /// A feature's coordinates could not be converted.
    #[error("feature {index} in {origin} has invalid geometry: {source}")]
    InvalidGeometry {
        /// Where the data came from.
        origin: String,
        /// Index of the feature in the collection.
        index: usize,
        /// Underlying geometry error.
        source: GeometryError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_name_display_lists_keys() {
        let err = RegionError::MissingName {
            origin: "countries.geojson".to_string(),
            index: 3,
            keys: vec!["NAME_EN".to_string(), "NAME".to_string()],
        };
        let display = err.to_string();
        assert!(display.contains("feature 3"));
        assert!(display.contains("countries.geojson"));
        assert!(display.contains("NAME_EN"));
    }

    #[test]
    fn geometry_error_display() {
        let err = GeometryError::InvalidPosition { found: 1 };
        assert_eq!(
            err.to_string(),
            "position must have at least 2 coordinates, found 1"
        );
    }
}
