//! Boundary-set loading.
//!
//! A boundary set is a GeoJSON `FeatureCollection` whose features carry `Polygon` or
//! `MultiPolygon` geometries. Each feature is named from its properties using a priority list of
//! keys, and features that share a name are stitched together into a single multipolygon.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{GeometryError, MultiPolygon, Polygon, RegionError};

/// GeoJSON feature collection, reduced to the parts we read.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    /// Features in source order.
    features: Vec<Feature>,
}

/// A single GeoJSON feature.
#[derive(Debug, Deserialize)]
struct Feature {
    /// The feature's shape.
    geometry: Geometry,
    /// Free-form properties used for naming.
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Supported GeoJSON geometry types.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    /// A single polygon: `[outer, hole, ...]`.
    Polygon {
        /// Ring coordinates.
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Polygon coordinates.
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
}

impl Geometry {
    /// Normalizes the geometry into a list of polygons.
    fn into_polygons(self) -> Result<Vec<Polygon>, GeometryError> {
        match self {
            Self::Polygon { coordinates } => Ok(vec![Polygon::from_coordinates(&coordinates)?]),
            Self::MultiPolygon { coordinates } => {
                Ok(MultiPolygon::from_coordinates(&coordinates)?.polygons)
            }
        }
    }
}

/// Named areas from a single boundary set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSet {
    /// Display name to area.
    areas: BTreeMap<String, MultiPolygon>,
}

impl RegionSet {
    /// Parses a boundary set from a JSON string.
    ///
    /// `origin` is only used in error messages. `name_keys` lists the property keys to try for a
    /// feature's name, highest priority first.
    pub fn parse(json: &str, origin: &str, name_keys: &[String]) -> Result<Self, RegionError> {
        let collection: FeatureCollection =
            serde_json::from_str(json).map_err(|source| RegionError::ParseJson {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_collection(collection, origin, name_keys)
    }

    /// Parses a boundary set from a reader.
    pub fn from_reader(
        reader: impl Read,
        origin: &str,
        name_keys: &[String],
    ) -> Result<Self, RegionError> {
        let collection: FeatureCollection =
            serde_json::from_reader(reader).map_err(|source| RegionError::ParseJson {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_collection(collection, origin, name_keys)
    }

    /// Loads a boundary set from a file.
    pub fn load_file(path: &Path, name_keys: &[String]) -> Result<Self, RegionError> {
        let file = File::open(path).map_err(|source| RegionError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(
            BufReader::new(file),
            &path.display().to_string(),
            name_keys,
        )
    }

    /// Returns the area registered under `name`.
    pub fn get(&self, name: &str) -> Option<&MultiPolygon> {
        self.areas.get(name)
    }

    /// Iterates over the display names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.areas.keys().map(String::as_str)
    }

    /// Number of named areas.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Returns true if the set holds no areas.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Builds the lookup from a parsed collection, merging features by name.
    fn from_collection(
        collection: FeatureCollection,
        origin: &str,
        name_keys: &[String],
    ) -> Result<Self, RegionError> {
        let mut areas: BTreeMap<String, MultiPolygon> = BTreeMap::new();
        let mut skipped = 0usize;

        for (index, feature) in collection.features.into_iter().enumerate() {
            let name = feature_name(feature.properties.as_ref(), name_keys).ok_or_else(|| {
                RegionError::MissingName {
                    origin: origin.to_string(),
                    index,
                    keys: name_keys.to_vec(),
                }
            })?;
            let polygons =
                feature
                    .geometry
                    .into_polygons()
                    .map_err(|source| RegionError::InvalidGeometry {
                        origin: origin.to_string(),
                        index,
                        source,
                    })?;

            let area = areas.entry(name).or_default();
            for polygon in polygons {
                if !area.push_unique(polygon) {
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            debug!(origin, skipped, "skipped duplicate polygons");
        }
        info!(origin, areas = areas.len(), "loaded boundary set");
        Ok(Self { areas })
    }
}

/// Resolves a feature's display name from the first non-empty name property.
fn feature_name(properties: Option<&Map<String, Value>>, name_keys: &[String]) -> Option<String> {
    let properties = properties?;
    name_keys
        .iter()
        .filter_map(|key| properties.get(key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
        .map(capwords)
}

/// Title-cases each whitespace-separated word and joins them with single spaces.
///
/// The first character of each word is uppercased and the rest lowercased, so
/// `"NORTH  atlantic ocean"` becomes `"North Atlantic Ocean"`.
pub fn capwords(text: &str) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect();
    words.join(" ")
}
