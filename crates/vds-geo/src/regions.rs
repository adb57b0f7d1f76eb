//! The process-wide region lookup.
//!
//! [`GeoRegions`] is built once, before any query is served, and never mutated afterwards. It is
//! shared behind an `Arc` so concurrent readers need no locking. Picking up new boundary data
//! requires building a new lookup, which in practice means restarting the process.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::info;

use crate::{MultiPolygon, RegionError, RegionSet};

/// The categories of named areas available to `geo_named_area` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionCategory {
    /// Countries (Natural Earth admin-0 boundaries).
    Country,
    /// Seas and oceans.
    Marine,
    /// Physical geography regions (deserts, ranges, ...).
    Geography,
}

impl RegionCategory {
    /// All categories in a stable order.
    pub const ALL: [Self; 3] = [Self::Country, Self::Marine, Self::Geography];

    /// The category name used in query documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Marine => "marine",
            Self::Geography => "geography",
        }
    }

    /// The default boundary-set file for this category.
    pub fn default_file(self) -> &'static str {
        match self {
            Self::Country => "50m-admin-0-countries-v4.1.0.geojson",
            Self::Marine => "50m-marine-regions-v4.1.0.geojson",
            Self::Geography => "50m-geography-regions-v4.1.0.geojson",
        }
    }

    /// Property keys used to name features, highest priority first.
    ///
    /// Marine regions deliberately use `name` only: `name_en` merges the North and South
    /// Atlantic into a single ocean.
    pub fn default_name_keys(self) -> &'static [&'static str] {
        match self {
            Self::Country => &["NAME_EN", "NAME"],
            Self::Marine => &["name"],
            Self::Geography => &["name_en", "name"],
        }
    }
}

impl fmt::Display for RegionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown region category: {s}"))
    }
}

/// Where to load one category's boundary set from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSource {
    /// Category the file provides.
    pub category: RegionCategory,
    /// Path to the GeoJSON file.
    pub path: PathBuf,
    /// Name property keys in priority order.
    pub name_keys: Vec<String>,
}

impl RegionSource {
    /// Returns the default sources for every category, resolved against `dir`.
    pub fn defaults_in(dir: &Path) -> Vec<Self> {
        RegionCategory::ALL
            .into_iter()
            .map(|category| Self {
                category,
                path: dir.join(category.default_file()),
                name_keys: category
                    .default_name_keys()
                    .iter()
                    .map(|key| (*key).to_string())
                    .collect(),
            })
            .collect()
    }
}

/// Immutable `category -> name -> MultiPolygon` lookup.
#[derive(Debug, Clone, Default)]
pub struct GeoRegions {
    /// Boundary sets by category.
    sets: BTreeMap<RegionCategory, RegionSet>,
}

impl GeoRegions {
    /// Returns a lookup with no regions in any category.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts building a lookup from in-memory boundary sets.
    pub fn builder() -> GeoRegionsBuilder {
        GeoRegionsBuilder::default()
    }

    /// Loads every source, failing on the first error.
    pub fn load(sources: &[RegionSource]) -> Result<Self, RegionError> {
        let mut builder = Self::builder();
        for source in sources {
            let set = RegionSet::load_file(&source.path, &source.name_keys)?;
            builder = builder.insert(source.category, set);
        }
        let regions = builder.build();
        info!(
            categories = regions.sets.len(),
            areas = regions.len(),
            "region lookup ready"
        );
        Ok(regions)
    }

    /// Loads the default boundary-set files from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, RegionError> {
        Self::load(&RegionSource::defaults_in(dir))
    }

    /// Looks up a named area by category name and display name.
    ///
    /// Returns `None` for unknown categories as well as unknown names.
    pub fn get(&self, category: &str, name: &str) -> Option<&MultiPolygon> {
        let category = category.parse::<RegionCategory>().ok()?;
        self.sets.get(&category)?.get(name)
    }

    /// Returns the boundary set loaded for a category, if any.
    pub fn category(&self, category: RegionCategory) -> Option<&RegionSet> {
        self.sets.get(&category)
    }

    /// Total number of named areas across all categories.
    pub fn len(&self) -> usize {
        self.sets.values().map(RegionSet::len).sum()
    }

    /// Returns true if no areas are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects boundary sets before freezing them into a [`GeoRegions`].
#[derive(Debug, Default)]
pub struct GeoRegionsBuilder {
    /// Sets collected so far.
    sets: BTreeMap<RegionCategory, RegionSet>,
}

impl GeoRegionsBuilder {
    /// Adds (or replaces) the boundary set for a category.
    #[must_use]
    pub fn insert(mut self, category: RegionCategory, set: RegionSet) -> Self {
        self.sets.insert(category, set);
        self
    }

    /// Freezes the collected sets.
    pub fn build(self) -> GeoRegions {
        GeoRegions { sets: self.sets }
    }
}
