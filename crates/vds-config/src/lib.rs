//! Configuration system for vds.
//!
//! vds uses TOML configuration files named `.vds.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.vds.toml` files
//! found, then loading `~/.vds.toml` as the global config with lowest precedence.
//!
//! ```toml
//! [schema]
//! default_version = "v1.0.0"
//!
//! [fields]
//! prefix = "data"
//! all_text = "meta.all"
//! geo = "meta.geo"
//!
//! [regions]
//! dir = "./regions"
//!
//! [regions.marine]
//! file = "50m-marine-regions-v4.1.0.geojson"
//! name_keys = "name"
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
#[cfg(test)]
mod test_support;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawFieldSettings, RawRegionFile, RawRegionSettings, RawSchemaSettings,
    parse_config_file, parse_config_str,
};
pub use resolve::resolve_path;
use serde::Serialize;
use vds_geo::{RegionCategory, RegionSource};

/// Top-level merged configuration for vds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Query schema settings.
    pub schema: SchemaSettings,
    /// Field naming conventions.
    pub fields: FieldSettings,
    /// Boundary data location.
    pub regions: RegionSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.vds.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a single file, skipping discovery.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&[path.to_path_buf()])
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Returns where to load each region category from, with overrides applied.
    ///
    /// Override files are resolved against the regions directory unless absolute.
    pub fn region_sources(&self) -> Vec<RegionSource> {
        RegionSource::defaults_in(&self.regions.dir)
            .into_iter()
            .map(|mut source| {
                if let Some(custom) = self.regions.overrides.get(&source.category) {
                    if let Some(ref file) = custom.file {
                        source.path = self.regions.dir.join(file);
                    }
                    if let Some(ref keys) = custom.name_keys {
                        source.name_keys = keys.clone();
                    }
                }
                source
            })
            .collect()
    }

    /// Serializes the effective configuration to TOML.
    ///
    /// Every region category is listed with its resolved file and name keys, so the output shows
    /// exactly what would be loaded.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let categories = self
            .region_sources()
            .into_iter()
            .map(|source| {
                (
                    source.category.to_string(),
                    SerializableRegionFile {
                        file: source.path.display().to_string(),
                        name_keys: source.name_keys,
                    },
                )
            })
            .collect();
        let serializable = SerializableConfig {
            schema: &self.schema,
            fields: &self.fields,
            regions: SerializableRegions {
                dir: self.regions.dir.display().to_string(),
                categories,
            },
        };
        toml::to_string_pretty(&serializable).map_err(|source| ConfigError::SerializeToml { source })
    }
}

/// Query schema settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSettings {
    /// Version used when a command does not name one. `None` means the newest registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
}

/// Field naming conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSettings {
    /// Namespace prepended to logical field names.
    pub prefix: String,
    /// Free-text copy field.
    pub all_text: String,
    /// Geo-point field.
    pub geo: String,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            prefix: String::from("data"),
            all_text: String::from("meta.all"),
            geo: String::from("meta.geo"),
        }
    }
}

/// Boundary data location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSettings {
    /// Directory holding the boundary files.
    pub dir: PathBuf,
    /// Per-category overrides.
    pub overrides: BTreeMap<RegionCategory, RegionOverride>,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("regions"),
            overrides: BTreeMap::new(),
        }
    }
}

/// Overrides for one region category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionOverride {
    /// Boundary file to load instead of the category default.
    pub file: Option<PathBuf>,
    /// Name property keys to use instead of the category default.
    pub name_keys: Option<Vec<String>>,
}

/// Serializable view of the effective configuration.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Schema section.
    schema: &'a SchemaSettings,
    /// Fields section.
    fields: &'a FieldSettings,
    /// Regions section.
    regions: SerializableRegions,
}

/// Serializable view of the `[regions]` section.
#[derive(Serialize)]
struct SerializableRegions {
    /// Directory holding the boundary files.
    dir: String,
    /// Resolved per-category sources.
    #[serde(flatten)]
    categories: BTreeMap<String, SerializableRegionFile>,
}

/// Serializable view of one category's source.
#[derive(Serialize)]
struct SerializableRegionFile {
    /// Resolved boundary file.
    file: String,
    /// Name property keys.
    name_keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_sources() {
        let sources = Config::default().region_sources();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].category, RegionCategory::Country);
        assert_eq!(
            sources[0].path,
            Path::new("regions/50m-admin-0-countries-v4.1.0.geojson")
        );
        assert_eq!(sources[0].name_keys, vec!["NAME_EN", "NAME"]);
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut config = Config::default();
        config.regions.dir = PathBuf::from("/data/regions");
        config.regions.overrides.insert(
            RegionCategory::Marine,
            RegionOverride {
                file: Some(PathBuf::from("seas.geojson")),
                name_keys: None,
            },
        );
        config.regions.overrides.insert(
            RegionCategory::Geography,
            RegionOverride {
                file: Some(PathBuf::from("/elsewhere/geo.json")),
                name_keys: Some(vec!["label".to_string()]),
            },
        );

        let sources = config.region_sources();
        assert_eq!(sources[1].path, Path::new("/data/regions/seas.geojson"));
        assert_eq!(sources[1].name_keys, vec!["name"]);
        assert_eq!(sources[2].path, Path::new("/elsewhere/geo.json"));
        assert_eq!(sources[2].name_keys, vec!["label"]);
    }

    #[test]
    fn to_toml_lists_effective_settings() {
        let toml = Config::default().to_toml().unwrap();
        assert!(!toml.contains("default_version"));
        assert!(toml.contains("prefix = \"data\""));
        assert!(toml.contains("[regions.marine]"));
        assert!(toml.contains("50m-marine-regions-v4.1.0.geojson"));
    }

    #[test]
    fn to_toml_round_trips_through_parser() {
        let mut config = Config::default();
        config.schema.default_version = Some("v1.0.0".to_string());
        let rendered = config.to_toml().unwrap();

        let raw = parse_config_str(&rendered, Path::new("rendered.toml")).unwrap();
        assert_eq!(
            raw.schema.unwrap().default_version.as_deref(),
            Some("v1.0.0")
        );
        assert_eq!(raw.regions.unwrap().categories.len(), 3);
    }
}
