//! Configuration file parsing.
//!
//! Parses individual `.vds.toml` files into intermediate `RawConfig` structures that preserve
//! the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// Query schema section.
    pub schema: Option<RawSchemaSettings>,
    /// Field naming section.
    pub fields: Option<RawFieldSettings>,
    /// Boundary data section.
    pub regions: Option<RawRegionSettings>,
}

/// Raw `[schema]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSchemaSettings {
    /// Schema version used when a command does not name one.
    pub default_version: Option<String>,
}

/// Raw `[fields]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFieldSettings {
    /// Namespace prepended to logical field names.
    pub prefix: Option<String>,
    /// Free-text copy field.
    pub all_text: Option<String>,
    /// Geo-point field.
    pub geo: Option<String>,
}

/// Raw `[regions]` section.
///
/// Besides `dir`, every sub-table is a per-category override, e.g. `[regions.marine]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRegionSettings {
    /// Directory holding the boundary files.
    #[serde(default)]
    pub dir: Option<String>,
    /// Per-category overrides keyed by category name.
    #[serde(flatten)]
    pub categories: BTreeMap<String, RawRegionFile>,
}

/// Raw `[regions.<category>]` table.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRegionFile {
    /// Boundary file, relative to the regions directory unless absolute.
    pub file: Option<String>,
    /// Name property keys, highest priority first.
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub name_keys: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
