//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence rules
//! and resolving paths.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use vds_geo::RegionCategory;

use crate::{
    Config, ConfigError, FieldSettings, RegionOverride, RegionSettings, SchemaSettings,
    parse::{RawConfig, RawFieldSettings, RawRegionFile},
    resolve::{expand_tilde, resolve_path},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file; relative paths inside it resolve from here.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins
/// - `regions.dir`: first definition wins, resolved against the directory of the file that set it
/// - Region overrides: merged per category and per key, first definition wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    Ok(Config {
        schema: merge_schema_settings(configs),
        fields: merge_field_settings(configs),
        regions: merge_region_settings(configs)?,
        config_root: configs.first().map(|c| c.dir().to_path_buf()),
    })
}

/// Merges schema settings.
fn merge_schema_settings(configs: &[ParsedConfig]) -> SchemaSettings {
    SchemaSettings {
        default_version: configs
            .iter()
            .filter_map(|parsed| parsed.config.schema.as_ref())
            .find_map(|schema| schema.default_version.clone()),
    }
}

/// Merges field settings, taking the first defined value for each field.
fn merge_field_settings(configs: &[ParsedConfig]) -> FieldSettings {
    let mut result = FieldSettings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref fields) = parsed.config.fields {
            apply_raw_fields(&mut result, fields);
        }
    }

    result
}

/// Applies raw field settings to result, overwriting any present values.
fn apply_raw_fields(result: &mut FieldSettings, raw: &RawFieldSettings) {
    if let Some(ref v) = raw.prefix {
        result.prefix = v.clone();
    }
    if let Some(ref v) = raw.all_text {
        result.all_text = v.clone();
    }
    if let Some(ref v) = raw.geo {
        result.geo = v.clone();
    }
}

/// Merges the `[regions]` section.
fn merge_region_settings(configs: &[ParsedConfig]) -> Result<RegionSettings, ConfigError> {
    let mut result = RegionSettings::default();

    for parsed in configs.iter().rev() {
        let Some(ref regions) = parsed.config.regions else {
            continue;
        };

        if let Some(ref dir) = regions.dir {
            result.dir = resolve_path(dir, parsed.dir())?;
        }

        for (name, raw) in &regions.categories {
            let category = RegionCategory::from_str(name).map_err(|_| {
                ConfigError::UnknownRegionCategory {
                    path: parsed.path.clone(),
                    category: name.clone(),
                }
            })?;
            apply_raw_region_file(result.overrides.entry(category).or_default(), raw)?;
        }
    }

    Ok(result)
}

/// Applies a raw per-category table to an override, overwriting any present values.
fn apply_raw_region_file(
    result: &mut RegionOverride,
    raw: &RawRegionFile,
) -> Result<(), ConfigError> {
    if let Some(ref file) = raw.file {
        result.file = Some(expand_tilde(file)?);
    }
    if let Some(ref keys) = raw.name_keys {
        result.name_keys = Some(keys.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse::parse_config_str, test_support::TestDir};

    fn parsed(path: PathBuf, toml: &str) -> ParsedConfig {
        ParsedConfig {
            config: parse_config_str(toml, &path).unwrap(),
            path,
        }
    }

    #[test]
    fn empty_configs_give_defaults() {
        let result = merge_configs(&[]).unwrap();
        assert_eq!(result.fields.prefix, "data");
        assert_eq!(result.regions.dir, Path::new("regions"));
        assert!(result.config_root.is_none());
    }

    #[test]
    fn scalar_first_definition_wins() {
        let test_dir = TestDir::new();
        let high = parsed(
            test_dir.path().join("project/.vds.toml"),
            "[fields]\nprefix = \"record\"\n",
        );
        let low = parsed(
            test_dir.path().join(".vds.toml"),
            "[fields]\nprefix = \"ignored\"\ngeo = \"location\"\n\n[schema]\ndefault_version = \"v1.0.0\"\n",
        );

        let result = merge_configs(&[high, low]).unwrap();
        assert_eq!(result.fields.prefix, "record");
        assert_eq!(result.fields.geo, "location");
        assert_eq!(result.fields.all_text, "meta.all");
        assert_eq!(result.schema.default_version.as_deref(), Some("v1.0.0"));
        assert_eq!(
            result.config_root.as_deref(),
            Some(test_dir.path().join("project").as_path())
        );
    }

    #[test]
    fn region_dir_resolves_against_defining_file() {
        let test_dir = TestDir::new();
        let high = parsed(test_dir.path().join("project/.vds.toml"), "");
        let low = parsed(
            test_dir.path().join(".vds.toml"),
            "[regions]\ndir = \"boundaries\"\n",
        );

        let result = merge_configs(&[high, low]).unwrap();
        assert_eq!(result.regions.dir, test_dir.path().join("boundaries"));
    }

    #[test]
    fn region_overrides_merge_per_key() {
        let test_dir = TestDir::new();
        let high = parsed(
            test_dir.path().join("project/.vds.toml"),
            "[regions.marine]\nname_keys = \"name_en\"\n",
        );
        let low = parsed(
            test_dir.path().join(".vds.toml"),
            "[regions.marine]\nfile = \"seas.geojson\"\nname_keys = [\"name\"]\n",
        );

        let result = merge_configs(&[high, low]).unwrap();
        let marine = &result.regions.overrides[&RegionCategory::Marine];
        assert_eq!(marine.file.as_deref(), Some(Path::new("seas.geojson")));
        assert_eq!(marine.name_keys, Some(vec!["name_en".to_string()]));
        assert!(!result.regions.overrides.contains_key(&RegionCategory::Country));
    }

    #[test]
    fn unknown_region_category_is_an_error() {
        let test_dir = TestDir::new();
        let config = parsed(
            test_dir.path().join(".vds.toml"),
            "[regions.planet]\nfile = \"mars.geojson\"\n",
        );

        let err = merge_configs(&[config]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownRegionCategory { ref category, .. } if category == "planet"
        ));
    }
}
