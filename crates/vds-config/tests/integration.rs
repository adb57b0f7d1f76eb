//! Integration tests for vds-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> region sources.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use vds_config::{CONFIG_FILENAME, Config, ConfigError};
use vds_geo::RegionCategory;

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a `.vds.toml` into `rel_dir` and returns its path.
    fn create_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let dir = self.create_dir(rel_dir);
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn root_config_without_settings_gives_defaults() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n");
    let cwd = env.create_dir("a/b");

    let config = Config::load(&cwd).unwrap();

    assert_eq!(config.fields.prefix, "data");
    assert!(config.schema.default_version.is_none());
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
}

#[test]
fn nested_configs_merge_with_closest_winning() {
    let env = TestEnv::new();
    env.create_config(
        "",
        r#"
root = true

[fields]
prefix = "outer"
geo = "location"

[regions]
dir = "shared/regions"
"#,
    );
    env.create_config(
        "project",
        r#"
[fields]
prefix = "record"

[regions.country]
file = "countries.geojson"
name_keys = "ADMIN"
"#,
    );
    let cwd = env.create_dir("project/src");

    let config = Config::load(&cwd).unwrap();

    assert_eq!(config.fields.prefix, "record");
    assert_eq!(config.fields.geo, "location");
    assert_eq!(config.regions.dir, env.path().join("shared/regions"));
    assert_eq!(config.config_root, Some(env.path().join("project")));

    let sources = config.region_sources();
    let country = sources
        .iter()
        .find(|s| s.category == RegionCategory::Country)
        .unwrap();
    assert_eq!(
        country.path,
        env.path().join("shared/regions/countries.geojson")
    );
    assert_eq!(country.name_keys, vec!["ADMIN"]);
}

#[test]
fn load_file_skips_discovery() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n[fields]\nprefix = \"parent\"\n");
    let path = env.create_config("child", "[schema]\ndefault_version = \"v1.0.0\"\n");

    let config = Config::load_file(&path).unwrap();

    assert_eq!(config.fields.prefix, "data");
    assert_eq!(config.schema.default_version.as_deref(), Some("v1.0.0"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let env = TestEnv::new();
    let err = Config::load_file(&env.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn invalid_toml_is_an_error() {
    let env = TestEnv::new();
    env.create_config("", "root = true\n[fields\n");

    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}
