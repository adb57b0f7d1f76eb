//! Shared context for running CLI commands.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use serde_json::Value;
use tracing::debug;
use vds_config::{Config, discover_config_files};
use vds_geo::GeoRegions;
use vds_query::{FieldNames, QueryDocument, QueryError, QuerySchema, SchemaRegistry};

use super::args::GlobalArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Config files that were merged, highest precedence first.
    pub config_files: Vec<PathBuf>,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
    /// Schema version requested on the command line.
    schema_version: Option<String>,
}

impl CommandContext {
    /// Discovers and loads configuration.
    ///
    /// An explicit `--config` file replaces discovery.
    pub fn load(args: &GlobalArgs) -> Result<Self, ExitCode> {
        let config_files = match &args.config {
            Some(path) => vec![path.clone()],
            None => discover_config_files(&current_dir_or_failure()?),
        };
        let config = Config::load_from_files(&config_files).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        debug!(files = config_files.len(), "configuration loaded");
        Ok(Self {
            config_files,
            config,
            schema_version: args.schema_version.clone(),
        })
    }

    /// Reads and parses a query document from `file`, or from stdin when absent.
    pub fn read_query(&self, file: Option<&Path>) -> Result<Value, ExitCode> {
        let text = match file {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                eprintln!("error: failed to read {}: {e}", path.display());
                ExitCode::FAILURE
            })?,
            None => io::read_to_string(io::stdin()).map_err(|e| {
                eprintln!("error: failed to read stdin: {e}");
                ExitCode::FAILURE
            })?,
        };
        serde_json::from_str(&text).map_err(|e| report(&QueryError::InvalidJson(e.to_string())))
    }

    /// Loads every configured boundary set.
    pub fn load_regions(&self) -> Result<GeoRegions, ExitCode> {
        GeoRegions::load(&self.config.region_sources()).map_err(|e| {
            eprintln!("error: failed to load regions: {e}");
            ExitCode::FAILURE
        })
    }

    /// Returns the schema selected by `--version-schema`, the config default, or the newest.
    ///
    /// Boundary data is only loaded when `query` refers to named areas.
    pub fn schema_for(&self, query: &Value) -> Result<Arc<dyn QuerySchema>, ExitCode> {
        let regions = if needs_regions(query) {
            self.load_regions()?
        } else {
            debug!("query has no named areas, skipping region load");
            GeoRegions::empty()
        };
        self.select_schema(regions)
    }

    /// Returns the selected schema without boundary data.
    ///
    /// Hashing identifies named areas by category and name, so it never needs the lookup.
    pub fn schema_for_hash(&self) -> Result<Arc<dyn QuerySchema>, ExitCode> {
        self.select_schema(GeoRegions::empty())
    }

    /// Picks the schema version over `regions`.
    fn select_schema(&self, regions: GeoRegions) -> Result<Arc<dyn QuerySchema>, ExitCode> {
        let registry = SchemaRegistry::new(Arc::new(regions), self.field_names());
        let version = self
            .schema_version
            .as_deref()
            .or(self.config.schema.default_version.as_deref());
        registry.get_or_latest(version).map_err(|e| report(&e))
    }

    /// Field conventions from the configuration.
    fn field_names(&self) -> FieldNames {
        let fields = &self.config.fields;
        FieldNames {
            prefix: fields.prefix.clone(),
            all_text: fields.all_text.clone(),
            geo: fields.geo.clone(),
        }
    }
}

/// Prints a query error and returns the failure exit code.
pub fn report(err: &QueryError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::FAILURE
}

/// Returns true if the document parses and contains a `geo_named_area` filter.
///
/// Documents that fail to parse report their error from the schema instead.
fn needs_regions(query: &Value) -> bool {
    QueryDocument::from_value(query).is_ok_and(|document| {
        document
            .filters
            .is_some_and(|filters| !filters.named_areas().is_empty())
    })
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn named_areas_need_regions() {
        assert!(needs_regions(
            &json!({"filters": {"not": [{"geo_named_area": {"country": "France"}}]}})
        ));
    }

    #[test]
    fn plain_queries_do_not_need_regions() {
        assert!(!needs_regions(&json!({"search": "rosa"})));
        assert!(!needs_regions(
            &json!({"filters": {"exists": {"fields": ["genus"]}}})
        ));
        assert!(!needs_regions(&json!({"filters": {"bogus": {}}})));
    }
}
