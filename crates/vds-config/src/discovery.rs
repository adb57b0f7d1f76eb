//! Configuration file discovery.
//!
//! Every ancestor of the working directory is checked for a `.vds.toml`. A file with
//! `root = true` ends the search and shadows everything above it, including `~/.vds.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".vds.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.vds.toml`) last.
/// Walking stops at a file with `root = true`, in which case the global file is skipped too.
///
/// Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
        if !candidate.is_file() {
            continue;
        }
        let stops_here = is_root_config(&candidate);
        configs.push(candidate);
        if stops_here {
            debug!(files = configs.len(), "discovery stopped at root config");
            return configs;
        }
    }

    let global = global_config_path().filter(|path| path.is_file() && !configs.contains(path));
    configs.extend(global);
    configs
}

/// Returns the path to the global configuration file (`~/.vds.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
