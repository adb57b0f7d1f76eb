//! Path resolution for configured directories and files.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path against the directory of the config file that set it.
///
/// - Tilde paths (`~/data`) expand to the home directory.
/// - Relative paths (`./regions`, `../shared`) are joined onto `config_dir`.
/// - Absolute paths are returned unchanged.
///
/// The path is not required to exist; missing boundary data is reported when it is loaded.
pub fn resolve_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a leading `~` to the home directory.
///
/// Paths not starting with `~` are returned unchanged.
pub fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_config_dir() {
        let dir = Path::new("/etc/vds");
        assert_eq!(
            resolve_path("./regions", dir).unwrap(),
            Path::new("/etc/vds/./regions")
        );
        assert_eq!(
            resolve_path("regions", dir).unwrap(),
            Path::new("/etc/vds/regions")
        );
    }

    #[test]
    fn absolute_paths_are_unchanged() {
        assert_eq!(
            resolve_path("/srv/regions", Path::new("/etc/vds")).unwrap(),
            Path::new("/srv/regions")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(base_dirs) = BaseDirs::new() else {
            return;
        };
        let home = base_dirs.home_dir();
        assert_eq!(expand_tilde("~").unwrap(), home);
        assert_eq!(
            resolve_path("~/regions", Path::new("/etc")).unwrap(),
            home.join("regions")
        );
    }

    #[test]
    fn tilde_inside_name_is_literal() {
        assert_eq!(expand_tilde("a~b").unwrap(), Path::new("a~b"));
    }
}
