//! Configuration loading.
//!
//! Lookup order: an explicit `--config` path, then `.mismatch-lint.yaml` in
//! the project root, then `<user config dir>/mismatch-lint/config.yaml`, then
//! built-in defaults.

pub mod defaults;
pub mod schema;

use std::path::{Path, PathBuf};

pub use schema::{FamilyNames, FamilyOverrides, LintConfig, PerformanceConfig};

use crate::error::{MismatchError, Result};

/// Name of the per-project config file.
pub const PROJECT_CONFIG_FILE: &str = ".mismatch-lint.yaml";

/// Name of the config file inside the user config directory.
const USER_CONFIG_FILE: &str = "config.yaml";

/// Load and parse a config file.
pub fn load(path: &Path) -> Result<LintConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MismatchError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    parse(&contents)
        .map_err(|e| MismatchError::Config(format!("invalid config {}: {e}", path.display())))
}

/// Parse config YAML. An empty document yields the defaults.
pub fn parse(contents: &str) -> Result<LintConfig> {
    if contents.trim().is_empty() {
        return Ok(LintConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

/// Find and load the config that applies to `project_root`.
pub fn discover(project_root: &Path) -> Result<LintConfig> {
    match discover_path(project_root) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            load(&path)
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(LintConfig::default())
        }
    }
}

/// The config file that [`discover`] would load, if any.
pub fn discover_path(project_root: &Path) -> Option<PathBuf> {
    let local = project_root.join(PROJECT_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|p| p.is_file())
}

/// `<user config dir>/mismatch-lint/config.yaml`, when a home directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mismatch-lint")
        .map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE))
}
