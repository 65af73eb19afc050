//! Locating casesync.toml for a run.
//!
//! An explicit `--config` path wins. Otherwise the project root and its
//! ancestors are searched, stopping at the enclosing git checkout.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "casesync.toml";

/// Where the run's configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named with `--config` or `CASESYNC_CONFIG`.
    Explicit(PathBuf),
    /// Found next to the project root or above it.
    Discovered(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Discovered(path) => Some(path),
            ConfigSource::Defaults => None,
        }
    }
}

/// Decide which config file a sync over `root` uses.
///
/// A relative explicit path is taken from `cwd`, like any other CLI path.
pub fn locate(explicit: Option<&Path>, cwd: &Path, root: &Path) -> Result<ConfigSource> {
    let Some(path) = explicit else {
        return Ok(search_upward(root).map_or(ConfigSource::Defaults, ConfigSource::Discovered));
    };

    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    if !path.is_file() {
        return Err(Error::Config {
            message: format!("config file not found: {}", path.display()),
            path: Some(path),
        });
    }
    Ok(ConfigSource::Explicit(path))
}

/// First casesync.toml in `root` or its ancestors, up to the git checkout.
pub fn search_upward(root: &Path) -> Option<PathBuf> {
    for dir in root.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
