// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles casesync.toml parsing with version validation and unknown key warnings.

mod parse;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use parse::{
    parse_manual_config, parse_project_config, parse_requirements, warn_unknown_key,
};

/// Minimum config structure for version checking.
#[derive(Deserialize)]
struct VersionOnly {
    version: Option<i64>,
}

/// Config with flexible parsing that captures unknown keys.
#[derive(Deserialize)]
struct FlexibleConfig {
    version: i64,

    #[serde(default)]
    project: Option<toml::Value>,

    #[serde(default)]
    manual: Option<toml::Value>,

    #[serde(default)]
    requirements: Option<toml::Value>,

    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Full configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Test source tree.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Generated manual stubs module.
    #[serde(default)]
    pub manual: ManualConfig,

    /// Requirement name to the work-item ids linked to it.
    #[serde(default)]
    pub requirements: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            project: ProjectConfig::default(),
            manual: ManualConfig::default(),
            requirements: BTreeMap::new(),
        }
    }
}

/// Project-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding the tests, relative to the project root.
    #[serde(default = "ProjectConfig::default_tests")]
    pub tests: String,

    /// Glob patterns selecting test files, relative to the tests directory.
    #[serde(default = "ProjectConfig::default_test_patterns")]
    pub test_patterns: Vec<String>,

    /// Patterns excluded from the walk.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            tests: Self::default_tests(),
            test_patterns: Self::default_test_patterns(),
            exclude: Vec::new(),
        }
    }
}

impl ProjectConfig {
    pub(crate) fn default_tests() -> String {
        "cfme/tests".to_string()
    }

    pub(crate) fn default_test_patterns() -> Vec<String> {
        vec!["**/test_*.py".to_string()]
    }
}

/// Manual stubs module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManualConfig {
    /// Generated file, relative to the project root.
    #[serde(default = "ManualConfig::default_file")]
    pub file: String,

    /// Import lines written after the module docstring.
    #[serde(default = "crate::manual::default_imports")]
    pub imports: Vec<String>,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
            imports: crate::manual::default_imports(),
        }
    }
}

impl ManualConfig {
    pub(crate) fn default_file() -> String {
        "cfme/tests/test_manual.py".to_string()
    }
}

/// Currently supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Known top-level keys in the config.
const KNOWN_KEYS: &[&str] = &["version", "project", "manual", "requirements"];

/// Load and validate config from a file path.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&content, path)
}

/// Load config with warnings for unknown keys.
pub fn load_with_warnings(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_with_warnings(&content, path)
}

fn config_error(message: impl Into<String>, path: &Path) -> Error {
    Error::Config {
        message: message.into(),
        path: Some(path.to_path_buf()),
    }
}

fn check_version(version: i64, path: &Path) -> Result<()> {
    if version != SUPPORTED_VERSION {
        return Err(config_error(
            format!(
                "unsupported config version {} (supported: {})\n  Upgrade casesync to use this config.",
                version, SUPPORTED_VERSION
            ),
            path,
        ));
    }
    Ok(())
}

/// Parse config from string content (strict mode).
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let version_check: VersionOnly =
        toml::from_str(content).map_err(|e| config_error(e.to_string(), path))?;
    let version = version_check
        .version
        .ok_or_else(|| config_error("missing required field: version", path))?;
    check_version(version, path)?;

    toml::from_str(content).map_err(|e| config_error(e.to_string(), path))
}

/// Parse config, warning on unknown keys.
pub fn parse_with_warnings(content: &str, path: &Path) -> Result<Config> {
    let version_check: VersionOnly =
        toml::from_str(content).map_err(|e| config_error(e.to_string(), path))?;
    if version_check.version.is_none() {
        return Err(config_error("missing required field: version", path));
    }

    let flexible: FlexibleConfig =
        toml::from_str(content).map_err(|e| config_error(e.to_string(), path))?;
    check_version(flexible.version, path)?;

    let unknown_keys: BTreeSet<&String> = flexible
        .unknown
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .collect();
    for key in unknown_keys {
        warn_unknown_key(path, key);
    }

    Ok(Config {
        version: flexible.version,
        project: parse_project_config(flexible.project.as_ref(), path),
        manual: parse_manual_config(flexible.manual.as_ref(), path),
        requirements: parse_requirements(flexible.requirements.as_ref(), path),
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
