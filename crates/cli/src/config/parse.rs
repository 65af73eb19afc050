// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parse helper functions for configuration.

use std::collections::BTreeMap;
use std::path::Path;

use super::{ManualConfig, ProjectConfig};

/// Known project keys in the config.
const KNOWN_PROJECT_KEYS: &[&str] = &["tests", "test_patterns", "exclude"];

/// Known manual keys in the config.
const KNOWN_MANUAL_KEYS: &[&str] = &["file", "imports"];

/// Parse a TOML array of strings into a Vec<String>.
pub(super) fn parse_string_array(value: Option<&toml::Value>) -> Option<Vec<String>> {
    value?.as_array().map(|arr| {
        arr.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    })
}

/// Parse a TOML array of strings with a default function.
pub(super) fn parse_string_array_or_else<F>(value: Option<&toml::Value>, default: F) -> Vec<String>
where
    F: FnOnce() -> Vec<String>,
{
    parse_string_array(value).unwrap_or_else(default)
}

/// Parse a TOML string value with a default function.
fn parse_string_or_else<F>(value: Option<&toml::Value>, default: F) -> String
where
    F: FnOnce() -> String,
{
    value
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(default)
}

/// Warn about an unrecognized config key.
pub(super) fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "casesync: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

fn warn_unknown_keys(table: &toml::Table, known: &[&str], section: &str, path: &Path) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            warn_unknown_key(path, &format!("{}.{}", section, key));
        }
    }
}

/// Parse the `[project]` section.
pub(super) fn parse_project_config(value: Option<&toml::Value>, path: &Path) -> ProjectConfig {
    let Some(toml::Value::Table(t)) = value else {
        return ProjectConfig::default();
    };
    warn_unknown_keys(t, KNOWN_PROJECT_KEYS, "project", path);

    ProjectConfig {
        tests: parse_string_or_else(t.get("tests"), ProjectConfig::default_tests),
        test_patterns: parse_string_array_or_else(
            t.get("test_patterns"),
            ProjectConfig::default_test_patterns,
        ),
        exclude: parse_string_array(t.get("exclude")).unwrap_or_default(),
    }
}

/// Parse the `[manual]` section.
pub(super) fn parse_manual_config(value: Option<&toml::Value>, path: &Path) -> ManualConfig {
    let Some(toml::Value::Table(t)) = value else {
        return ManualConfig::default();
    };
    warn_unknown_keys(t, KNOWN_MANUAL_KEYS, "manual", path);

    ManualConfig {
        file: parse_string_or_else(t.get("file"), ManualConfig::default_file),
        imports: parse_string_array_or_else(t.get("imports"), crate::manual::default_imports),
    }
}

/// Parse the `[requirements]` table of name to linked ids.
pub(super) fn parse_requirements(
    value: Option<&toml::Value>,
    path: &Path,
) -> BTreeMap<String, Vec<String>> {
    let Some(toml::Value::Table(t)) = value else {
        return BTreeMap::new();
    };

    t.iter()
        .filter_map(|(name, ids)| match parse_string_array(Some(ids)) {
            Some(ids) => Some((name.clone(), ids)),
            None => {
                warn_unknown_key(path, &format!("requirements.{}", name));
                None
            }
        })
        .collect()
}
