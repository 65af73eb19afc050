// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::Parser;

/// Synchronizes pytest docstrings with testcase metadata from a work-item repository
#[derive(Parser, Debug)]
#[command(name = "casesync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Work-item repository root
    #[arg(short = 'r', long = "repo-dir", env = "CASESYNC_REPO", value_name = "PATH")]
    pub repo_dir: PathBuf,

    /// Log level (debug, info, warning, error, critical)
    #[arg(long = "log-level", default_value = "INFO", value_name = "LEVEL")]
    pub log_level: String,

    /// Use specific config file
    #[arg(short = 'C', long = "config", env = "CASESYNC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Map a `--log-level` name to a tracing filter directive.
///
/// Case-insensitive. Unknown names fall back to `info`.
pub fn log_filter_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        "off" | "none" => "off",
        _ => "info",
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
