// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync command implementation.

use casesync::cli::Cli;
use casesync::config::{self, Config};
use casesync::discovery;
use casesync::error::ExitCode;
use casesync::sync::{self, SyncOptions};

/// Run a synchronization with the parsed arguments.
pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;

    let root = match &cli.root {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => cwd.join(path),
        None => cwd.clone(),
    };

    let source = discovery::locate(cli.config.as_deref(), &cwd, &root)?;
    let config = match source.path() {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            config::load_with_warnings(path)?
        }
        None => {
            tracing::debug!("no config found, using defaults");
            Config::default()
        }
    };

    let options = SyncOptions {
        repo: cli.repo_dir.clone(),
        root,
        dry_run: cli.dry_run,
        config,
    };
    sync::run(&options)?;

    Ok(ExitCode::Success)
}
