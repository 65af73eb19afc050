// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One synchronization run over a project.
//!
//! Loads the testcase index, rewrites every matching test file under the
//! tests directory, then regenerates the manual stubs module from the
//! testcases no source file claimed.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::load_testcases;
use crate::manual::ManualStubGenerator;
use crate::rewriter::FileRewriter;
use crate::walker::{FileWalker, WalkerConfig};

/// Inputs for a run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Work-item repository root.
    pub repo: PathBuf,
    /// Project root; config paths are relative to it.
    pub root: PathBuf,
    /// Compute changes without writing or deleting files.
    pub dry_run: bool,
    pub config: Config,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub stubs: usize,
}

/// Build a glob set from test file patterns.
fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| Error::Config {
            message: format!("invalid test pattern {:?}: {}", pattern, e),
            path: None,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::Config {
        message: format!("invalid test patterns: {}", e),
        path: None,
    })
}

/// Run a full synchronization.
///
/// Fails before touching any file when the testcase index cannot be loaded.
pub fn run(options: &SyncOptions) -> Result<SyncSummary> {
    let config = &options.config;
    let test_files = build_glob_set(&config.project.test_patterns)?;
    let index = load_testcases(&options.repo)?;

    let manual_path = options.root.join(&config.manual.file);
    if !options.dry_run {
        remove_stale(&manual_path)?;
    }

    let tests_dir = options.root.join(&config.project.tests);
    let mut rewriter = FileRewriter::new();
    let mut summary = SyncSummary::default();

    if tests_dir.is_dir() {
        let walker = FileWalker::new(WalkerConfig {
            exclude_patterns: config.project.exclude.clone(),
            ..Default::default()
        });
        let (rx, handle) = walker.walk(&tests_dir);

        for file in rx {
            if file.path == manual_path || !is_test_file(&test_files, &tests_dir, &file.path) {
                continue;
            }
            summary.files_scanned += 1;

            let Some(rewrite) = rewriter.rewrite_file(&file.path, &index, !options.dry_run)?
            else {
                continue;
            };
            if rewrite.modified {
                summary.files_rewritten += 1;
                if options.dry_run {
                    tracing::info!(
                        "would update {} ({} insertions)",
                        file.path.display(),
                        rewrite.insertions
                    );
                }
            }
        }

        let stats = handle.join();
        tracing::debug!(
            "walked {} files under {} ({} errors)",
            stats.files_found,
            tests_dir.display(),
            stats.errors
        );
    } else {
        tracing::warn!("tests directory {} not found", tests_dir.display());
    }

    let generator =
        ManualStubGenerator::new(&config.requirements, config.manual.imports.clone());
    let stubs = generator.generate(&index, rewriter.seen());
    summary.stubs = stubs.stubs;

    if options.dry_run {
        tracing::info!(
            "would write {} manual stubs to {}",
            stubs.stubs,
            manual_path.display()
        );
    } else {
        if let Some(parent) = manual_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(&manual_path, &stubs.content).map_err(|e| Error::io(&manual_path, e))?;
    }

    tracing::info!(
        "scanned {} files, rewrote {}, generated {} manual stubs",
        summary.files_scanned,
        summary.files_rewritten,
        summary.stubs
    );
    Ok(summary)
}

fn is_test_file(test_files: &GlobSet, tests_dir: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(tests_dir).unwrap_or(path);
    test_files.is_match(relative)
}

/// Delete the previous manual stubs module so its tests never match.
fn remove_stale(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("removed {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Error::io(path, err)),
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
