// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk work-item repository layout.
//!
//! Records live at `<repo>/tracker/workitems/<shard>/<id>/workitem.xml`, where
//! the shard narrows the numeric part of the id into nested decade ranges.

use std::path::{Path, PathBuf};

use super::{RawFields, RecordError, parse_record_file};
use crate::error::{Error, Result};
use crate::walker::{FileWalker, WalkerConfig};

/// Directory holding work items, relative to the repository root.
pub const WORKITEMS_DIR: &str = "tracker/workitems";

/// File name of a single work item.
pub const RECORD_FILE_NAME: &str = "workitem.xml";

/// Backend the record cache loads from.
pub trait RecordSource {
    /// Identifiers of every record the source holds, in a stable order.
    fn record_ids(&self) -> Result<Vec<String>>;

    /// Load the raw fields of one record.
    fn load(&self, id: &str) -> std::result::Result<RawFields, RecordError>;
}

/// Sharded directory for a numeric work-item id.
///
/// Ids with up to three digits are stored directly under the workitems
/// directory. Longer ids get one level per digit beyond the second, e.g.
/// `31942` maps to `30000-39999/31000-31999/31900-31999`.
pub fn shard_path(num: u64) -> String {
    let digits = num.to_string().len();
    if digits <= 3 {
        return String::new();
    }

    let num = u128::from(num);
    (0..digits - 2)
        .map(|level| {
            let divisor = 10u128.pow((digits - level - 1) as u32);
            let low = num / divisor * divisor;
            format!("{}-{}", low, low + divisor - 1)
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Split `<prefix>-<number>` into its numeric part.
fn id_number(id: &str) -> Option<u64> {
    let (prefix, num) = id.split_once('-')?;
    if prefix.is_empty() || num.is_empty() || !num.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    num.parse().ok()
}

/// Checked-out work-item repository.
#[derive(Debug, Clone)]
pub struct WorkItemRepo {
    root: PathBuf,
}

impl WorkItemRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workitems_dir(&self) -> PathBuf {
        self.root.join(WORKITEMS_DIR)
    }

    /// Path of the record file for `id`.
    pub fn record_path(&self, id: &str) -> std::result::Result<PathBuf, RecordError> {
        let num = id_number(id).ok_or_else(|| RecordError::MalformedId(id.to_string()))?;
        let mut path = self.workitems_dir();
        let shard = shard_path(num);
        if !shard.is_empty() {
            path.push(shard);
        }
        path.push(id);
        path.push(RECORD_FILE_NAME);
        Ok(path)
    }
}

impl RecordSource for WorkItemRepo {
    fn record_ids(&self) -> Result<Vec<String>> {
        let dir = self.workitems_dir();
        if !dir.is_dir() {
            return Err(Error::Walk {
                message: format!("work item directory not found: {}", dir.display()),
            });
        }

        let walker = FileWalker::new(WalkerConfig {
            git_ignore: false,
            ..Default::default()
        });
        let (files, stats) = walker.walk_collect(&dir);
        tracing::debug!(
            "walked {} files under {} ({} errors)",
            stats.files_found,
            dir.display(),
            stats.errors
        );

        let mut ids: Vec<String> = files
            .iter()
            .filter(|f| f.path.file_name().is_some_and(|n| n == RECORD_FILE_NAME))
            .filter_map(|f| f.path.parent()?.file_name()?.to_str().map(String::from))
            .filter(|id| !id.is_empty() && !id.contains('*'))
            .collect();

        ids.sort_by(|a, b| {
            let key = |id: &str| (id.split('-').next().unwrap_or("").to_string(), id_number(id));
            key(a).cmp(&key(b)).then_with(|| a.cmp(b))
        });
        ids.dedup();
        Ok(ids)
    }

    fn load(&self, id: &str) -> std::result::Result<RawFields, RecordError> {
        let path = self.record_path(id)?;
        parse_record_file(&path)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
