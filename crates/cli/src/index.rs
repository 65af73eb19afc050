// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Title index over active testcases.
//!
//! Maps each testcase title to the ids of the records sharing it, in the
//! order they were first seen. Built once from a [`RecordCache`], then only
//! read.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{Error, Result};
use crate::record::{Record, RecordCache, RecordLookup, WorkItemRepo};

#[allow(clippy::expect_used)]
static PARAM_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*\]$").expect("valid regex"));

/// Strip a trailing `[...]` parametrization suffix.
pub fn normalize_title(title: &str) -> String {
    PARAM_SUFFIX.replace(title, "").into_owned()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    /// No testcase carries this title.
    #[error("no testcase titled `{0}`")]
    UnknownTitle(String),
}

pub struct TestcaseIndex {
    cache: RecordCache,
    titles: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
    records: HashMap<String, Arc<Record>>,
}

impl TestcaseIndex {
    pub fn new(cache: RecordCache) -> Self {
        Self {
            cache,
            titles: Vec::new(),
            positions: HashMap::new(),
            records: HashMap::new(),
        }
    }

    /// Load every record the source lists and index the active testcases.
    ///
    /// Returns the number of records indexed.
    pub fn load_active(&mut self) -> Result<usize> {
        let ids = self.cache.source().record_ids()?;
        tracing::debug!("scanning {} work items", ids.len());

        let mut indexed = 0;
        for id in ids {
            let RecordLookup::Found(record) = self.cache.get(&id) else {
                continue;
            };
            if !record.is_active() {
                tracing::trace!("skipping inactive testcase {}", id);
                continue;
            }
            let Some(title) = record.title().map(String::from) else {
                continue;
            };
            self.push(title, id.clone());
            self.records.insert(id, record);
            indexed += 1;
        }
        Ok(indexed)
    }

    fn push(&mut self, title: String, id: String) {
        match self.positions.get(&title) {
            Some(&pos) => self.titles[pos].1.push(id),
            None => {
                self.positions.insert(title.clone(), self.titles.len());
                self.titles.push((title, vec![id]));
            }
        }
    }

    /// Strip parametrization suffixes from every title, merging id lists of
    /// titles that collapse together.
    pub fn normalize_names(&mut self) {
        let titles = std::mem::take(&mut self.titles);
        self.positions.clear();
        for (title, ids) in titles {
            let normalized = normalize_title(&title);
            for id in ids {
                self.push(normalized.clone(), id);
            }
        }
    }

    /// Titles with at least one non-automated variant, paired with those
    /// variants' ids.
    pub fn manual_testcases(&self) -> Vec<(String, Vec<String>)> {
        self.titles
            .iter()
            .filter_map(|(title, ids)| {
                let manual: Vec<String> = ids
                    .iter()
                    .filter(|id| self.records.get(*id).is_some_and(|r| !r.is_automated()))
                    .cloned()
                    .collect();
                (!manual.is_empty()).then(|| (title.clone(), manual))
            })
            .collect()
    }

    /// Record for `title`.
    ///
    /// With `automated` unset the first variant is returned. Otherwise the
    /// first variant whose automation state matches, or `None`.
    pub fn get_by_name(
        &self,
        title: &str,
        automated: Option<bool>,
    ) -> std::result::Result<Option<Arc<Record>>, IndexError> {
        let ids = self
            .ids(title)
            .ok_or_else(|| IndexError::UnknownTitle(title.to_string()))?;

        let mut variants = ids.iter().filter_map(|id| self.records.get(id));
        let found = match automated {
            None => variants.next(),
            Some(want) => variants.find(|r| r.is_automated() == want),
        };
        Ok(found.cloned())
    }

    /// Ids sharing `title`, in first-seen order.
    pub fn ids(&self, title: &str) -> Option<&[String]> {
        let pos = *self.positions.get(title)?;
        Some(&self.titles[pos].1)
    }

    pub fn record(&self, id: &str) -> Option<&Arc<Record>> {
        self.records.get(id)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(|(title, _)| title.as_str())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Build the normalized index for a repository checkout.
///
/// Fails when the work items cannot be walked or no active testcase loads.
pub fn load_testcases(repo: &Path) -> Result<TestcaseIndex> {
    let load_error = |message: String| Error::TestcaseLoad {
        repo: repo.to_path_buf(),
        message,
    };

    let mut index = TestcaseIndex::new(RecordCache::new(WorkItemRepo::new(repo)));
    let count = index
        .load_active()
        .map_err(|e| load_error(e.to_string()))?;
    if count == 0 {
        return Err(load_error("no testcases loaded".to_string()));
    }

    index.normalize_names();
    tracing::info!("loaded {} testcases ({} titles)", count, index.len());
    Ok(index)
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
