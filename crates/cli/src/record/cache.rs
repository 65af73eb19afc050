// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lazy, memoizing record cache.
//!
//! Entries are created on first access and never evicted. A record that
//! fails to load, or is not a testcase, is cached as a terminal entry so the
//! repository is never asked for it twice.

use std::collections::HashMap;
use std::sync::Arc;

use super::{FieldValue, RawFields, Record, RecordError, RecordSource, TESTCASE_TYPE};

/// Outcome of a cache lookup.
#[derive(Debug, Clone)]
pub enum RecordLookup {
    /// A loaded testcase.
    Found(Arc<Record>),
    /// No record file exists for the id.
    NotFound,
    /// Malformed id, unreadable file, or not a testcase.
    Invalid,
}

impl RecordLookup {
    /// The record, if one was found.
    pub fn found(self) -> Option<Arc<Record>> {
        match self {
            RecordLookup::Found(record) => Some(record),
            RecordLookup::NotFound | RecordLookup::Invalid => None,
        }
    }
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Loaded(Arc<Record>),
    Missing,
    Invalid,
}

impl CacheEntry {
    fn lookup(&self) -> RecordLookup {
        match self {
            CacheEntry::Loaded(record) => RecordLookup::Found(Arc::clone(record)),
            CacheEntry::Missing => RecordLookup::NotFound,
            CacheEntry::Invalid => RecordLookup::Invalid,
        }
    }
}

/// Record cache over a [`RecordSource`].
pub struct RecordCache {
    source: Box<dyn RecordSource>,
    entries: HashMap<String, CacheEntry>,
}

impl RecordCache {
    pub fn new(source: impl RecordSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::new(),
        }
    }

    pub fn source(&self) -> &dyn RecordSource {
        self.source.as_ref()
    }

    /// Look up a record, loading it on first access.
    pub fn get(&mut self, id: &str) -> RecordLookup {
        if let Some(entry) = self.entries.get(id) {
            return entry.lookup();
        }

        let entry = self.load(id);
        let lookup = entry.lookup();
        self.entries.insert(id.to_string(), entry);
        lookup
    }

    /// Number of cached entries, valid or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load(&self, id: &str) -> CacheEntry {
        let loaded = self
            .source
            .load(id)
            .and_then(|raw| build_record(id, raw));

        match loaded {
            Ok(record) => CacheEntry::Loaded(Arc::new(record)),
            Err(RecordError::WrongType { .. }) => {
                tracing::trace!("skipping work item {}: not a testcase", id);
                CacheEntry::Invalid
            }
            Err(RecordError::NotFound(path)) => {
                tracing::warn!("couldn't load work item {}: {} missing", id, path.display());
                CacheEntry::Missing
            }
            Err(err) => {
                tracing::warn!("couldn't load work item {}: {}", id, err);
                CacheEntry::Invalid
            }
        }
    }
}

/// Turn parsed fields into a testcase record.
///
/// `testSteps` arrives as one list alternating step and expected result; it
/// is split by position into `testSteps` (even) and `expectedResults` (odd).
pub(crate) fn build_record(id: &str, mut raw: RawFields) -> Result<Record, RecordError> {
    let kind = raw
        .get("type")
        .and_then(FieldValue::as_text)
        .unwrap_or_default();
    if kind != TESTCASE_TYPE {
        return Err(RecordError::WrongType {
            id: id.to_string(),
            found: kind.to_string(),
        });
    }

    if let Some(value) = raw.remove("testSteps") {
        let mut steps = Vec::new();
        let mut results = Vec::new();
        for (index, entry) in value.to_lines().into_iter().enumerate() {
            if index % 2 == 0 {
                steps.push(entry);
            } else {
                results.push(entry);
            }
        }
        raw.insert("testSteps".to_string(), FieldValue::Lines(steps));
        raw.insert("expectedResults".to_string(), FieldValue::Lines(results));
    }

    raw.entry("assignee".to_string())
        .or_insert_with(|| FieldValue::Text(String::new()));
    if !raw.contains_key("title") {
        tracing::debug!("work item {} has no title", id);
    }
    raw.insert("work_item_id".to_string(), FieldValue::Text(id.to_string()));

    Ok(Record::new(id, raw))
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
