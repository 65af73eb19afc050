// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared unit test utilities.
//!
//! Provides in-memory record sources and on-disk work-item builders.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::error::Result;
use crate::index::TestcaseIndex;
use crate::record::{
    FieldValue, RawFields, RecordCache, RecordError, RecordSource, WorkItemRepo,
};

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Raw fields for an active testcase.
pub fn testcase(title: &str, extra: &[(&str, &str)]) -> RawFields {
    let mut fields = RawFields::new();
    fields.insert("type".into(), "testcase".into());
    fields.insert("status".into(), "approved".into());
    fields.insert("title".into(), title.into());
    fields.insert("caseautomation".into(), "automated".into());
    for (key, value) in extra {
        fields.insert(key.to_string(), FieldValue::from(*value));
    }
    fields
}

/// In-memory record source that counts loads.
#[derive(Default)]
pub struct MemorySource {
    records: BTreeMap<String, RawFields>,
    loads: Rc<Cell<usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, fields: RawFields) -> Self {
        self.records.insert(id.to_string(), fields);
        self
    }

    /// Shared counter of `load` calls, readable after the source is boxed.
    pub fn load_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.loads)
    }
}

impl RecordSource for MemorySource {
    fn record_ids(&self) -> Result<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }

    fn load(&self, id: &str) -> std::result::Result<RawFields, RecordError> {
        self.loads.set(self.loads.get() + 1);
        if !id.contains('-') {
            return Err(RecordError::MalformedId(id.to_string()));
        }
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(id.into()))
    }
}

/// Index loaded from an in-memory source, names normalized.
pub fn index_of(source: MemorySource) -> TestcaseIndex {
    let mut index = TestcaseIndex::new(RecordCache::new(source));
    index.load_active().unwrap();
    index.normalize_names();
    index
}

/// Work-item XML with scalar fields and alternating step/result entries.
pub fn work_item_xml(fields: &[(&str, &str)], steps: &[&str]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<work-item>\n");
    for (id, value) in fields {
        xml.push_str(&format!("    <field id=\"{id}\">{value}</field>\n"));
    }
    if !steps.is_empty() {
        xml.push_str("    <field id=\"testSteps\"><list><struct>");
        xml.push_str("<item id=\"keys\"><list><item>step</item><item>expectedResult</item></list></item>");
        xml.push_str("<item id=\"steps\"><list>");
        for pair in steps.chunks(2) {
            xml.push_str("<struct><item id=\"values\"><list>");
            for entry in pair {
                xml.push_str(&format!("<item text-type=\"text/html\">{entry}</item>"));
            }
            xml.push_str("</list></item></struct>");
        }
        xml.push_str("</list></item></struct></list></field>\n");
    }
    xml.push_str("</work-item>\n");
    xml
}

/// Writes a work item into a repository checkout at its sharded path.
pub fn write_work_item(repo_root: &Path, id: &str, xml: &str) {
    let path = WorkItemRepo::new(repo_root).record_path(id).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, xml).unwrap();
}
