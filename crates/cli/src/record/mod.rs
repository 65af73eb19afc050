// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Work-item records.
//!
//! A record is the field set of one work item as stored in the checked-out
//! repository. Records are loaded lazily through [`RecordCache`], which keeps
//! failed and non-testcase lookups as terminal entries.

mod cache;
mod parse;
mod store;

use std::collections::BTreeMap;
use std::path::PathBuf;

pub use cache::{RecordCache, RecordLookup};
pub use parse::{parse_record_file, parse_record_xml};
pub use store::{RecordSource, WorkItemRepo, shard_path};

/// Work-item type that marks a testcase.
pub const TESTCASE_TYPE: &str = "testcase";

/// Automation state of an automated testcase.
pub const AUTOMATED: &str = "automated";

/// Status of a retired testcase.
pub const INACTIVE: &str = "inactive";

/// Value of a single record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Field present without content, or a required field left unset.
    Null,
    /// Scalar text.
    Text(String),
    /// Ordered multi-line content (steps, results, linked items).
    Lines(Vec<String>),
}

impl FieldValue {
    /// True for null, empty text, and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Lines(lines) => lines.is_empty(),
        }
    }

    /// Scalar text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a list of lines. Text becomes a single line, null an empty list.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            FieldValue::Null => Vec::new(),
            FieldValue::Text(s) => vec![s.clone()],
            FieldValue::Lines(lines) => lines.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Raw field mapping as produced by the record parser.
pub type RawFields = BTreeMap<String, FieldValue>;

/// A loaded testcase record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Build a record from already post-processed fields.
    pub fn new(id: impl Into<String>, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Work-item identifier, e.g. `RHCF3-31942`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Non-empty scalar text of a field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    /// Status present and not inactive.
    pub fn is_active(&self) -> bool {
        self.text("status").is_some_and(|s| s != INACTIVE)
    }

    pub fn is_automated(&self) -> bool {
        self.text("caseautomation") == Some(AUTOMATED)
    }
}

/// Reasons a record could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Identifier lacks the `<prefix>-<number>` shape.
    #[error("malformed work item id `{0}`")]
    MalformedId(String),

    /// No record file at the derived path.
    #[error("work item file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Record file could not be read.
    #[error("io error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record file is not a well-formed work item.
    #[error("invalid work item in {}: {message}", .path.display())]
    Xml { path: PathBuf, message: String },

    /// Record exists but is not a testcase.
    #[error("work item {id} has type `{found}`, not testcase")]
    WrongType { id: String, found: String },
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
