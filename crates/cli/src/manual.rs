// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Manual test stub generation.
//!
//! Testcases without automation that no source test matched become stub
//! functions in a single generated module.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::fields::Metadata;
use crate::index::TestcaseIndex;
use crate::planner::{merge_doc_block, tier_annotation};
use crate::scanner::DocBlock;

/// Longest generated function name.
pub const MAX_NAME_LEN: usize = 85;

const STUB_INDENT: usize = 4;

/// Imports of the generated module when none are configured.
pub fn default_imports() -> Vec<String> {
    vec![
        "import pytest".to_string(),
        "from cfme import test_requirements".to_string(),
    ]
}

/// Generated module text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualStubs {
    pub content: String,
    /// Number of stub functions.
    pub stubs: usize,
}

pub struct ManualStubGenerator {
    /// Linked work-item id to requirement name.
    requirements: HashMap<String, String>,
    imports: Vec<String>,
}

impl ManualStubGenerator {
    /// `requirements` maps a requirement name to the ids linked to it.
    pub fn new(requirements: &BTreeMap<String, Vec<String>>, imports: Vec<String>) -> Self {
        let requirements = requirements
            .iter()
            .flat_map(|(name, ids)| ids.iter().map(move |id| (id.clone(), name.clone())))
            .collect();
        Self {
            requirements,
            imports,
        }
    }

    /// Module header: pragmas, docstring, imports.
    pub fn header(&self) -> String {
        let mut header = String::from("# -*- coding: utf-8 -*-\n# pylint: skip-file\n");
        header.push_str("\"\"\"Manual tests\"\"\"\n");
        for import in &self.imports {
            header.push('\n');
            header.push_str(import);
            header.push('\n');
        }
        header
    }

    /// Stub source for one manual variant.
    pub fn stub(&self, title: &str, id: &str, mut metadata: Metadata) -> String {
        let name = stub_name(metadata.text("title").unwrap_or(title), id);

        let mut stub = String::from("@pytest.mark.manual\n");
        if let Some(requirement) = self.requirement_annotation(&mut metadata) {
            stub.push_str(&requirement);
            stub.push('\n');
        }
        if let Some(tier) = tier_annotation(&metadata) {
            stub.push_str(&tier);
            stub.push('\n');
        }
        stub.push_str(&format!("def {}():\n", name));

        let doc = DocBlock {
            indent: STUB_INDENT,
            ..Default::default()
        };
        stub.push_str(&merge_doc_block(&doc, &metadata));
        stub
    }

    /// Requirement decorator for the first linked item. Linked items are
    /// consumed either way.
    fn requirement_annotation(&self, metadata: &mut Metadata) -> Option<String> {
        let linked = metadata.remove("linkedWorkItems")?.to_lines();
        let first = linked.first()?;
        let name = self.requirements.get(first)?;
        Some(format!("@test_requirements.{}", name))
    }

    /// Generate the module for every manual testcase not in `seen`.
    pub fn generate(&self, index: &TestcaseIndex, seen: &BTreeSet<String>) -> ManualStubs {
        let mut stubs = Vec::new();

        for (title, ids) in index.manual_testcases() {
            if seen.contains(&title) {
                continue;
            }
            for id in ids {
                let Some(record) = index.record(&id) else {
                    tracing::error!("failed to get data for test `{}` ({})", title, id);
                    continue;
                };
                stubs.push(self.stub(&title, &id, Metadata::from_record(record)));
            }
        }

        let mut content = self.header();
        for stub in &stubs {
            content.push_str("\n\n");
            content.push_str(stub);
        }
        ManualStubs {
            content,
            stubs: stubs.len(),
        }
    }
}

/// Function name for a manual stub.
///
/// Lowercase ASCII letters, digits, and single underscores, starting with
/// `test_`, at most [`MAX_NAME_LEN`] characters. Falls back to the record
/// id when the title has no usable characters.
pub fn stub_name(title: &str, id: &str) -> String {
    let slug = [title, id, "manual"]
        .into_iter()
        .map(slugify)
        .find(|slug| !slug.is_empty())
        .unwrap_or_default();

    let mut name = if slug.starts_with("test_") {
        slug
    } else {
        format!("test_{}", slug)
    };
    name.truncate(MAX_NAME_LEN);
    while name.ends_with('_') {
        name.pop();
    }
    name
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

#[cfg(test)]
#[path = "manual_tests.rs"]
mod tests;
