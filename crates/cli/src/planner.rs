// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Annotation planning and metadata rendering.
//!
//! Decides what a test needs injected (a tier decorator, a metadata block
//! inside its doc block) and renders metadata deterministically: keys
//! sorted, long values wrapped, steps numbered.

use std::sync::LazyLock;

use regex::Regex;

use crate::fields::{
    self, DEFAULT_CASELEVEL, MANUAL_ONLY_FIELDS, Metadata, RENDER_OMITTED, casecomponent_name,
    caselevel_tier,
};
use crate::record::FieldValue;
use crate::sanitize::{collapse_lines, display_width, sanitize_paragraph, sanitize_string, wrap};
use crate::scanner::DocBlock;
use crate::scanner::patterns::is_bare_doc_open;

/// Header line opening the metadata block inside a doc block.
pub const DOC_HEADER: &str = "Polarion:";

/// Values wider than this are wrapped.
const MAX_VALUE_WIDTH: usize = 80;

/// Width wrapped values are broken at.
const WRAP_WIDTH: usize = 60;

/// Titles up to this width that look like test names are not rendered.
const MAX_TEST_NAME_WIDTH: usize = 85;

const STEP_INDENT: &str = "    ";

/// Fields with their own formatting; never sanitized or wrapped as values.
const WRAP_EXEMPT: &[&str] = &[
    "casecomponent",
    "setup",
    "teardown",
    "description",
    "testSteps",
    "expectedResults",
    "linkedWorkItems",
];

#[allow(clippy::expect_used)]
static NUMBERED_STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[.)]? ?").expect("valid regex"));

/// Tier number for a non-default case level.
pub fn tier(metadata: &Metadata) -> Option<u8> {
    if metadata.is_empty() {
        return None;
    }
    let level = metadata.text("caselevel").unwrap_or(DEFAULT_CASELEVEL);
    if level == DEFAULT_CASELEVEL {
        return None;
    }
    let tier = caselevel_tier(level);
    if tier.is_none() {
        tracing::warn!("unknown case level `{}`, no tier annotation", level);
    }
    tier
}

pub fn tier_annotation(metadata: &Metadata) -> Option<String> {
    tier(metadata).map(|tier| format!("@pytest.mark.tier({})", tier))
}

/// Tier decorator line at `indent`, newline included.
pub fn tier_annotation_line(metadata: &Metadata, indent: usize) -> Option<String> {
    tier_annotation(metadata).map(|annotation| format!("{}{}\n", " ".repeat(indent), annotation))
}

/// Render metadata as `key: value` lines followed by the step sections.
pub fn render_metadata(metadata: &Metadata) -> Vec<String> {
    let mut meta = metadata.clone();
    let manual = meta.is_manual();
    let omitted = |key: &str| {
        RENDER_OMITTED.contains(&key) || (!manual && MANUAL_ONLY_FIELDS.contains(&key))
    };

    let steps = step_section("testSteps", meta.get("testSteps"));
    let results = step_section("expectedResults", meta.get("expectedResults"));
    transform_values(&mut meta);
    wrap_values(&mut meta);

    let mut lines = Vec::new();
    for key in meta.keys().filter(|key| !omitted(*key)) {
        let (first, rest) = match meta.get(key) {
            Some(FieldValue::Text(text)) => (Some(text.as_str()), &[][..]),
            Some(FieldValue::Lines(values)) => match values.split_first() {
                Some((first, rest)) => (Some(first.as_str()), rest),
                None => (None, &[][..]),
            },
            Some(FieldValue::Null) | None => (None, &[][..]),
        };
        let first = first.filter(|s| !s.is_empty());

        if first.is_some() || fields::is_required(key) {
            lines.push(format!("{}: {}", key, first.unwrap_or("None")));
        }
        let key_indent = " ".repeat(key.len() + 2);
        lines.extend(rest.iter().map(|value| format!("{}{}", key_indent, value)));
    }

    lines.extend(steps);
    lines.extend(results);
    lines
}

fn step_section(name: &str, value: Option<&FieldValue>) -> Vec<String> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Vec::new();
    };
    let steps = format_steps(&value.to_lines());
    if steps.is_empty() {
        return steps;
    }
    let mut section = vec![format!("{}:", name)];
    section.extend(steps);
    section
}

fn transform_values(meta: &mut Metadata) {
    if meta
        .text("title")
        .is_some_and(|t| t.contains("test_") && display_width(t) <= MAX_TEST_NAME_WIDTH)
    {
        meta.remove("title");
    }

    if let Some(linked) = meta.get("linkedWorkItems").filter(|v| !v.is_empty()) {
        let joined = linked.to_lines().join(", ");
        meta.insert("linkedWorkItems", FieldValue::Text(joined));
    }

    if let Some(component) = meta.text("casecomponent") {
        let name = casecomponent_name(component).to_string();
        meta.insert("casecomponent", FieldValue::Text(name));
    }

    for key in MANUAL_ONLY_FIELDS {
        let Some(text) = meta.text(key) else {
            continue;
        };
        let lines = sanitize_paragraph(text);
        if lines.is_empty() {
            meta.remove(key);
        } else {
            meta.insert(*key, FieldValue::Lines(lines));
        }
    }
}

fn wrap_values(meta: &mut Metadata) {
    let keys: Vec<String> = meta
        .keys()
        .filter(|key| !WRAP_EXEMPT.contains(key))
        .map(String::from)
        .collect();

    for key in keys {
        let Some(text) = meta.text(&key) else {
            continue;
        };
        let text = if fields::is_controlled(&key) {
            text.to_string()
        } else {
            sanitize_string(text)
        };
        let text = collapse_lines(text.trim());

        let value = if display_width(&text) > MAX_VALUE_WIDTH {
            FieldValue::Lines(wrap(&text, WRAP_WIDTH))
        } else {
            FieldValue::Text(text)
        };
        meta.insert(key, value);
    }
}

/// Number, sanitize, and wrap step texts.
///
/// Steps already starting with a number keep it. A list holding a single
/// empty step renders as nothing.
pub fn format_steps(steps: &[String]) -> Vec<String> {
    if matches!(steps, [only] if only.is_empty()) {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        let step = collapse_lines(sanitize_string(step).trim());
        let numbered = NUMBERED_STEP.find(&step).map(|m| m.as_str().len());

        let prefix = match numbered {
            Some(_) => String::new(),
            None if step.is_empty() => format!("{}.", index + 1),
            None => format!("{}. ", index + 1),
        };

        let mut parts = if display_width(&step) > MAX_VALUE_WIDTH {
            wrap(&step, WRAP_WIDTH)
        } else {
            vec![step]
        };
        let rest = parts.split_off(1.min(parts.len()));
        let first = parts.pop().unwrap_or_default();
        lines.push(format!("{}{}{}", STEP_INDENT, prefix, first));

        let continuation = " ".repeat(numbered.unwrap_or(prefix.len()));
        lines.extend(
            rest.into_iter()
                .map(|part| format!("{}{}{}", STEP_INDENT, continuation, part)),
        );
    }
    lines
}

/// Metadata block lines at `indent`: the header, then each rendered line
/// four columns deeper. Empty for empty metadata.
pub fn metadata_block(metadata: &Metadata, indent: usize) -> Vec<String> {
    if metadata.is_empty() {
        return Vec::new();
    }
    let pad = " ".repeat(indent);
    let mut block = vec![format!("{}{}", pad, DOC_HEADER)];
    block.extend(
        render_metadata(metadata)
            .into_iter()
            .map(|line| format!("{}    {}", pad, line)),
    );
    block
}

/// Sanitized description paragraph of the metadata.
pub fn description_lines(metadata: &Metadata) -> Vec<String> {
    metadata
        .text("description")
        .map(sanitize_paragraph)
        .unwrap_or_default()
}

/// Rebuild a doc block with the metadata block at its end.
///
/// Prose of an existing block is kept and any previous metadata block is
/// replaced. A test without a doc block gets one opening with the
/// description. Prose and metadata are separated by one blank line.
pub fn merge_doc_block(doc: &DocBlock, metadata: &Metadata) -> String {
    let pad = " ".repeat(doc.indent);

    let head: Vec<String> = if doc.existed() {
        existing_prose(&doc.lines)
    } else {
        std::iter::once(format!("{}\"\"\"\n", pad))
            .chain(
                description_lines(metadata)
                    .into_iter()
                    .map(|line| format!("{}{}\n", pad, line)),
            )
            .collect()
    };

    let mut merged = head.concat();
    let block = metadata_block(metadata, doc.indent);
    if !block.is_empty() {
        let bare_open = matches!(head.as_slice(), [only] if is_bare_doc_open(only.trim_end()));
        if !bare_open {
            merged.push('\n');
        }
        for line in block {
            merged.push_str(&line);
            merged.push('\n');
        }
    }
    merged.push_str(&pad);
    merged.push_str("\"\"\"\n");
    merged
}

/// Doc lines before a previous metadata block, trailing blanks removed.
fn existing_prose(lines: &[String]) -> Vec<String> {
    let end = lines
        .iter()
        .skip(1)
        .position(|line| line.trim() == DOC_HEADER)
        .map_or(lines.len(), |pos| pos + 1);

    let mut prose = lines[..end].to_vec();
    while prose.len() > 1 && prose.last().is_some_and(|l| l.trim().is_empty()) {
        prose.pop();
    }
    prose
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
