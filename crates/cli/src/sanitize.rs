// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Human-text cleanup for work-item fields.
//!
//! Work-item text arrives as HTML fragments. These helpers strip markup and
//! entities and wrap the result for embedding in a doc block.

use std::sync::LazyLock;

use regex::Regex;
use textwrap::{Options, WrapAlgorithm};

/// Width used for wrapped paragraphs.
pub const PARAGRAPH_WIDTH: usize = 70;

#[allow(clippy::expect_used)]
static CDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!\[CDATA\[(.+)\]\]>").expect("valid regex"));

#[allow(clippy::expect_used)]
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br ?/?>").expect("valid regex"));

#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

#[allow(clippy::expect_used)]
static SPACE_BEFORE_NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\n").expect("valid regex"));

#[allow(clippy::expect_used)]
static NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));

/// Entities replaced after tags are stripped. `&amp;` comes late so an
/// escaped entity is not decoded twice.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&npsp;", " "),
    ("&gt;", ">"),
    ("&lt;", "<"),
    ("&quot;", "\""),
    ("&amp;", "&"),
    ("&#39;", "'"),
    ("&#10;", "\n"),
    ("\u{a0}", " "),
];

/// Strip markup and entities from a field value.
///
/// A CDATA wrapper is unwrapped, `<br>` becomes a newline, other tags are
/// dropped, and runs of newlines collapse to one.
pub fn sanitize_string(text: &str) -> String {
    let text = match CDATA_RE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => text,
    };
    let text = BREAK_RE.replace_all(text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = SPACE_BEFORE_NEWLINE_RE.replace_all(&text, "\n");

    let mut text = text.into_owned();
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    NEWLINES_RE.replace_all(&text, "\n").into_owned()
}

/// Sanitize and wrap a paragraph into lines.
///
/// Each source line is trimmed and wrapped separately; blank lines vanish.
/// Returns an empty list when nothing is left.
pub fn sanitize_paragraph(text: &str) -> Vec<String> {
    sanitize_string(text)
        .split('\n')
        .flat_map(|line| wrap(line.trim(), PARAGRAPH_WIDTH))
        .collect()
}

/// Word-wrap `text` into lines at most `width` columns wide.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let options = Options::new(width).wrap_algorithm(WrapAlgorithm::FirstFit);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Columns `text` occupies on screen.
pub fn display_width(text: &str) -> usize {
    textwrap::core::display_width(text)
}

/// Join embedded lines with single spaces.
pub fn collapse_lines(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
