// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Named line patterns.
//!
//! Every heuristic the scanner applies to a source line lives here. Lines
//! are matched without their trailing newline.

use std::sync::LazyLock;

use regex::Regex;

/// `class Name(` or `class Name:`.
#[allow(clippy::expect_used)]
static CLASS_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)class\s+([A-Za-z_]\w*)\s*[(:]").expect("valid regex")
});

/// `def test_name(`, optionally `async`.
#[allow(clippy::expect_used)]
static TEST_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(?:async\s+)?def\s+(test_\w*)\s*\(").expect("valid regex")
});

/// Any other function definition.
#[allow(clippy::expect_used)]
static ANY_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:async\s+)?def\s").expect("valid regex"));

/// Closing `):` of a signature, with optional return annotation and comment.
#[allow(clippy::expect_used)]
static SIGNATURE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\)\s*(?:->\s*[^:]+)?:\s*(?:#.*)?$").expect("valid regex")
});

/// Opening delimiter of a doc block.
#[allow(clippy::expect_used)]
static DOC_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*[rRuUbB]?""""#).expect("valid regex"));

/// Opening and closing delimiter on one line, with an optional trailing
/// comment. Captures everything before the closing delimiter.
#[allow(clippy::expect_used)]
static DOC_ONE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*[rRuUbB]?""".*)"""\s*(?:#.*)?$"#).expect("valid regex")
});

/// Text followed by the closing delimiter, with an optional trailing
/// comment. Captures the text.
#[allow(clippy::expect_used)]
static DOC_TEXT_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*\S.*)"""\s*(?:#.*)?$"#).expect("valid regex")
});

/// Closing delimiter alone on its line.
#[allow(clippy::expect_used)]
static DOC_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"""\s*(?:#.*)?$"#).expect("valid regex"));

/// Opening delimiter alone on its line.
#[allow(clippy::expect_used)]
static DOC_BARE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*[rRuUbB]?"""\s*$"#).expect("valid regex"));

/// `@pytest.mark.tier(N)` decorating the next class or def.
#[allow(clippy::expect_used)]
static TIER_DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@pytest\.mark\.tier\(([1-3])\)").expect("valid regex")
});

/// `pytest.mark.tier(N)` anywhere else, e.g. in `pytestmark`.
#[allow(clippy::expect_used)]
static TIER_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pytest\.mark\.tier\(([1-3])\)").expect("valid regex"));

#[allow(clippy::expect_used)]
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#").expect("valid regex"));

/// Structural meaning of a line outside doc blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `class Test...`
    TestClass { indent: usize, name: String },
    /// Any other class.
    OtherClass { indent: usize },
    /// `def test_...`
    TestDef { indent: usize, name: String },
    /// Any other function.
    OtherDef { indent: usize },
    TierDecorator(u8),
    TierMark(u8),
    Comment,
    Blank,
    Other,
}

impl LineKind {
    /// True for class and def lines.
    pub fn opens_scope(&self) -> bool {
        matches!(
            self,
            LineKind::TestClass { .. }
                | LineKind::OtherClass { .. }
                | LineKind::TestDef { .. }
                | LineKind::OtherDef { .. }
        )
    }
}

/// Classify a line with its newline removed.
pub fn classify(text: &str) -> LineKind {
    if text.trim().is_empty() {
        return LineKind::Blank;
    }
    if COMMENT.is_match(text) {
        return LineKind::Comment;
    }
    if let Some(tier) = capture_tier(&TIER_DECORATOR, text) {
        return LineKind::TierDecorator(tier);
    }
    if let Some(caps) = CLASS_DEF.captures(text) {
        let indent = caps[1].len();
        let name = &caps[2];
        return if name.starts_with("Test") {
            LineKind::TestClass {
                indent,
                name: name.to_string(),
            }
        } else {
            LineKind::OtherClass { indent }
        };
    }
    if let Some(caps) = TEST_DEF.captures(text) {
        return LineKind::TestDef {
            indent: caps[1].len(),
            name: caps[2].to_string(),
        };
    }
    if ANY_DEF.is_match(text) {
        return LineKind::OtherDef {
            indent: leading_spaces(text),
        };
    }
    if let Some(tier) = capture_tier(&TIER_MARK, text) {
        return LineKind::TierMark(tier);
    }
    LineKind::Other
}

fn capture_tier(re: &Regex, text: &str) -> Option<u8> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Number of leading space characters.
pub fn leading_spaces(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

pub fn closes_signature(text: &str) -> bool {
    SIGNATURE_END.is_match(text)
}

pub fn is_comment(text: &str) -> bool {
    COMMENT.is_match(text)
}

pub fn opens_doc(text: &str) -> bool {
    DOC_START.is_match(text)
}

/// Text of a doc block that opens and closes on this line, up to the
/// closing delimiter and with a newline.
pub fn single_line_doc(text: &str) -> Option<String> {
    captured_line(&DOC_ONE_LINE, text)
}

/// Text before the closing delimiter of a block ending on this line.
pub fn doc_text_before_close(text: &str) -> Option<String> {
    captured_line(&DOC_TEXT_END, text)
}

fn captured_line(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    let mut line = caps[1].trim_end().to_string();
    line.push('\n');
    Some(line)
}

pub fn closes_doc(text: &str) -> bool {
    DOC_END.is_match(text)
}

pub fn is_bare_doc_open(text: &str) -> bool {
    DOC_BARE_OPEN.is_match(text)
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
