// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented test scanner.
//!
//! Tracks class and test scope, test signatures, and doc block boundaries
//! over a stream of source lines, one line at a time and without lookahead.
//! Nesting is inferred from leading spaces only.

pub mod patterns;
pub mod tier;

pub use patterns::{LineKind, classify, leading_spaces};
pub use tier::TierTracker;

/// Where the scanner is relative to the current test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Outside,
    /// `def test_...(` seen, closing `):` not yet.
    Signature,
    /// Signature closed, doc block not seen yet.
    AwaitingDoc,
    InDoc,
    AfterDoc,
}

/// Class and test the scanner is currently inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeContext {
    /// Current `Test*` class.
    pub class: Option<String>,
    /// `Class.method` or bare `function`.
    pub test: Option<String>,
    /// Indentation of the current test's `def` line.
    pub method_indent: usize,
}

/// Doc block of a test, complete as of the current line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Lines of an existing block up to the closing delimiter, each ending
    /// in a newline. For a single-line block, the line without its closing
    /// delimiter. Empty when the test had no doc block.
    pub lines: Vec<String>,
    /// Raw source text the block replaces.
    pub original: String,
    /// Column the block's lines start at.
    pub indent: usize,
}

impl DocBlock {
    pub fn existed(&self) -> bool {
        !self.original.is_empty()
    }
}

/// What one line means to the rewriter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEvent {
    /// Line belongs to a doc block and must not be copied through.
    pub in_doc: bool,
    /// Line opened a test with a different qualified name.
    pub test_changed: bool,
    /// Line opened a test no tier annotation covers.
    pub tier_missing: bool,
    /// A doc block ended on this line, or the test turned out to have none.
    pub doc_end: Option<DocBlock>,
    /// Raw lines of an unclosed doc block, to emit unchanged before this line.
    pub flushed: Option<String>,
}

#[derive(Debug, Default)]
pub struct LexicalScanner {
    phase: Phase,
    scope: ScopeContext,
    tiers: TierTracker,
    doc: DocBlock,
}

impl LexicalScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scope(&self) -> &ScopeContext {
        &self.scope
    }

    /// Qualified name of the current test.
    pub fn test_name(&self) -> Option<&str> {
        self.scope.test.as_deref()
    }

    pub fn tiers(&self) -> &TierTracker {
        &self.tiers
    }

    /// Advance over one raw line, newline included.
    pub fn process_line(&mut self, line: &str) -> LineEvent {
        let text = line.trim_end_matches(['\n', '\r']);
        let mut event = LineEvent::default();

        match self.phase {
            Phase::InDoc if self.leaves_test(text) => {
                event.flushed = self.finish();
            }
            Phase::InDoc => {
                self.doc_line(line, text, &mut event);
                return event;
            }
            Phase::AwaitingDoc => {
                if self.await_doc(line, text, &mut event) {
                    return event;
                }
            }
            Phase::Outside | Phase::Signature | Phase::AfterDoc => {}
        }

        let kind = classify(text);
        event.tier_missing = self.tiers.observe(&kind);

        match kind {
            LineKind::TestClass { name, .. } => {
                tracing::trace!("entering class {}", name);
                self.scope.class = Some(name);
                self.phase = Phase::Outside;
            }
            LineKind::OtherClass { indent } | LineKind::OtherDef { indent } => {
                if indent == 0 {
                    self.scope.class = None;
                }
                self.phase = Phase::Outside;
            }
            LineKind::TestDef { indent, name } => {
                let qualified = match (&self.scope.class, indent) {
                    (Some(class), 1..) => format!("{}.{}", class, name),
                    _ => name,
                };
                if indent == 0 {
                    self.scope.class = None;
                }
                event.test_changed = self.scope.test.as_deref() != Some(qualified.as_str());
                tracing::trace!("entering test {}", qualified);
                self.scope.test = Some(qualified);
                self.scope.method_indent = indent;
                self.phase = if patterns::closes_signature(text) {
                    Phase::AwaitingDoc
                } else {
                    Phase::Signature
                };
            }
            _ if self.phase == Phase::Signature && patterns::closes_signature(text) => {
                self.phase = Phase::AwaitingDoc;
            }
            _ => {}
        }

        event
    }

    /// A class or def at or left of the test's own indentation.
    fn leaves_test(&self, text: &str) -> bool {
        classify(text).opens_scope() && leading_spaces(text) <= self.scope.method_indent
    }

    /// Flush a doc block left open at end of input or cut short by the next
    /// definition. Returns the raw text that was held back.
    pub fn finish(&mut self) -> Option<String> {
        if self.phase != Phase::InDoc {
            return None;
        }
        tracing::debug!(
            "unterminated doc block in {}",
            self.test_name().unwrap_or("<unknown>")
        );
        self.phase = Phase::Outside;
        Some(std::mem::take(&mut self.doc).original)
    }

    /// Handle a line while waiting for the doc block. Returns true when the
    /// line is fully consumed.
    fn await_doc(&mut self, line: &str, text: &str, event: &mut LineEvent) -> bool {
        if text.trim().is_empty() || patterns::is_comment(text) {
            return true;
        }

        let indent = self.scope.method_indent;
        let kind = classify(text);
        if kind.opens_scope() && leading_spaces(text) <= indent {
            // A body-less test, e.g. `...` on the def line; nothing to attach to.
            self.phase = Phase::Outside;
            return false;
        }

        self.doc = DocBlock {
            indent: indent + 4,
            ..Default::default()
        };

        if !patterns::opens_doc(text) {
            self.phase = Phase::AfterDoc;
            event.doc_end = Some(std::mem::take(&mut self.doc));
            return false;
        }

        event.in_doc = true;
        self.doc.original.push_str(line);
        if let Some(single) = patterns::single_line_doc(text) {
            self.doc.lines.push(single);
            self.end_doc(event);
        } else {
            self.doc.lines.push(with_newline(line));
            self.phase = Phase::InDoc;
        }
        true
    }

    fn doc_line(&mut self, line: &str, text: &str, event: &mut LineEvent) {
        event.in_doc = true;
        self.doc.original.push_str(line);

        if patterns::closes_doc(text) {
            self.end_doc(event);
        } else if let Some(last) = patterns::doc_text_before_close(text) {
            self.doc.lines.push(last);
            self.end_doc(event);
        } else {
            self.doc.lines.push(with_newline(line));
        }
    }

    fn end_doc(&mut self, event: &mut LineEvent) {
        self.phase = Phase::AfterDoc;
        event.doc_end = Some(std::mem::take(&mut self.doc));
    }
}

fn with_newline(line: &str) -> String {
    let mut line = line.trim_end_matches(['\n', '\r']).to_string();
    line.push('\n');
    line
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
