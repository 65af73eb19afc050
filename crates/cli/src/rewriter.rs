// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-file rewriting.
//!
//! Streams a source file through the scanner, resolves metadata for each
//! test it enters, and splices tier decorators and doc blocks into the
//! output.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::fields::Metadata;
use crate::index::{IndexError, TestcaseIndex};
use crate::planner::{merge_doc_block, tier_annotation_line};
use crate::scanner::{LexicalScanner, leading_spaces};

/// Output of rewriting one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Output differs from the input.
    pub modified: bool,
    /// Decorators and doc blocks that changed.
    pub insertions: usize,
}

/// Rewrites test sources, remembering which manual testcases it matched.
#[derive(Debug, Default)]
pub struct FileRewriter {
    seen: BTreeSet<String>,
}

impl FileRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test names resolved to a manual testcase so far.
    pub fn seen(&self) -> &BTreeSet<String> {
        &self.seen
    }

    /// Rewrite one source read line by line.
    pub fn rewrite_reader<R: BufRead>(
        &mut self,
        mut reader: R,
        index: &TestcaseIndex,
    ) -> io::Result<Rewrite> {
        let mut pass = RewritePass::default();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            pass.line(&line, self, index);
        }
        Ok(pass.finish())
    }

    /// Rewrite an in-memory source.
    pub fn rewrite_str(&mut self, source: &str, index: &TestcaseIndex) -> Rewrite {
        let mut pass = RewritePass::default();
        for line in source.split_inclusive('\n') {
            pass.line(line, self, index);
        }
        pass.finish()
    }

    /// Rewrite a file on disk.
    ///
    /// An unreadable file is logged and skipped. The file is written only
    /// when its content changes and `write` is set.
    pub fn rewrite_file(
        &mut self,
        path: &Path,
        index: &TestcaseIndex,
        write: bool,
    ) -> Result<Option<Rewrite>> {
        let rewrite = match File::open(path)
            .and_then(|file| self.rewrite_reader(BufReader::new(file), index))
        {
            Ok(rewrite) => rewrite,
            Err(err) => {
                tracing::warn!("skipping {}: {}", path.display(), err);
                return Ok(None);
            }
        };

        if rewrite.modified && write {
            std::fs::write(path, &rewrite.content).map_err(|e| Error::io(path, e))?;
            tracing::info!(
                "updated {} ({} insertions)",
                path.display(),
                rewrite.insertions
            );
        }
        Ok(Some(rewrite))
    }

    /// Metadata for a test, preferring its automated variant.
    fn resolve(&mut self, name: &str, index: &TestcaseIndex) -> Option<Metadata> {
        let record = match index.get_by_name(name, Some(true)) {
            Ok(Some(record)) => record,
            Ok(None) => index.get_by_name(name, None).ok().flatten()?,
            Err(IndexError::UnknownTitle(_)) => {
                tracing::trace!("no testcase for {}", name);
                return None;
            }
        };

        let metadata = Metadata::from_record(&record);
        if metadata.is_manual() {
            tracing::debug!("{} matches manual testcase {}", name, record.id());
            self.seen.insert(name.to_string());
        }
        Some(metadata)
    }
}

/// State of one source being rewritten.
#[derive(Default)]
struct RewritePass {
    scanner: LexicalScanner,
    out: Rewrite,
    current: Option<Metadata>,
    /// Terminator of the source's first line; inserted text uses it too.
    ending: Option<&'static str>,
}

impl RewritePass {
    fn line(&mut self, line: &str, rewriter: &mut FileRewriter, index: &TestcaseIndex) {
        if self.ending.is_none() && line.ends_with('\n') {
            self.ending = Some(if line.ends_with("\r\n") { "\r\n" } else { "\n" });
        }
        let event = self.scanner.process_line(line);

        // Held lines of a doc block cut short by the next definition.
        if let Some(held) = &event.flushed {
            self.out.content.push_str(held);
        }

        // The doc block belongs to the test entered before this line.
        if let Some(doc) = &event.doc_end {
            let merged = match &self.current {
                Some(meta) => merge_doc_block(doc, meta),
                None => merge_doc_block(doc, &Metadata::required_defaults()),
            };
            let merged = self.with_ending(merged);
            if merged != doc.original {
                self.out.modified = true;
                self.out.insertions += 1;
            }
            self.out.content.push_str(&merged);
        }

        if event.test_changed {
            self.current = self
                .scanner
                .test_name()
                .and_then(|name| rewriter.resolve(name, index));
        }

        let tier_line = self
            .current
            .as_ref()
            .filter(|_| event.tier_missing)
            .and_then(|meta| tier_annotation_line(meta, leading_spaces(line)));
        if let Some(tier_line) = tier_line {
            let tier_line = self.with_ending(tier_line);
            self.out.content.push_str(&tier_line);
            self.out.modified = true;
            self.out.insertions += 1;
        }

        if !event.in_doc {
            self.out.content.push_str(line);
        }
    }

    fn finish(mut self) -> Rewrite {
        if let Some(held) = self.scanner.finish() {
            self.out.content.push_str(&held);
        }
        self.out
    }

    /// Generated text uses `\n`; match a CRLF source. Kept prose may
    /// already end in `\r\n`.
    fn with_ending(&self, text: String) -> String {
        match self.ending {
            Some("\r\n") => text.replace("\r\n", "\n").replace('\n', "\r\n"),
            _ => text,
        }
    }
}

#[cfg(test)]
#[path = "rewriter_tests.rs"]
mod tests;
