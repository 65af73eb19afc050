// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tier annotation tracking.
//!
//! A tier may be declared for the module (`pytestmark`), a test class, or a
//! single test (decorator). The most specific declaration wins; a test is
//! missing a tier only when none of the three levels declares one.

use super::patterns::LineKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierTracker {
    module: Option<u8>,
    class: Option<u8>,
    method: Option<u8>,
    pending: Option<u8>,
}

impl TierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one classified line. Returns true when the line opens a test
    /// that no level assigns a tier to.
    pub fn observe(&mut self, kind: &LineKind) -> bool {
        match kind {
            LineKind::TierDecorator(tier) => self.pending = Some(*tier),
            LineKind::TierMark(tier) => self.module = Some(*tier),
            LineKind::TestClass { .. } => self.class = self.pending.take(),
            LineKind::OtherClass { indent } | LineKind::OtherDef { indent } => {
                self.pending = None;
                if *indent == 0 {
                    self.class = None;
                }
            }
            LineKind::TestDef { indent, .. } => {
                self.method = self.pending.take();
                if *indent == 0 {
                    self.class = None;
                }
                return self.declared().is_none();
            }
            LineKind::Comment | LineKind::Blank | LineKind::Other => {}
        }
        false
    }

    /// Tier in effect for the current test.
    pub fn declared(&self) -> Option<u8> {
        self.method.or(self.class).or(self.module)
    }

    /// Decorator value waiting for the next class or def.
    pub fn pending(&self) -> Option<u8> {
        self.pending
    }
}

#[cfg(test)]
#[path = "tier_tests.rs"]
mod tests;
