// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Testcase field table and filtered metadata.
//!
//! Only fields listed in [`FIELDS`] ever reach a rendered doc block. A field
//! is kept when its value differs from the documented default; required
//! fields are always kept, as `None` when the record leaves them empty.

use std::collections::BTreeMap;

use crate::record::{FieldValue, Record};

/// One entry of the field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Documented default; `None` for fields without one.
    pub default: Option<&'static str>,
    /// Always rendered, as `None` when empty.
    pub required: bool,
    /// Value comes from a controlled vocabulary and is not sanitized.
    pub controlled: bool,
}

const fn spec(
    name: &'static str,
    default: Option<&'static str>,
    required: bool,
    controlled: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        default,
        required,
        controlled,
    }
}

/// Every field that may appear in filtered metadata.
pub const FIELDS: &[FieldSpec] = &[
    spec("assignee", Some(""), true, false),
    spec("casecomponent", Some("-"), true, true),
    spec("caseimportance", Some("high"), false, true),
    spec("caselevel", Some(DEFAULT_CASELEVEL), false, true),
    spec("caseposneg", Some("positive"), false, true),
    spec("caseautomation", Some("automated"), false, true),
    spec("testtype", Some("functional"), false, true),
    spec("subtype1", Some("-"), false, true),
    spec("subtype2", Some("-"), false, true),
    spec("upstream", Some("-"), false, true),
    spec("initialEstimate", None, true, false),
    spec("tags", Some(""), false, false),
    spec("setup", Some(""), false, false),
    spec("teardown", Some(""), false, false),
    spec("description", Some(""), false, false),
    spec("linkedWorkItems", Some(""), false, false),
    spec("testSteps", Some(""), false, false),
    spec("expectedResults", Some(""), false, false),
    spec("title", None, false, false),
    spec("work_item_id", None, false, false),
];

/// Fields never rendered as `key: value` lines.
pub const RENDER_OMITTED: &[&str] = &[
    "caseautomation",
    "caselevel",
    "description",
    "testSteps",
    "expectedResults",
    "work_item_id",
];

/// Fields rendered only for manual testcases.
pub const MANUAL_ONLY_FIELDS: &[&str] = &["setup", "teardown"];

/// Case level that needs no tier annotation.
pub const DEFAULT_CASELEVEL: &str = "component";

/// Case level to tier number.
const CASELEVELS: &[(&str, u8)] = &[
    ("component", 1),
    ("integration", 2),
    ("system", 3),
    ("acceptance", 3),
];

/// Component id to display name.
const CASECOMPONENTS: &[(&str, &str)] = &[
    ("ansible", "Ansible"),
    ("appl", "Appliance"),
    ("auth", "Auth"),
    ("automate", "Automate"),
    ("candu", "CandU"),
    ("chargeback", "Chargeback"),
    ("cloud", "Cloud"),
    ("config", "Configuration"),
    ("containers", "Containers"),
    ("control", "Control"),
    ("events", "Events"),
    ("infra", "Infra"),
    ("optimize", "Optimize"),
    ("prov", "Provisioning"),
    ("replication", "Replication"),
    ("reporting", "Reporting"),
    ("rest", "Rest"),
    ("services", "Services"),
    ("smartst", "SmartState"),
    ("ssui", "SelfServiceUI"),
    ("stack", "Stack"),
    ("web_ui", "WebUI"),
];

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

pub fn is_required(name: &str) -> bool {
    field(name).is_some_and(|f| f.required)
}

pub fn is_controlled(name: &str) -> bool {
    field(name).is_some_and(|f| f.controlled)
}

/// Tier number for a case level, `None` for unknown levels.
pub fn caselevel_tier(level: &str) -> Option<u8> {
    CASELEVELS
        .iter()
        .find(|(name, _)| *name == level)
        .map(|(_, tier)| *tier)
}

/// Display name for a component id; unknown ids pass through.
pub fn casecomponent_name(id: &str) -> &str {
    CASECOMPONENTS
        .iter()
        .find(|(key, _)| *key == id)
        .map_or(id, |(_, name)| *name)
}

/// Record fields reduced to what a doc block shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: BTreeMap<String, FieldValue>,
}

impl Metadata {
    /// Filter a record down to required and non-default fields.
    pub fn from_record(record: &Record) -> Self {
        let mut fields = BTreeMap::new();
        for spec in FIELDS {
            let value = record.get(spec.name).filter(|v| !v.is_empty());
            let value = match value {
                Some(value) => value.clone(),
                None if spec.required => FieldValue::Null,
                None => continue,
            };
            if !matches_default(&value, spec.default) {
                fields.insert(spec.name.to_string(), value);
            }
        }
        Self { fields }
    }

    /// Metadata used when no record matches: every required field unset.
    pub fn required_defaults() -> Self {
        let fields = FIELDS
            .iter()
            .filter(|f| f.required)
            .map(|f| (f.name.to_string(), FieldValue::Null))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Non-empty scalar text of a field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// A kept `caseautomation` always differs from `automated`.
    pub fn is_manual(&self) -> bool {
        self.contains("caseautomation")
    }
}

fn matches_default(value: &FieldValue, default: Option<&str>) -> bool {
    match (value, default) {
        (FieldValue::Text(text), Some(default)) => text == default,
        _ => false,
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
