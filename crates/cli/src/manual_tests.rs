// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use similar_asserts::assert_eq as assert_text_eq;
use crate::test_utils::{MemorySource, index_of, testcase};
use proptest::prelude::*;
use yare::parameterized;

fn generator() -> ManualStubGenerator {
    let mut requirements = BTreeMap::new();
    requirements.insert("sso".to_string(), vec!["RHCF3-100".to_string()]);
    ManualStubGenerator::new(&requirements, default_imports())
}

fn sso_index() -> TestcaseIndex {
    index_of(
        MemorySource::new()
            .with(
                "RHCF3-7",
                testcase(
                    "Verify Login (SSO)",
                    &[
                        ("caseautomation", "manualonly"),
                        ("caselevel", "integration"),
                        ("description", "Log in via SSO"),
                        ("linkedWorkItems", "RHCF3-100"),
                    ],
                ),
            )
            .with("RHCF3-8", testcase("test_automated", &[])),
    )
}

const SSO_STUB: &str = "@pytest.mark.manual
@test_requirements.sso
@pytest.mark.tier(2)
def test_verify_login_sso():
    \"\"\"
    Log in via SSO

    Polarion:
        assignee: None
        casecomponent: None
        initialEstimate: None
        title: Verify Login (SSO)
    \"\"\"
";

#[parameterized(
    example = { "Verify Login (SSO)", "test_verify_login_sso" },
    already_prefixed = { "test_login", "test_login" },
    bare_test = { "test", "test_test" },
    punctuation = { "  --Create: VM/Template--  ", "test_create_vm_template" },
    parametrized = { "test_login[admin]", "test_login_admin" },
    non_ascii = { "Überprüfung", "test_berpr_fung" },
    empty = { "", "test_rhcf3_7" },
    symbols_only = { "!!!", "test_rhcf3_7" },
)]
fn derives_stub_names(title: &str, expected: &str) {
    assert_eq!(stub_name(title, "RHCF3-7"), expected);
}

#[test]
fn long_names_are_truncated() {
    let name = stub_name(&"abcd ".repeat(30), "RHCF3-7");
    assert_eq!(name.len(), MAX_NAME_LEN - 1);
    assert!(name.starts_with("test_abcd_abcd"));
    assert!(!name.ends_with('_'));
}

proptest! {
    #[test]
    fn stub_names_are_identifiers(title in "\\PC{0,120}") {
        let name = stub_name(&title, "RHCF3-7");
        prop_assert!(name.len() <= MAX_NAME_LEN);
        prop_assert!(name.starts_with("test_"));
        prop_assert!(name.len() > "test_".len());
        prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!name.contains("__"));
    }
}

#[test]
fn header_lists_imports() {
    assert_text_eq!(
        generator().header(),
        "# -*- coding: utf-8 -*-
# pylint: skip-file
\"\"\"Manual tests\"\"\"

import pytest

from cfme import test_requirements
"
    );
}

#[test]
fn stub_carries_requirement_tier_and_description() {
    let index = sso_index();
    let record = index.record("RHCF3-7").unwrap();
    let stub = generator().stub("Verify Login (SSO)", "RHCF3-7", Metadata::from_record(record));
    assert_eq!(stub, SSO_STUB);
}

#[test]
fn unknown_requirement_drops_linked_items() {
    let index = index_of(MemorySource::new().with(
        "RHCF3-9",
        testcase(
            "Check audit",
            &[
                ("caseautomation", "manualonly"),
                ("linkedWorkItems", "RHCF3-555"),
            ],
        ),
    ));
    let record = index.record("RHCF3-9").unwrap();
    let stub = generator().stub("Check audit", "RHCF3-9", Metadata::from_record(record));

    assert!(!stub.contains("test_requirements"));
    assert!(!stub.contains("linkedWorkItems"));
    assert!(stub.starts_with("@pytest.mark.manual\ndef test_check_audit():\n"));
}

#[test]
fn generates_module_for_unseen_manual_tests() {
    let stubs = generator().generate(&sso_index(), &BTreeSet::new());

    assert_eq!(stubs.stubs, 1);
    assert_text_eq!(
        stubs.content,
        format!("{}\n\n{}", generator().header(), SSO_STUB)
    );
}

#[test]
fn seen_titles_are_skipped() {
    let mut seen = BTreeSet::new();
    seen.insert("Verify Login (SSO)".to_string());
    let stubs = generator().generate(&sso_index(), &seen);

    assert_eq!(stubs.stubs, 0);
    assert_eq!(stubs.content, generator().header());
}

#[test]
fn every_manual_variant_gets_a_stub() {
    let manual = |title: &str| testcase(title, &[("caseautomation", "manualonly")]);
    let index = index_of(
        MemorySource::new()
            .with("RHCF3-1", manual("Login[admin]"))
            .with("RHCF3-2", manual("Login[guest]"))
            .with("RHCF3-3", testcase("Login[user]", &[])),
    );
    let stubs = generator().generate(&index, &BTreeSet::new());

    assert_eq!(stubs.stubs, 2);
    assert!(stubs.content.contains("def test_login_admin():"));
    assert!(stubs.content.contains("def test_login_guest():"));
}
