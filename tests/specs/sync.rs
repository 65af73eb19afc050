//! Behavioral specs for a synchronization run.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::prelude::*;

const TEST_MODULE: &str = "import pytest


@pytest.mark.smoke
def test_foo():
    pass


def test_unknown():
    pass
";

const SYNCED_MODULE: &str = "import pytest


@pytest.mark.smoke
@pytest.mark.tier(2)
def test_foo():
    \"\"\"
    Check X

    Polarion:
        assignee: None
        casecomponent: None
        initialEstimate: None
    \"\"\"
    pass


def test_unknown():
    \"\"\"
    Polarion:
        assignee: None
        casecomponent: None
        initialEstimate: None
    \"\"\"
    pass
";

fn project() -> Project {
    let temp = Project::empty();
    temp.testcase(
        "RHCF3-1",
        &[
            ("title", "test_foo"),
            ("caseautomation", "automated"),
            ("caselevel", "integration"),
            ("description", "Check X"),
        ],
    );
    temp.testcase(
        "RHCF3-2",
        &[
            ("title", "Check the dashboard"),
            ("caseautomation", "manualonly"),
            ("casecomponent", "web_ui"),
        ],
    );
    temp.file("cfme/tests/test_a.py", TEST_MODULE);
    temp
}

/// > Matching tests receive a tier marker and a metadata doc block;
/// > unmatched tests get the default block
#[test]
fn rewrites_matching_tests() {
    let temp = project();
    sync(&temp).passes();

    similar_asserts::assert_eq!(temp.read("cfme/tests/test_a.py"), SYNCED_MODULE);
}

/// > A second run leaves every file unchanged
#[test]
fn second_run_is_idempotent() {
    let temp = project();
    sync(&temp).passes();
    let manual = temp.read("cfme/tests/test_manual.py");

    sync(&temp).passes().stderr_lacks("updated");

    similar_asserts::assert_eq!(temp.read("cfme/tests/test_a.py"), SYNCED_MODULE);
    similar_asserts::assert_eq!(temp.read("cfme/tests/test_manual.py"), manual);
}

/// > Manual testcases no source test claims become stubs
#[test]
fn generates_manual_stubs() {
    let temp = project();
    sync(&temp).passes();

    let manual = temp.read("cfme/tests/test_manual.py");
    assert!(manual.starts_with("# -*- coding: utf-8 -*-\n# pylint: skip-file\n"));
    assert!(manual.contains("@pytest.mark.manual\n"));
    assert!(manual.contains("def test_check_the_dashboard():\n"));
    assert!(manual.contains("casecomponent: WebUI"));
    assert!(!manual.contains("def test_foo"));
}

/// > --dry-run writes and deletes nothing
#[test]
fn dry_run_changes_nothing() {
    let temp = project();
    temp.file("cfme/tests/test_manual.py", "# stale\n");

    sync(&temp)
        .args(&["--dry-run"])
        .passes()
        .stderr_has("would update");

    assert_eq!(temp.read("cfme/tests/test_a.py"), TEST_MODULE);
    assert_eq!(temp.read("cfme/tests/test_manual.py"), "# stale\n");
}

/// > --root selects the project directory
#[test]
fn root_flag_selects_project() {
    let temp = project();
    let elsewhere = tempfile::tempdir().unwrap();

    casesync_cmd()
        .arg("--repo-dir")
        .arg(temp.repo_path())
        .arg("--root")
        .arg(temp.path())
        .current_dir(elsewhere.path())
        .assert()
        .success();

    similar_asserts::assert_eq!(temp.read("cfme/tests/test_a.py"), SYNCED_MODULE);
}

/// > Retired testcases are ignored
#[test]
fn inactive_testcases_are_skipped() {
    let temp = Project::empty();
    temp.testcase(
        "RHCF3-1",
        &[("title", "test_foo"), ("caseautomation", "automated")],
    );
    temp.testcase(
        "RHCF3-3",
        &[
            ("title", "Old manual check"),
            ("caseautomation", "manualonly"),
            ("status", "inactive"),
        ],
    );
    sync(&temp).passes();

    assert!(!temp.read("cfme/tests/test_manual.py").contains("old_manual_check"));
}
