//! Behavioral specs for casesync.toml handling.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::prelude::*;

fn project() -> Project {
    let temp = Project::empty();
    temp.testcase(
        "RHCF3-1",
        &[
            ("title", "test_foo"),
            ("caseautomation", "automated"),
            ("caselevel", "system"),
        ],
    );
    temp.testcase(
        "RHCF3-2",
        &[
            ("title", "Verify login"),
            ("caseautomation", "manualonly"),
            ("linkedWorkItems", "RHCF3-900"),
        ],
    );
    temp
}

/// > Unknown keys are warnings (forward compatibility)
#[test]
fn unknown_config_key_warns() {
    let temp = project();
    temp.config("unknown_key = true\n");

    sync(&temp)
        .passes()
        .stderr_has("unrecognized field `unknown_key`");
}

/// > Unsupported versions are config errors
#[test]
fn unsupported_version_exits_two() {
    let temp = project();
    temp.config("version = 2\n");

    sync(&temp)
        .exits(2)
        .stderr_has("unsupported config version 2");
}

/// > Malformed TOML is a config error
#[test]
fn malformed_config_exits_two() {
    let temp = project();
    temp.config("[project\n");

    sync(&temp).exits(2);
}

/// > An explicit config path must exist
#[test]
fn missing_explicit_config_exits_two() {
    let temp = project();

    sync(&temp)
        .args(&["-C", "missing.toml"])
        .exits(2)
        .stderr_has("config file not found");
}

/// > CASESYNC_CONFIG sets config file location
#[test]
fn env_config_sets_path() {
    let temp = project();
    temp.file("ci.toml", "version = 1\n[manual]\nfile = \"generated/manual.py\"\n");

    sync(&temp).env("CASESYNC_CONFIG", "ci.toml").passes();
    assert!(temp.exists("generated/manual.py"));
    assert!(!temp.exists("cfme/tests/test_manual.py"));
}

/// > Project paths and requirement names come from config
#[test]
fn config_selects_paths_and_requirements() {
    let temp = project();
    temp.config(
        r#"
[project]
tests = "suite"

[manual]
file = "suite/test_manual.py"
imports = ["import pytest", "from cfme import test_requirements"]

[requirements]
login = ["RHCF3-900"]
"#,
    );
    temp.file("suite/test_b.py", "def test_foo():\n    pass\n");

    sync(&temp).passes();

    assert!(temp.read("suite/test_b.py").starts_with("@pytest.mark.tier(3)\n"));
    let manual = temp.read("suite/test_manual.py");
    assert!(manual.contains("@test_requirements.login\n"));
    assert!(manual.contains("def test_verify_login():\n"));
}
