//! Test helpers for behavioral specifications.
//!
//! Provides high-level DSL for testing casesync CLI behavior.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the casesync binary
pub fn casesync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("casesync"));
    cmd.env_remove("CASESYNC_REPO")
        .env_remove("CASESYNC_CONFIG")
        .env_remove("CASESYNC_LOG");
    cmd
}

/// Create a sync builder for a project and its work-item repository
pub fn sync(project: &Project) -> SyncBuilder {
    SyncBuilder::new(project)
}

/// High-level sync builder for fluent test assertions
pub struct SyncBuilder {
    dir: PathBuf,
    repo: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

#[allow(dead_code)]
impl SyncBuilder {
    fn new(project: &Project) -> Self {
        Self {
            dir: project.path().to_path_buf(),
            repo: project.repo_path(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Point at a different work-item repository
    pub fn repo(mut self, path: impl AsRef<Path>) -> Self {
        self.repo = path.as_ref().to_path_buf();
        self
    }

    /// Add extra arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn passes(self) -> RunAssert {
        run_passes(self.command())
    }

    pub fn exits(self, code: i32) -> RunAssert {
        run_exits(self.command(), code)
    }

    fn command(self) -> Command {
        let mut cmd = casesync_cmd();
        cmd.arg("--repo-dir").arg(&self.repo);
        cmd.args(&self.args);
        cmd.current_dir(&self.dir);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

fn run_passes(mut cmd: Command) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert!(
        output.status.success(),
        "expected sync to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    RunAssert { output }
}

fn run_exits(mut cmd: Command, code: i32) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert_eq!(
        output.status.code(),
        Some(code),
        "expected exit code {}, got {:?}\nstdout: {}\nstderr: {}",
        code,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    RunAssert { output }
}

pub struct RunAssert {
    output: std::process::Output,
}

#[allow(dead_code)]
impl RunAssert {
    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }

    /// Assert stderr does not match predicate.
    pub fn stderr_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            !predicate.into_predicate().eval(&stderr),
            "stderr should NOT match predicate:\n{}",
            stderr
        );
        self
    }
}

// =============================================================================
// Project
// =============================================================================

/// Temporary project with a sibling work-item repository.
///
/// Reduces boilerplate by:
/// - Auto-creating parent directories
/// - Adding `version = 1` prefix to config
/// - Writing work items at their repository path
///
/// # Examples
///
/// ```ignore
/// let temp = Project::empty();
/// temp.testcase("RHCF3-1", &[("title", "test_foo")]);
/// temp.file("cfme/tests/test_a.py", "def test_foo():\n    pass\n");
/// sync(&temp).passes();
/// ```
pub struct Project {
    dir: tempfile::TempDir,
    repo: tempfile::TempDir,
}

#[allow(dead_code)]
impl Project {
    /// Create an empty project and an empty repository
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            repo: tempfile::tempdir().unwrap(),
        }
    }

    /// Get the project path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the work-item repository path
    pub fn repo_path(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Write casesync.toml (auto-prefixes with `version = 1` if not present)
    pub fn config(&self, content: &str) {
        let content = if content.contains("version") {
            content.to_string()
        } else {
            format!("version = 1\n{}", content)
        };
        std::fs::write(self.dir.path().join("casesync.toml"), content).unwrap();
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Read a project file
    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dir.path().join(path.as_ref())).unwrap()
    }

    /// Whether a project file exists
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.dir.path().join(path.as_ref()).exists()
    }

    /// Write a testcase work item, approved unless `status` is given.
    ///
    /// Ids with at most three digits live directly under `workitems/`.
    pub fn testcase(&self, id: &str, fields: &[(&str, &str)]) {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<work-item>\n");
        xml.push_str("    <field id=\"type\">testcase</field>\n");
        if !fields.iter().any(|(name, _)| *name == "status") {
            xml.push_str("    <field id=\"status\">approved</field>\n");
        }
        for (name, value) in fields {
            if *name == "linkedWorkItems" {
                xml.push_str(&format!(
                    "    <field id=\"linkedWorkItems\"><list><struct>\
                     <item id=\"role\">verifies</item><item id=\"workItem\">{value}</item>\
                     </struct></list></field>\n"
                ));
            } else {
                xml.push_str(&format!("    <field id=\"{name}\">{value}</field>\n"));
            }
        }
        xml.push_str("</work-item>\n");

        let dir = self.repo.path().join("tracker/workitems").join(id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("workitem.xml"), xml).unwrap();
    }
}
