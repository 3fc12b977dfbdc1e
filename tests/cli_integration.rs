//! Integration tests for the command-line interface.
//!
//! These tests run the real binary against temporary directories, with the
//! config search path pinned so a developer's own config cannot leak in.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture: a scratch working directory plus an isolated config file.
struct TestDir {
    dir: TempDir,
    config: PathBuf,
}

impl TestDir {
    /// Create a scratch directory with an empty config.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let config = dir.path().join("heapdot.toml");
        fs::write(&config, "").expect("failed to write config");
        Self { dir, config }
    }

    /// Get the scratch directory path.
    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Replace the isolated config's contents.
    fn set_config(&self, contents: &str) {
        fs::write(&self.config, contents).expect("failed to write config");
    }

    /// A command running in the scratch directory with config pinned.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("heapdot").expect("binary should build");
        cmd.current_dir(self.path());
        cmd.env("HEAPDOT_CONFIG", &self.config);
        cmd.env_remove("HEAPDOT_VIEWER");
        cmd
    }
}

// =============================================================================
// render
// =============================================================================

#[test]
fn stdout_render_emits_dot_text() {
    let t = TestDir::new();
    t.cmd()
        .args(["render", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph g {"))
        .stdout(predicate::str::contains("\"tm_data\" ["))
        .stdout(predicate::str::contains("tm_type@1"))
        .stdout(predicate::str::ends_with("}\n"));
}

#[test]
fn stdout_render_is_deterministic() {
    let t = TestDir::new();
    let run = || {
        t.cmd()
            .args(["render", "--stdout"])
            .output()
            .expect("command runs")
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn default_output_names_auto_increment() {
    let t = TestDir::new();

    t.cmd()
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains("dot1.dot"));
    t.cmd().arg("render").assert().success();

    assert!(t.path().join("dot1.dot").exists());
    assert!(t.path().join("dot2.dot").exists());
    assert!(!t.path().join("dot3.dot").exists());
}

#[test]
fn explicit_output_respects_quiet() {
    let t = TestDir::new();
    t.cmd()
        .args(["render", "--quiet", "--output", "heap.dot"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(t.path().join("heap.dot")).expect("output written");
    assert!(written.starts_with("digraph g {"));
    assert!(written.ends_with("}\n"));
}

#[test]
fn json_summary_reports_the_written_file() {
    let t = TestDir::new();
    let output = t
        .cmd()
        .args(["render", "--json", "--output", "heap.dot"])
        .output()
        .expect("command runs");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary is valid JSON");
    assert_eq!(summary["file"], "heap.dot");
    assert_eq!(summary["nodes"], 16);
    assert!(summary["bytes"].as_u64().unwrap() > 0);
}

#[test]
fn scene_parameters_grow_the_population() {
    let t = TestDir::new();
    t.cmd()
        .args(["render", "--stdout", "--types", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tm_type@2"));
}

#[test]
fn objects_without_blocks_fail_cleanly() {
    let t = TestDir::new();
    t.cmd()
        .args(["render", "--blocks", "0", "--objects", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn stdout_conflicts_with_view() {
    let t = TestDir::new();
    t.cmd()
        .args(["render", "--stdout", "--view"])
        .assert()
        .failure();
}

#[test]
fn view_launches_the_configured_viewer() {
    let t = TestDir::new();
    t.cmd()
        .args(["render", "--output", "heap.dot", "--view"])
        .env("HEAPDOT_VIEWER", "true")
        .assert()
        .success();
}

#[test]
fn configured_output_dir_is_used() {
    let t = TestDir::new();
    let out_dir = t.path().join("diagrams");
    fs::create_dir(&out_dir).expect("create output dir");
    t.set_config(&format!("output_dir = \"{}\"\n", out_dir.display()));

    t.cmd().arg("render").assert().success();
    assert!(out_dir.join("dot1.dot").exists());
    assert!(!t.path().join("dot1.dot").exists());
}

#[test]
fn broken_config_is_reported() {
    let t = TestDir::new();
    t.set_config("viewer = 3\n");
    t.cmd()
        .arg("render")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

// =============================================================================
// completion
// =============================================================================

#[test]
fn completion_emits_a_script() {
    let t = TestDir::new();
    t.cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heapdot"));
}
