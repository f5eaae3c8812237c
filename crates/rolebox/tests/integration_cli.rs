//! CLI surface tests: help/version output and operator-facing errors.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("rolebox").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test infrastructure roles"))
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("provision"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("rolebox").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "rolebox {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_create_without_config_points_at_setup() {
    let project = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("rolebox").unwrap();
    cmd.arg("--workspace-folder")
        .arg(project.path())
        .arg("create")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing configuration key `name`"))
        .stderr(predicate::str::contains("rolebox setup"));
}

#[test]
fn test_unknown_workflow_step_fails() {
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join(".rolebox")).unwrap();
    fs::write(
        project.path().join(".rolebox/config.json"),
        r#"{
    "name": "tester/example:latest",
    "workflow": ["create", "deploy"]
}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("rolebox").unwrap();
    cmd.arg("--workspace-folder")
        .arg(project.path())
        .arg("test")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown workflow step `deploy`"));
}

#[test]
fn test_missing_engine_is_reported() {
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join(".rolebox")).unwrap();
    fs::write(
        project.path().join(".rolebox/config.json"),
        r#"{ "name": "tester/example:latest" }"#,
    )
    .unwrap();

    // An empty PATH leaves no engine binary to find.
    let empty_bin = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("rolebox").unwrap();
    cmd.env("PATH", empty_bin.path())
        .arg("--workspace-folder")
        .arg(project.path())
        .arg("provision")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not installed or not on PATH"));
}

#[test]
fn test_malformed_config_is_reported() {
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join(".rolebox")).unwrap();
    fs::write(project.path().join(".rolebox/config.json"), "not json {{{").unwrap();

    let mut cmd = Command::cargo_bin("rolebox").unwrap();
    cmd.arg("--workspace-folder")
        .arg(project.path())
        .arg("create")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}
