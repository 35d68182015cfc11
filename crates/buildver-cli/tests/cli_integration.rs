//! CLI subprocess integration tests.
//!
//! These tests invoke the `buildver` binary as a subprocess and verify
//! exit codes, stdout content, and JSON output stability.

use std::path::Path;
use std::process::Command;

fn buildver_bin(project: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildver"));
    cmd.current_dir(project);
    cmd.env_remove("BUILDVER_LOG");
    cmd
}

fn write_project(dir: &Path, dockerfile: &str) {
    std::fs::write(
        dir.join("dependencies"),
        "BV_GO_VERSION=1.6.3\nBV_KUBE_VERSION=v1.5.2\n",
    )
    .unwrap();
    std::fs::write(dir.join("Dockerfile"), dockerfile).unwrap();
    std::fs::write(
        dir.join("buildver.toml"),
        r#"manifest = "dependencies"
version_key = "BV_GO_VERSION"

[descriptor]
path = "Dockerfile"
tag = "FROM golang:"
"#,
    )
    .unwrap();
}

const DOCKERFILE: &str = "FROM ubuntu:16.04\nFROM golang:1.7.4\nRUN apt-get update\n";

#[test]
fn cli_version_exits_zero() {
    let project = tempfile::tempdir().unwrap();
    let output = buildver_bin(project.path()).arg("--version").output().unwrap();
    assert!(output.status.success(), "buildver --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("buildver"), "got: {stdout}");
}

#[test]
fn cli_help_lists_commands() {
    let project = tempfile::tempdir().unwrap();
    let output = buildver_bin(project.path()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["resolve", "extract", "normalize", "verify", "run"] {
        assert!(stdout.contains(cmd), "help must list '{cmd}'");
    }
}

#[test]
fn cli_resolve_applies_environment_override() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), DOCKERFILE);

    let output = buildver_bin(project.path())
        .arg("resolve")
        .env("BV_KUBE_VERSION", "v1.6.0")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "resolve must exit 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BV_GO_VERSION=1.6.3"), "got: {stdout}");
    assert!(stdout.contains("BV_KUBE_VERSION=v1.6.0"), "got: {stdout}");
    assert!(stdout.contains("version token: 1.7.4"), "got: {stdout}");
}

#[test]
fn cli_resolve_json_is_stable() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), DOCKERFILE);

    let output = buildver_bin(project.path())
        .args(["--json", "resolve"])
        .env("BV_GO_VERSION", "1.8.0")
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version_token"], "1.7.4");
    let config = json["configuration"].as_array().unwrap();
    assert_eq!(config.len(), 2);
    assert_eq!(config[0]["key"], "BV_GO_VERSION");
    assert_eq!(config[0]["value"], "1.8.0");
    assert_eq!(config[0]["source"], "environment");
    assert_eq!(config[1]["source"], "manifest");
}

#[test]
fn cli_extract_prints_token() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(project.path().join("Dockerfile"), DOCKERFILE).unwrap();

    let output = buildver_bin(project.path())
        .args(["extract", "Dockerfile", "--tag", "FROM golang:"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.7.4");
}

#[test]
fn cli_extract_missing_declaration_exits_3() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(project.path().join("Dockerfile"), "FROM ubuntu:16.04\n").unwrap();

    let output = buildver_bin(project.path())
        .args(["extract", "Dockerfile", "--tag", "FROM golang:"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "got: {stderr}");
}

#[test]
fn cli_malformed_manifest_exits_2() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), DOCKERFILE);
    std::fs::write(project.path().join("dependencies"), "BV_GO_VERSION\n").unwrap();

    let output = buildver_bin(project.path())
        .arg("resolve")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 1"), "got: {stderr}");
}

#[test]
fn cli_missing_manifest_names_path() {
    let project = tempfile::tempdir().unwrap();

    let output = buildver_bin(project.path())
        .args(["resolve", "--manifest", "nowhere/deps"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nowhere"), "got: {stderr}");
}

#[test]
fn cli_normalize_lowercases_keys() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(project.path().join("deps"), "GO_VERSION=1.7\ngo_version=1.8\n").unwrap();

    let output = buildver_bin(project.path())
        .args(["normalize", "deps"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "go_version=1.8\n");
}

#[test]
fn cli_verify_detects_drift() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), DOCKERFILE);

    let write = buildver_bin(project.path())
        .args(["resolve", "--write-record"])
        .output()
        .unwrap();
    assert!(write.status.success());
    assert!(project.path().join("buildver.lock").exists());

    let ok = buildver_bin(project.path()).arg("verify").output().unwrap();
    assert!(ok.status.success());

    let drift = buildver_bin(project.path())
        .arg("verify")
        .env("BV_GO_VERSION", "9.9")
        .output()
        .unwrap();
    assert_eq!(drift.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&drift.stderr);
    assert!(stderr.contains("BV_GO_VERSION"), "got: {stderr}");
}

#[test]
fn cli_verify_without_record_exits_1() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), DOCKERFILE);

    let output = buildver_bin(project.path()).arg("verify").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("record file I/O error"), "got: {stderr}");
}

#[cfg(unix)]
#[test]
fn cli_run_exports_version_and_propagates_status() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), DOCKERFILE);

    let ok = buildver_bin(project.path())
        .args([
            "run",
            "--",
            "sh",
            "-c",
            r#"test "$BUILDVER_VERSION" = 1.7.4 && test "$BV_KUBE_VERSION" = v1.5.2"#,
        ])
        .output()
        .unwrap();
    assert!(
        ok.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&ok.stderr)
    );

    let failing = buildver_bin(project.path())
        .args(["run", "--", "sh", "-c", "exit 7"])
        .output()
        .unwrap();
    assert_eq!(failing.status.code(), Some(7));
}

#[cfg(unix)]
#[test]
fn cli_run_halts_before_command_when_token_missing() {
    let project = tempfile::tempdir().unwrap();
    write_project(project.path(), "FROM ubuntu:16.04\n");

    let output = buildver_bin(project.path())
        .args(["run", "--", "touch", "ran"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(!project.path().join("ran").exists());
}
