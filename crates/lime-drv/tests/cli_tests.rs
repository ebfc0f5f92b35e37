//! End-to-end tests driving the compiled `lime` binary, matching the
//! teacher workspace's `assert_cmd`/`predicates`/`tempfile` integration
//! test style.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn lime_bin() -> Command {
    Command::new(PathBuf::from(env!("CARGO_BIN_EXE_lime")))
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    lime_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("usage"));
}

#[test]
fn missing_input_exits_nonzero() {
    lime_bin().assert().failure().stderr(predicate::str::contains("no input file"));
}

#[test]
fn unknown_flag_exits_nonzero() {
    lime_bin()
        .arg("--does-not-exist")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown flag"));
}

#[test]
fn compiles_hello_world_to_ir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("hello.ll");

    lime_bin()
        .arg(fixtures_dir().join("hello.lime"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let ir = std::fs::read_to_string(&output).unwrap();
    assert!(ir.contains("define i32 @main"));
    assert!(ir.contains("declare i32 @printf"));
}

#[test]
fn compiles_recursive_factorial_to_ir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("factorial.ll");

    lime_bin()
        .arg(fixtures_dir().join("factorial.lime"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let ir = std::fs::read_to_string(&output).unwrap();
    assert!(ir.contains("define i32 @fact"));
    assert!(ir.contains("call i32 @fact"));
}

#[test]
fn parse_errors_exit_nonzero_and_report_to_stderr() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("broken_let.ll");

    lime_bin()
        .arg(fixtures_dir().join("broken_let.lime"))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));

    assert!(!output.exists());
}

#[test]
fn verbose_flag_emits_a_trace_to_stderr() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("hello.ll");

    lime_bin()
        .arg(fixtures_dir().join("hello.lime"))
        .arg("-o")
        .arg(&output)
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("[lime]"));
}

#[test]
fn emit_obj_is_reported_as_not_implemented() {
    lime_bin()
        .arg(fixtures_dir().join("hello.lime"))
        .arg("--emit=obj")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not implemented"));
}
