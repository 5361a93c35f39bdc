//! Command line behaviour of the `plumb` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn plumb() -> Command {
    Command::cargo_bin("plumb").unwrap()
}

#[test]
fn test_clean_file_exits_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("clean.rb");
    fs::write(&file, "def foo\n  true\nend\n").unwrap();

    plumb()
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Your files are in style."));
}

#[test]
fn test_error_problem_exits_one() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("messy.rb");
    fs::write(&file, "def foo\n    true\nend\n").unwrap();

    plumb()
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Line is indented to column 4, but should be at 2.",
        ));
}

#[test]
fn test_warnings_only_exit_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("warn.rb");
    fs::write(&file, "x = \"#{y}\"\n").unwrap();

    plumb()
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("unnecessary_string_interpolation"));
}

#[test]
fn test_json_format() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("messy.rb");
    fs::write(&file, "def foo\n    true\nend\n").unwrap();

    let output = plumb()
        .arg("--format")
        .arg("json")
        .arg(&file)
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let problems = value.as_object().unwrap().values().next().unwrap();
    assert_eq!(problems[0]["type"], "indentation");
    assert_eq!(problems[0]["detail"]["should_be_at"], 2);
}

#[test]
fn test_invalid_config_exits_two() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.yml");
    fs::write(&config, "indentation_spaces:\n  spaces: 0\n").unwrap();

    plumb()
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_unknown_config_key_exits_two() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.yml");
    fs::write(&config, "trailing_newlines:\n  count: 1\n").unwrap();

    plumb()
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .code(2);
}

#[test]
fn test_print_default_config() {
    plumb()
        .arg("--print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("argument_alignment"));
}
