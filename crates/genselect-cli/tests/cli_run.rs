//! End-to-end tests for the `genselect` binary.

use std::path::Path;
use std::process::{Command, Output};

fn genselect(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_genselect"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run genselect")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn write_plan(dir: &Path, content: &str) -> String {
    let path = dir.join("select.toml");
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn run_scaffold_prints_labeled_values() {
    let output = genselect(&["run"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            "gen2\t5", "gen1\t1", "gen2\t7", "gen1\t3", "gen2\t9", "gen1\t5", "gen1\t7", "gen1\t9",
        ]
    );
}

#[test]
fn run_plain_json_with_limit() {
    let output = genselect(&["run", "--plain", "--format", "json", "--limit", "3"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["5", "1", "7"]);
}

#[test]
fn run_labeled_json_lines() {
    let output = genselect(&["run", "--format", "json", "--limit", "1"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(first["label"], "gen2");
    assert_eq!(first["value"], 5);
}

#[test]
fn run_plan_file_concatenates_without_pause() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"
[stop]
op = "never"

[[sources]]
label = "a"
values = [1, 2]

[[sources]]
label = "b"
range = { start = 10, end = 13 }
"#,
    );

    let output = genselect(&["run", "--plan", plan.as_str()]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["a\t1", "a\t2", "b\t10", "b\t11", "b\t12"]
    );
}

#[test]
fn run_rejects_invalid_plan() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"
[stop]
op = "gt"
value = 3

[[sources]]
label = "dup"
values = [1]

[[sources]]
label = "dup"
values = [2]
"#,
    );

    let output = genselect(&["run", "--plan", plan.as_str()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate source label"));
}

#[test]
fn run_rejects_unknown_format() {
    let output = genselect(&["run", "--format", "yaml"]);
    assert!(!output.status.success());
}

#[test]
fn init_writes_scaffold_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_string_lossy().into_owned();

    let output = genselect(&["init", "--path", path.as_str()]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.path().join("select.toml")).unwrap();
    assert!(written.contains("gen1"));

    // The scaffold is itself a valid plan.
    let plan = dir.path().join("select.toml").to_string_lossy().into_owned();
    let output = genselect(&["run", "--plan", plan.as_str(), "--limit", "2"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["gen2\t5", "gen1\t1"]);

    // A second init refuses to overwrite.
    let output = genselect(&["init", "--path", path.as_str()]);
    assert!(!output.status.success());
}
