//! End-to-end runs of the `fanout` binary

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::tempdir;

/// Run the binary with an isolated home directory and `stdin` piped in.
fn fanout(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fanout"))
        .args(args)
        .env("HOME", home)
        .env("FANOUT_LOG", "off")
        .env_remove("FANOUT_POLICY")
        .env_remove("FANOUT_CHUNK_SIZE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn fanout");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for fanout")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "fanout failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn run_prints_results_as_json() {
    let home = tempdir().unwrap();
    let output = fanout(
        home.path(),
        &["run", "--handler", "upper", "--policy", "chunkwise", "--chunk-size", "2"],
        r#"["a", "b", "c"]"#,
    );
    assert_eq!(stdout_json(&output), json!(["A", "B", "C"]));
}

#[test]
fn run_without_handler_prints_null() {
    let home = tempdir().unwrap();
    let output = fanout(home.path(), &["run"], "[1, 2]");
    assert_eq!(stdout_json(&output), Value::Null);
}

#[test]
fn failing_chunk_is_dropped_from_output() {
    let home = tempdir().unwrap();
    let output = fanout(
        home.path(),
        &["run", "--handler", "fail_on", "--arg", "3", "--chunk-size", "2"],
        "[1, 2, 3, 4, 5]",
    );
    assert_eq!(stdout_json(&output), json!([1, 2, 5]));
}

#[test]
fn config_file_supplies_defaults() {
    let home = tempdir().unwrap();
    let dir = home.path().join(".fanout");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.toml"),
        "[runner]\npolicy = \"concurrent\"\nchunk_size = 2\n",
    )
    .unwrap();

    // Concurrent isolates per element, so 4 survives.
    let output = fanout(
        home.path(),
        &["run", "--handler", "fail_on", "--arg", "3"],
        "[1, 2, 3, 4, 5]",
    );
    assert_eq!(stdout_json(&output), json!([1, 2, 4, 5]));
}

#[test]
fn unknown_handler_exits_with_error() {
    let home = tempdir().unwrap();
    let output = fanout(home.path(), &["run", "--handler", "nope"], "[1]");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn handlers_lists_builtins() {
    let home = tempdir().unwrap();
    let output = fanout(home.path(), &["handlers"], "");
    assert!(output.status.success());
    let names: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    assert!(names.contains(&"upper".to_string()));
    assert!(names.contains(&"fail_on".to_string()));
}
