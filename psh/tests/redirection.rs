use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn run_psh(dir: &Path, command: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_psh"))
        .current_dir(dir)
        .args(["-c", command])
        .output()
        .expect("failed to execute psh")
}

#[test]
fn output_redirect_creates_file() {
    let dir = tempdir().unwrap();
    let output = run_psh(dir.path(), "echo hi > out.txt");

    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hi\n");
    assert!(output.stdout.is_empty());
}

#[test]
fn output_redirect_truncates_existing_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("out.txt"), "a much longer previous content\n").unwrap();

    let output = run_psh(dir.path(), "echo short > out.txt");
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "short\n"
    );
}

#[test]
fn input_redirect_feeds_command() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "hello").unwrap();

    let output = run_psh(dir.path(), "cat < in.txt");
    assert!(output.status.success(), "command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello");
}

#[test]
fn input_redirect_missing_file_returns_error() {
    let dir = tempdir().unwrap();
    let output = run_psh(dir.path(), "cat < missing.txt");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cannot open missing.txt for input"),
        "stderr did not report missing file: {stderr}"
    );
}

#[test]
fn output_redirect_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let output = run_psh(dir.path(), "echo hi > no/such/dir/out.txt");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cannot open no/such/dir/out.txt for output"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn missing_file_name_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let output = run_psh(dir.path(), "echo hi >");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("psh: missing file name after \">\""),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn unknown_program_exits_with_one() {
    let dir = tempdir().unwrap();
    let output = run_psh(dir.path(), "psh-no-such-program --flag");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no such file or directory"), "{stderr}");
}
