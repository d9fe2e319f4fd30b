//! Integration tests for log routing in the CLI binary.
//!
//! Logs must never mix into stdout, which carries command output.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn command(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_content-ai"));
    cmd.env("HOME", temp_dir.path().join("home"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env("XDG_DATA_HOME", temp_dir.path().join("data"))
        .env_remove("CONTENT_AI_LOG")
        .env_remove("CONTENT_AI_LOG_OUTPUT")
        .env_remove("CONTENT_AI_LOG_FORMAT")
        .arg("--project-dir")
        .arg(temp_dir.path());
    cmd
}

#[test]
fn test_log_file_output_keeps_stdout_clean() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = temp_dir.path().join("logs").join("content-ai.log");

    let output = command(&temp_dir)
        .arg("--log-level")
        .arg("info")
        .arg("--log-output")
        .arg("file")
        .arg("--log-file")
        .arg(&log_file)
        .arg("options")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "options should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Facebook"));
    assert!(!stdout.contains("content-ai starting"));

    let logged = fs::read_to_string(&log_file).unwrap();
    assert!(logged.contains("content-ai starting"));
    assert!(logged.contains("Command completed"));
}

#[test]
fn test_json_logs_go_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let output = command(&temp_dir)
        .arg("--log-level")
        .arg("info")
        .arg("--log-format")
        .arg("json")
        .arg("options")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(stdout["goal"].is_array());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().next().unwrap();
    let record: serde_json::Value = serde_json::from_str(first).unwrap();
    assert_eq!(record["level"], "INFO");
}

#[test]
fn test_quiet_failure_prints_only_user_message() {
    let temp_dir = TempDir::new().unwrap();
    let output = command(&temp_dir)
        .arg("--quiet")
        .arg("history")
        .arg("show")
        .arg("missing-id")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.trim(), "Error: No history entry with id missing-id.");
}
