//! Integration tests for the `metalctl` binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live Metal API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `metalctl` binary with env isolation.
///
/// Clears all `METAL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration
/// or stored token.
fn metalctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("metalctl");
    cmd.env("HOME", "/tmp/metalctl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/metalctl-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/metalctl-test-nonexistent")
        .env_remove("METAL_BASE_URL")
        .env_remove("METAL_OUTPUT")
        .env_remove("METAL_TIMEOUT")
        .env_remove("METAL_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = metalctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    metalctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Metal")
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("feedback"))
            .and(predicate::str::contains("broadcast"))
            .and(predicate::str::contains("prompts")),
    );
}

#[test]
fn test_version_flag() {
    metalctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("metalctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    metalctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    metalctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = metalctl_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_unreachable_api_exits_with_connection_code() {
    // Port 1 refuses immediately; no network traffic leaves the host.
    let output = metalctl_cmd()
        .args(["--base-url", "http://127.0.0.1:1/api/v1", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "Expected connection exit code");
}

#[test]
fn test_invalid_base_url_is_a_usage_error() {
    let output = metalctl_cmd()
        .args(["--base-url", "not a url", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("base-url"), "Expected base-url in error:\n{text}");
}

#[test]
fn test_invalid_output_format() {
    let output = metalctl_cmd()
        .args(["--output", "invalid", "users", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_without_config_file() {
    // `config show` renders the defaults when no file exists.
    metalctl_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"));
}

#[test]
fn test_config_path_prints_a_path() {
    metalctl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let output = metalctl_cmd()
        .args(["config", "set", "nonsense", "value"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_set_rejects_bad_timeout() {
    let output = metalctl_cmd()
        .args(["config", "set", "timeout", "soon"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_users_subcommands_exist() {
    metalctl_cmd().args(["users", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("stats")),
    );
}

#[test]
fn test_feedback_subcommands_exist() {
    metalctl_cmd()
        .args(["feedback", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("reply"))
                .and(predicate::str::contains("resolve"))
                .and(predicate::str::contains("reopen")),
        );
}

#[test]
fn test_broadcast_subcommands_exist() {
    metalctl_cmd()
        .args(["broadcast", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("send").and(predicate::str::contains("history")));
}

#[test]
fn test_broadcast_audience_accepts_all_five_targets() {
    metalctl_cmd()
        .args(["broadcast", "send", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("all")
                .and(predicate::str::contains("complete"))
                .and(predicate::str::contains("incomplete"))
                .and(predicate::str::contains("verified"))
                .and(predicate::str::contains("unverified")),
        );

    // An audience outside the closed set is a usage error.
    let output = metalctl_cmd()
        .args([
            "broadcast", "send", "--title", "t", "-m", "msg", "--audience", "everyone",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_list_flags_parse() {
    // Parsing succeeds; the failure must come from the unreachable API.
    let output = metalctl_cmd()
        .args([
            "--base-url",
            "http://127.0.0.1:1/api/v1",
            "--output",
            "json",
            "thoughts",
            "list",
            "--page",
            "3",
            "--limit",
            "5",
            "--search",
            "metal",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(2), "flags must parse cleanly");
}

#[test]
fn test_reply_requires_message_flag() {
    let output = metalctl_cmd()
        .args(["feedback", "reply", "fb-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
