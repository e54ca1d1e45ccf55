//! Integration tests for the `apcommand` binary.
//!
//! Argument parsing, help output, completions and error exit codes,
//! exercised without a reachable access point.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// The binary with config directories pointed at a nonexistent path and
/// every `APCOMMAND_*` variable cleared.
fn apcommand() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("apcommand");
    cmd.env("HOME", "/tmp/apcommand-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/apcommand-cli-test-nonexistent")
        .env_remove("APCOMMAND_PROFILE")
        .env_remove("APCOMMAND_HOST")
        .env_remove("APCOMMAND_USERNAME")
        .env_remove("APCOMMAND_PASSWORD")
        .env_remove("APCOMMAND_SETTLE_MS")
        .env_remove("APCOMMAND_TIMEOUT")
        .env_remove("APCOMMAND_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = apcommand().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    apcommand().arg("--help").assert().success().stdout(
        predicate::str::contains("channel")
            .and(predicate::str::contains("unset-channel"))
            .and(predicate::str::contains("ssid"))
            .and(predicate::str::contains("status")),
    );
}

#[test]
fn test_version_flag() {
    apcommand()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("apcommand"));
}

#[test]
fn test_unknown_subcommand_fails() {
    apcommand()
        .arg("reboot")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_band_argument_is_validated_by_parser() {
    let output = apcommand().args(["enable", "3"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid value"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    apcommand()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apcommand"));
}

#[test]
fn test_completions_zsh() {
    apcommand()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_fish() {
    apcommand()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_status_without_config_or_host() {
    let output = apcommand().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No access point configured"),
        "unexpected output:\n{text}"
    );
}

#[test]
fn test_missing_profile_is_not_found() {
    let output = apcommand()
        .args(["--profile", "missing", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("missing"));
}

#[test]
fn test_zero_settle_is_rejected() {
    let output = apcommand()
        .args(["--settle-ms", "0", "--host", "192.0.2.1", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_profiles_when_empty() {
    apcommand()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

// ── AP commands ─────────────────────────────────────────────────────

#[test]
fn test_unknown_channel_fails_before_contacting_ap() {
    let output = apcommand()
        .args(["--host", "127.0.0.1:1", "channel", "75"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Unknown channel 75"), "unexpected output:\n{text}");
}

#[test]
fn test_unreachable_ap_is_a_connection_error() {
    let output = apcommand()
        .args([
            "--host",
            "127.0.0.1:1",
            "--timeout",
            "1",
            "--settle-ms",
            "1",
            "status",
            "2.4",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Could not connect"));
}

// ── Undo record ─────────────────────────────────────────────────────

#[test]
fn test_unset_without_record_fails_before_contacting_ap() {
    let output = apcommand()
        .args(["--host", "127.0.0.1:1", "unset-channel"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("No channel change to undo"));
}

#[test]
fn test_unset_uses_change_recorded_by_earlier_run() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("apcommand");
    std::fs::create_dir_all(&state_dir).unwrap();
    std::fs::write(
        state_dir.join("state.toml"),
        "[last_change.default]\nenabled = \"5GHz\"\ndisabled = \"2.4GHz\"\nprior_channel = 36\nprior_sideband = \"upper\"\n",
    )
    .unwrap();

    // The record is found, so the undo reaches for the (unreachable) AP.
    let output = apcommand()
        .env("XDG_CONFIG_HOME", dir.path())
        .args([
            "--host",
            "127.0.0.1:1",
            "--timeout",
            "1",
            "--settle-ms",
            "1",
            "unset-channel",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Could not connect"));

    // A failed undo keeps the record for another attempt.
    let state = std::fs::read_to_string(state_dir.join("state.toml")).unwrap();
    assert!(state.contains("prior_channel = 36"));
}

// ── Atheros ─────────────────────────────────────────────────────────

#[test]
fn test_atheros_help_lists_subcommands() {
    apcommand()
        .args(["atheros", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("up")
                .and(predicate::str::contains("down"))
                .and(predicate::str::contains("destroy"))
                .and(predicate::str::contains("channel")),
        );
}

#[test]
fn test_atheros_invalid_channel_is_a_usage_error() {
    // Rejected before any connection attempt.
    let output = apcommand()
        .args(["--host", "127.0.0.1", "atheros", "--port", "1", "channel", "12"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Invalid channel 12"));
}

#[test]
fn test_atheros_unreachable_ap_is_a_connection_error() {
    let output = apcommand()
        .args([
            "--host", "127.0.0.1", "--timeout", "1", "atheros", "--port", "1", "up",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Could not connect"));
}
