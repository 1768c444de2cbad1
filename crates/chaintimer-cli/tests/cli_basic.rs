//! Basic CLI E2E tests.
//!
//! Each test points HOME at its own temp directory so invocations see an
//! isolated store.

use std::path::Path;
use std::process::Command;

fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "chaintimer-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn group_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["group", "add"]);
    assert_eq!(code, 0, "group add failed");
    assert!(stdout.contains("group 0 added"));

    let (stdout, _, code) = run_cli(home.path(), &["group", "list"]);
    assert_eq!(code, 0, "group list failed");
    assert!(stdout.contains("group 0"));
}

#[test]
fn timer_add_start_pause() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["group", "add"]);

    let (stdout, _, code) = run_cli(
        home.path(),
        &["timer", "add", "0", "--minutes", "5"],
    );
    assert_eq!(code, 0, "timer add failed");
    assert!(stdout.contains("timer 0 added"));

    let (stdout, _, code) = run_cli(home.path(), &["timer", "start", "0"]);
    assert_eq!(code, 0, "timer start failed");
    assert!(stdout.contains("timer_started"));

    let (stdout, _, code) = run_cli(home.path(), &["timer", "pause", "0"]);
    assert_eq!(code, 0, "timer pause failed");
    assert!(stdout.contains("timer_paused"));
}

#[test]
fn status_reports_remaining_text() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["group", "add"]);
    run_cli(home.path(), &["timer", "add", "0", "--minutes", "2", "--seconds", "30"]);

    let (stdout, _, code) = run_cli(home.path(), &["timer", "status", "0"]);
    assert_eq!(code, 0, "timer status failed");
    assert!(stdout.contains("02:30"));
}

#[test]
fn second_start_reports_no_new_wakeup() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["group", "add"]);
    run_cli(home.path(), &["timer", "add", "0", "--minutes", "5"]);

    let (stdout, _, _) = run_cli(home.path(), &["timer", "start", "0"]);
    assert!(stdout.contains("wakeup_scheduled"));

    let (stdout, _, code) = run_cli(home.path(), &["timer", "start", "0"]);
    assert_eq!(code, 0, "second start failed");
    assert!(stdout.contains("timer_started"));
    assert!(!stdout.contains("wakeup_scheduled"));
}

#[test]
fn settings_set_and_show() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["group", "add"]);

    let (stdout, _, code) = run_cli(
        home.path(),
        &["settings", "set", "--group", "0", "--repeat", "group", "--progress", "auto"],
    );
    assert_eq!(code, 0, "settings set failed");
    assert!(stdout.contains("Repeat group"));

    let (stdout, _, code) = run_cli(home.path(), &["settings", "show", "--group", "0"]);
    assert_eq!(code, 0, "settings show failed");
    assert!(stdout.contains("Auto start next"));
}

#[test]
fn nudge_interval_persists_to_config() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["settings", "set", "--nudge-interval", "30"],
    );
    assert_eq!(code, 0, "settings set failed");
    assert!(stdout.contains("nudge interval set to 30s"));

    let config =
        std::fs::read_to_string(home.path().join(".config/chaintimer/config.toml")).unwrap();
    assert!(config.contains("nudge_interval_secs = 30"));
}

#[test]
fn unknown_timer_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["timer", "start", "42"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no timer with id 42"));
}
