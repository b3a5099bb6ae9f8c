//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary data directory with the
//! local backend and verify outputs.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pointstracker"))
        .args(args)
        .env("POINTSTRACKER_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn status(data_dir: &TempDir) -> Value {
    run_json(data_dir, &["status", "--json"])
}

#[test]
fn test_status_defaults() {
    let dir = TempDir::new().unwrap();
    let status = status(&dir);
    assert_eq!(status["backend"], "local");
    assert_eq!(status["scores"]["Lila"], 0);
    assert_eq!(status["scores"]["Maryn"], 0);
    assert_eq!(status["pinThreshold"], 10);
    assert!(status["pending"].is_null());
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_small_change_applies() {
    let dir = TempDir::new().unwrap();
    let event = run_json(&dir, &["points", "add", "lila", "5"]);
    assert_eq!(event["type"], "PointsApplied");
    assert_eq!(event["counter"], "Lila");
    assert_eq!(event["score"], 5);

    let event = run_json(&dir, &["points", "subtract", "Maryn", "3"]);
    assert_eq!(event["score"], -3);
    assert_eq!(status(&dir)["scores"]["Maryn"], -3);
}

#[test]
fn test_challenge_survives_between_runs() {
    let dir = TempDir::new().unwrap();
    let event = run_json(&dir, &["points", "add", "Lila", "15"]);
    assert_eq!(event["type"], "ChallengeRaised");
    assert_eq!(status(&dir)["pending"]["amount"], 15);

    let (_, stderr, code) = run_cli(&dir, &["points", "add", "Maryn", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));

    let event = run_json(&dir, &["points", "pin", "0000"]);
    assert_eq!(event["type"], "PinRejected");
    assert_eq!(event["message"], "Incorrect PIN. Try again.");

    let event = run_json(&dir, &["points", "pin", "1234"]);
    assert_eq!(event["type"], "PointsApplied");
    assert_eq!(event["approved_with_pin"], true);
    assert_eq!(event["notification"]["status"], "no_recipients");

    let status = status(&dir);
    assert_eq!(status["scores"]["Lila"], 15);
    assert!(status["pending"].is_null());
}

#[test]
fn test_cancel_discards_pending() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["points", "subtract", "Maryn", "40"]);
    let event = run_json(&dir, &["points", "cancel"]);
    assert_eq!(event["type"], "ChallengeCancelled");
    assert_eq!(status(&dir)["scores"]["Maryn"], 0);

    let (_, _, code) = run_cli(&dir, &["points", "cancel"]);
    assert_eq!(code, 1);
}

#[test]
fn test_zero_amount_rejected_by_parser() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&dir, &["points", "add", "Lila", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_admin_settings_require_login() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["admin", "set-pin", "4321"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, stderr, code) = run_cli(&dir, &["admin", "login", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Incorrect Admin Password."));
}

#[test]
fn test_admin_threshold_and_pin() {
    let dir = TempDir::new().unwrap();
    let login = run_json(&dir, &["admin", "login", "123"]);
    assert_eq!(login["type"], "AdminLoggedIn");
    assert_eq!(login["current_pin"], "1234");

    let event = run_json(&dir, &["admin", "set-threshold", "30"]);
    assert_eq!(event["setting"], "threshold");
    assert_eq!(event["message"], "Threshold updated to 30 pts successfully!");

    let (_, stderr, code) = run_cli(&dir, &["admin", "set-pin", "12"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("PIN must be exactly 4 digits."));

    run_json(&dir, &["admin", "set-pin", "9999"]);
    run_json(&dir, &["points", "add", "Lila", "31"]);
    let event = run_json(&dir, &["points", "pin", "9999"]);
    assert_eq!(event["score"], 31);
}

#[test]
fn test_admin_show_requires_login() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["admin", "show"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Admin login required."));

    run_json(&dir, &["admin", "login", "123"]);
    run_json(&dir, &["admin", "set-pin", "2468"]);
    let settings = run_json(&dir, &["admin", "show"]);
    assert_eq!(settings["currentPin"], "2468");
    assert_eq!(settings["pinThreshold"], 10);
}

#[test]
fn test_local_backend_reports_logged_notification() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["admin", "login", "123"]);
    run_json(
        &dir,
        &["admin", "recipients", "set", "0", "--phone", "5551234567", "--carrier", "AT&T"],
    );
    let event = run_json(&dir, &["points", "subtract", "Maryn", "10"]);
    assert_eq!(event["notification"]["status"], "logged");
    assert_eq!(event["notification"]["recipients"], 1);
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[backend\nkind = ").unwrap();
    let (_, stderr, code) = run_cli(&dir, &["status"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration error"));
}

#[test]
fn test_password_change_logs_out() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["admin", "login", "123"]);
    run_json(&dir, &["admin", "set-password", "letmein"]);
    assert_eq!(status(&dir)["adminLoggedIn"], false);
    let (_, _, code) = run_cli(&dir, &["admin", "login", "123"]);
    assert_eq!(code, 1);
    run_json(&dir, &["admin", "login", "letmein"]);
}

#[test]
fn test_recipients_set_and_list() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["admin", "login", "123"]);
    let event = run_json(
        &dir,
        &["admin", "recipients", "set", "2", "--phone", "(555) 123-4567", "--carrier", "Verizon"],
    );
    assert_eq!(event["message"], "Notification settings saved successfully!");

    let slots = run_json(&dir, &["admin", "recipients", "list"]);
    let slots = slots.as_array().unwrap();
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0]["phone"], "5551234567");
    assert_eq!(slots[0]["gateway"], "5551234567@vtext.com");

    let (_, _, code) = run_cli(&dir, &["admin", "recipients", "set", "5", "--phone", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "get", "backend.kind"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "local");

    let (_, _, code) = run_cli(&dir, &["config", "set", "tracker.counters", r#"["Ann","Bo"]"#]);
    assert_eq!(code, 0);
    assert_eq!(status(&dir)["scores"]["Bo"], 0);

    let (_, _, code) = run_cli(&dir, &["config", "set", "backend.kind", "carrier-pigeon"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(&dir, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_carriers_lists_gateways() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["carriers"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("vtext.com"));
    assert!(stdout.contains("Custom"));
}
