//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory.

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "liftlog-cli", "--"])
        .args(args)
        .env("LIFTLOG_ENV", "dev")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_template_list() {
    let output = run_cli(&["template", "list"]);
    assert!(output.0 == 0, "Template list failed: {}", output.2);
    assert!(output.1.contains("Push Day"));
    assert!(output.1.contains("Leg Day"));
}

#[test]
fn test_template_show() {
    let output = run_cli(&["template", "show", "pull day"]);
    assert!(output.0 == 0, "Template show failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["name"], "Pull Day");
    assert_eq!(parsed["exercises"][0]["name"], "Deadlift");
}

#[test]
fn test_template_show_unknown() {
    let output = run_cli(&["template", "show", "Arm Day"]);
    assert!(output.0 != 0, "Unknown template should fail");
    assert!(output.2.contains("unknown template"));
}

#[test]
fn test_timer_presets() {
    let output = run_cli(&["timer", "presets"]);
    assert!(output.0 == 0, "Timer presets failed");
    assert!(output.1.contains("1:30"));
}

#[test]
fn test_timer_rejects_zero() {
    let output = run_cli(&["timer", "start", "0"]);
    assert!(output.0 != 0, "Zero-length rest should fail");
}

#[test]
fn test_config_get() {
    let output = run_cli(&["config", "get", "notifications.title"]);
    assert!(output.0 == 0, "Config get failed");
}

#[test]
fn test_config_get_unset_catalog_path() {
    let output = run_cli(&["config", "get", "catalog.path"]);
    assert!(output.0 == 0, "Config get failed: {}", output.2);
    assert_ne!(output.1.trim(), "null");
}

#[test]
fn test_config_get_unknown() {
    let output = run_cli(&["config", "get", "rest.nope"]);
    assert!(output.0 != 0, "Unknown key should fail");
}

#[test]
fn test_config_list() {
    let output = run_cli(&["config", "list"]);
    assert!(output.0 == 0, "Config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert!(parsed["rest"]["default_secs"].is_number());
}

#[test]
fn test_workout_flow() {
    let output = run_cli(&["workout", "start", "Leg Day"]);
    assert!(output.0 == 0, "Workout start failed: {}", output.2);
    assert!(output.1.contains("WorkoutStarted"));

    let output = run_cli(&["workout", "set", "1", "2", "--weight", "100", "--reps", "5"]);
    assert!(output.0 == 0, "Workout set failed: {}", output.2);

    let output = run_cli(&["workout", "toggle", "1", "2", "--skip-rest"]);
    assert!(output.0 == 0, "Workout toggle failed: {}", output.2);
    let events: Vec<serde_json::Value> = output
        .1
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    assert_eq!(kinds, ["SetToggled", "RestStarted", "RestStopped"]);

    let output = run_cli(&["workout", "status"]);
    assert!(output.0 == 0, "Workout status failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["template"], "Leg Day");
    assert_eq!(parsed["exercises"][0]["sets"][1]["weight"], "100");
    assert_eq!(parsed["exercises"][0]["sets"][1]["completed"], true);

    let output = run_cli(&["workout", "rest", "--next"]);
    assert!(output.0 == 0, "Workout rest --next failed: {}", output.2);
    let event: serde_json::Value = serde_json::from_str(output.1.trim()).unwrap();
    assert_eq!(event["type"], "RestDurationChanged");
    let stepped = event["secs"].as_u64().unwrap();

    let output = run_cli(&["workout", "rest", "--prev"]);
    assert!(output.0 == 0, "Workout rest --prev failed: {}", output.2);
    let event: serde_json::Value = serde_json::from_str(output.1.trim()).unwrap();
    assert!(event["secs"].as_u64().unwrap() < stepped);

    let output = run_cli(&["workout", "rest"]);
    assert!(output.0 != 0, "Rest without a length should fail");

    let output = run_cli(&["workout", "set", "9", "1", "--weight", "1"]);
    assert!(output.0 != 0, "Out-of-range exercise should fail");

    let output = run_cli(&["workout", "finish"]);
    assert!(output.0 == 0, "Workout finish failed: {}", output.2);
    assert!(output.1.contains("WorkoutFinished"));

    let output = run_cli(&["workout", "status"]);
    assert!(output.0 != 0, "Status without a workout should fail");
}
