use std::path::PathBuf;
use std::process::{Command, Output};

fn cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_projectile"))
}

fn run(args: &[&str]) -> Output {
    Command::new(cli_binary())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_numeric_basic() {
    let output = run(&["numeric", "--angle", "45", "--speed", "20"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("NUMERIC TRAJECTORY"), "Should contain trajectory output");
    assert!(stdout.contains("32.17"), "Should report the drag-affected range: {}", stdout);
}

#[test]
fn test_cli_analytic_basic() {
    let output = run(&["analytic", "-a", "45", "-s", "20"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("43.14"), "Should report the drag-free range: {}", stdout);
}

#[test]
fn test_cli_compare_table() {
    let output = run(&["compare", "--angle", "45", "--speed", "20"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("No drag") && stdout.contains("With drag"));
    assert!(stdout.contains("43.14") && stdout.contains("32.17"), "{}", stdout);
}

#[test]
fn test_cli_optimize_json() {
    let output = run(&["optimize", "--speed", "20", "--output", "json"]);

    assert!(output.status.success(), "Command should succeed");
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).expect("Should be JSON format");
    assert_eq!(value["angle"].as_f64(), Some(41.0));
    let range = value["max_range"].as_f64().unwrap();
    assert!((range - 32.4521).abs() < 1e-3, "range {range}");
}

#[test]
fn test_cli_optimize_neighbours_csv() {
    let output = run(&["optimize", "--speed", "20", "--neighbours", "2", "-o", "csv", "--parallel"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "angle_deg,range");
    let angles: Vec<&str> = lines[1..].iter().map(|l| l.split(',').next().unwrap()).collect();
    assert_eq!(angles, vec!["39.0000", "40.0000", "41.0000", "42.0000", "43.0000"]);
}

#[test]
fn test_cli_vacuum_drag_model_flies_further() {
    let output = run(&["numeric", "-a", "45", "-s", "20", "--drag-model", "vacuum", "-o", "json"]);

    assert!(output.status.success(), "Command should succeed");
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let range = value["range"].as_f64().unwrap();
    assert!(range > 40.0, "range {range}");
}

#[test]
fn test_cli_tiny_time_step_is_an_error() {
    let output = run(&["numeric", "--dt", "1e-20"]);

    assert!(!output.status.success(), "Tiny time step should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("time_step_s"), "{}", stderr);
    assert!(!stderr.contains("panicked"), "{}", stderr);
}

#[test]
fn test_cli_output_format_csv() {
    let output = run(&["numeric", "--angle", "30", "--speed", "15", "--output", "csv"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = stdout_of(&output);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("x,y"));
    assert!(lines.next().unwrap().starts_with("0.0000,2.5000"));
}

#[test]
fn test_cli_config_file_overrides_defaults() {
    let mut path = std::env::temp_dir();
    path.push(format!("projectile-cli-test-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "constants": { "drag_coefficient": 0.0, "launch_height": 0.0 } }"#).unwrap();

    let output = run(&["optimize", "--speed", "20", "-o", "json", "--dt", "0.001", "--config", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    assert!(output.status.success(), "Command should succeed: {}", String::from_utf8_lossy(&output.stderr));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(value["angle"].as_f64(), Some(45.0));
}

#[test]
fn test_cli_rejects_out_of_range_angle() {
    let output = run(&["numeric", "--angle", "120", "--speed", "20"]);

    assert!(!output.status.success(), "Out of range angle should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("angle_degrees"), "{}", stderr);
}

#[test]
fn test_cli_missing_config_file() {
    let output = run(&["info", "--config", "/definitely/not/here.json"]);
    assert!(!output.status.success(), "Missing config should fail");
}

#[test]
fn test_cli_info() {
    let output = run(&["info"]);

    assert!(output.status.success(), "Command should succeed");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Terminal Velocity"));
    assert!(stdout.contains("quadratic"));
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");
    let stdout = stdout_of(&output);
    for command in ["analytic", "numeric", "compare", "optimize", "info"] {
        assert!(stdout.contains(command), "Should list {} command", command);
    }
}

#[test]
fn test_cli_invalid_command() {
    let output = run(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
}
