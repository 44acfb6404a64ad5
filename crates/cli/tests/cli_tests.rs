//! CLI integration tests

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn ccopt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ccopt"))
        .env_remove("CCOPT_CATALOG")
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn ccopt_json(args: &[&str]) -> serde_json::Value {
    let catalog = fixture("catalog.json");
    let mut full = vec!["--catalog", catalog.to_str().unwrap(), "--format", "json"];
    full.extend_from_slice(args);
    let output = ccopt(&full);
    assert!(
        output.status.success(),
        "ccopt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = ccopt(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("catalog"), "Should show catalog command");
    assert!(stdout.contains("optimize"), "Should show optimize command");
    assert!(stdout.contains("check"), "Should show check command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = ccopt(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ccopt"), "Should show binary name");
}

#[test]
fn test_optimize_help_lists_search_flags() {
    let output = ccopt(&["optimize", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for flag in [
        "--vcpus",
        "--memory",
        "--cpu-util",
        "--current",
        "--strategy",
        "--seed",
        "--pop-size",
        "--mutation-rate",
        "--fitness",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

#[test]
fn test_catalog_json_preserves_order() {
    let body = ccopt_json(&["catalog"]);

    let instances = body["instances"].as_array().unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0]["id"], "X");
    assert_eq!(instances[1]["id"], "Y");
    assert_eq!(body["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn test_catalog_table_output() {
    let catalog = fixture("catalog.json");
    let output = ccopt(&["--catalog", catalog.to_str().unwrap(), "catalog"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Instance Type"));
    assert!(stdout.contains("$0.5000/h"));
}

#[test]
fn test_optimize_direct_downgrade() {
    let body = ccopt_json(&[
        "optimize",
        "--vcpus",
        "4",
        "--memory",
        "8",
        "--current",
        "X=1",
        "--strategy",
        "direct",
    ]);

    assert_eq!(body["decision"], "downgrade");
    assert_eq!(body["optimal_configuration"], serde_json::json!({ "Y": 1 }));
    assert!((body["savings"].as_f64().unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn test_optimize_seeded_genetic_is_reproducible() {
    let args = [
        "optimize",
        "--vcpus",
        "8",
        "--memory",
        "16",
        "--current",
        "X=2",
        "--max-count",
        "2",
        "--seed",
        "11",
    ];
    let first = ccopt_json(&args);
    let second = ccopt_json(&args);

    assert_eq!(first["strategy"], "evolutionary");
    assert_eq!(first["optimal_configuration"], second["optimal_configuration"]);
    assert_eq!(first["decision"], second["decision"]);
}

#[test]
fn test_optimize_from_utilization() {
    // 50% of 2xX (8 vCPUs, 16 GiB) is exactly one Y
    let body = ccopt_json(&[
        "optimize",
        "--cpu-util",
        "50",
        "--mem-util",
        "50",
        "--current",
        "X=2",
        "--strategy",
        "direct",
    ]);

    assert_eq!(body["optimal_configuration"], serde_json::json!({ "Y": 1 }));
    assert_eq!(body["resource_delta"]["vcpus"], -4);
}

#[test]
fn test_optimize_infeasible_is_upgrade() {
    let body = ccopt_json(&[
        "optimize",
        "--vcpus",
        "64",
        "--memory",
        "8",
        "--current",
        "Y=1",
        "--strategy",
        "direct",
    ]);

    assert_eq!(body["decision"], "upgrade");
    assert!(body["optimal_configuration"].is_null());
}

#[test]
fn test_optimize_unknown_current_instance_fails() {
    let catalog = fixture("catalog.json");
    let output = ccopt(&[
        "--catalog",
        catalog.to_str().unwrap(),
        "optimize",
        "--vcpus",
        "4",
        "--memory",
        "8",
        "--current",
        "Z=1",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown instance type"));
}

#[test]
fn test_optimize_requires_requirement() {
    let catalog = fixture("catalog.json");
    let output = ccopt(&["--catalog", catalog.to_str().unwrap(), "optimize", "--current", "X=1"]);

    assert!(!output.status.success());
}

#[test]
fn test_check_reports_shortfall() {
    let body = ccopt_json(&["check", "--vcpus", "18", "--memory", "64", "--current", "X=1"]);

    assert_eq!(body["decision"], "upgrade");
    assert_eq!(body["resource_delta"]["vcpus"], 14);
    assert_eq!(body["resource_delta"]["memory_gib"], 56.0);
}

#[test]
fn test_invalid_catalog_is_rejected() {
    let catalog = fixture("invalid_catalog.json");
    let output = ccopt(&["--catalog", catalog.to_str().unwrap(), "catalog"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("vCPUs"));
}

#[test]
fn test_missing_catalog_is_rejected() {
    let output = ccopt(&["--catalog", "/nonexistent/catalog.json", "catalog"]);

    assert!(!output.status.success());
}

#[test]
fn test_catalog_path_from_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut file,
        br#"[{"instance_type": "solo", "vCPUs": 2, "memory_GiB": 4.0, "on_demand_hourly_price_usd": 0.04}]"#,
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ccopt"))
        .env("CCOPT_CATALOG", file.path())
        .args(["--format", "json", "catalog"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["instances"][0]["id"], "solo");
}
