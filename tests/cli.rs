//! End-to-end tests for the `tierpack` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "units": [
        {"spec": "web/login", "pool": "threads", "project": "web", "module": "login.test.ts"},
        {"spec": "web/cart", "pool": "threads", "project": "web", "module": "cart.test.ts"},
        {"spec": "web/dom", "pool": "threads", "project": "web", "module": "dom.test.ts",
         "environment": "jsdom"},
        {"spec": "api/users", "pool": "forks", "project": "api", "module": "users.test.ts"}
    ],
    "results": {
        "web:login.test.ts": {"duration_ms": 1200, "failed": false},
        "web:cart.test.ts": {"duration_ms": 300, "failed": true},
        "api:users.test.ts": {"duration_ms": 2500}
    },
    "file_stats": {"web:dom.test.ts": {"size_bytes": 9000}},
    "dependencies": {
        "web:login.test.ts": ["db"],
        "web:cart.test.ts": ["db"]
    }
}"#;

fn write_manifest(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("units.json");
    fs::write(&path, MANIFEST).unwrap();
    path
}

fn tierpack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tierpack").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_plan_text_output() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());

    tierpack(temp_dir.path())
        .args(["plan", "--manifest"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tier 1"))
        .stdout(predicate::str::contains("[threads/web/jsdom]"))
        .stdout(predicate::str::contains("api/users"));
}

#[test]
fn test_plan_json_fast_fail() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());

    let output = tierpack(temp_dir.path())
        .args(["plan", "--strategy", "fast-fail", "--format", "json", "--analyze"])
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first_tier = &json["schedule"]["tiers"][0];
    assert_eq!(first_tier[0]["units"][0], "web/cart");
    assert_eq!(first_tier[0]["priority"], 0.0);
    assert_eq!(json["efficiency"]["total_tests"], 4);
}

#[test]
fn test_plan_negative_workers() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());

    let output = tierpack(temp_dir.path())
        .args(["plan", "--workers=-5", "--format", "json"])
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for tier in json["schedule"]["tiers"].as_array().unwrap() {
        assert_eq!(tier.as_array().unwrap().len(), 1);
    }
}

#[test]
fn test_plan_uses_config_strategy() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());
    fs::write(
        temp_dir.path().join("tierpack.toml"),
        "[scheduler]\nstrategy = \"dependency-aware\"\n\n[report]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = tierpack(temp_dir.path())
        .arg("plan")
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(output.status.success());

    // login and cart share "db", so they land in different tiers.
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tiers = json["schedule"]["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 2);
}

#[test]
fn test_plan_missing_manifest() {
    let temp_dir = TempDir::new().unwrap();

    tierpack(temp_dir.path())
        .args(["plan", "--manifest", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read manifest"));
}

#[test]
fn test_plan_unknown_strategy() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = write_manifest(temp_dir.path());

    tierpack(temp_dir.path())
        .args(["plan", "--strategy", "greedy", "--manifest"])
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown strategy 'greedy'"));
}

#[test]
fn test_init_then_validate() {
    let temp_dir = TempDir::new().unwrap();

    tierpack(temp_dir.path())
        .args(["init", "--strategy", "resource-optimized", "--workers", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created tierpack.toml"));

    tierpack(temp_dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy: resource-optimized"))
        .stdout(predicate::str::contains("Max workers: 6"));

    tierpack(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_validate_missing_config() {
    let temp_dir = TempDir::new().unwrap();

    tierpack(temp_dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
