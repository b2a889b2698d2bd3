//! End-to-end tests for the `meshtrace` binary.

use std::path::PathBuf;
use std::process::Command;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/microservices")
}

fn meshtrace() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_meshtrace"));
    cmd.env_remove("MESHTRACE_LOG");
    cmd
}

#[test]
fn test_interactions_then_chains_then_compare() {
    let out = tempfile::TempDir::new().unwrap();
    let interactions = out.path().join("interactions.json");
    let chains = out.path().join("chains.json");

    let status = meshtrace()
        .arg("interactions")
        .arg(fixture_root())
        .arg("-o")
        .arg(&interactions)
        .status()
        .unwrap();
    assert!(status.success());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&interactions).unwrap()).unwrap();
    assert_eq!(written["total_relations"], 3);
    assert_eq!(written["api_interactions"].as_array().unwrap().len(), 5);

    let status = meshtrace()
        .arg("chains")
        .arg(fixture_root())
        .arg("--interactions")
        .arg(&interactions)
        .arg("-o")
        .arg(&chains)
        .status()
        .unwrap();
    assert!(status.success());

    let forest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&chains).unwrap()).unwrap();
    assert_eq!(forest.as_array().unwrap().len(), 4);

    // Loop markers and repeated calls make the per-pair counts disagree.
    let output = meshtrace()
        .arg("compare")
        .arg("--chains")
        .arg(&chains)
        .arg("--interactions")
        .arg(&interactions)
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["missing_in_results"].as_array().unwrap().is_empty());
    assert!(report["extra_in_results"].as_array().unwrap().is_empty());
    assert!(!report["count_mismatches"].as_array().unwrap().is_empty());
}

#[test]
fn test_missing_services_list_is_fatal() {
    let root = tempfile::TempDir::new().unwrap();

    let output = meshtrace()
        .arg("-q")
        .arg("interactions")
        .arg(root.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[MISSING_INPUT]"), "stderr: {stderr}");
}

#[test]
fn test_invalid_policy_rejected_by_parser() {
    let output = meshtrace()
        .args(["--policy", "alphabetical", "run"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
