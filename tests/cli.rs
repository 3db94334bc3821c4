//! CLI tests for the spanguard binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const APT: &str = concat!(
    "{\"text\": \"Reconnect 192.168.1.1/24 now\", \"entities\": [[10, 24, \"IP_ADDRESS\"]]}\n",
    "{\"text\": \"Patch CVE-2021-44228 today\", \"entities\": [[6, 20, \"CVE_ID\"]]}\n",
);

fn spanguard() -> Command {
    Command::cargo_bin("spanguard").unwrap()
}

// =============================================================================
// audit / fix
// =============================================================================

#[test]
fn audit_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apt_entities.jsonl");
    fs::write(&path, APT).unwrap();

    spanguard()
        .args(["audit", "--summary"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary"))
        .stdout(predicate::str::contains("repaired 1"))
        .stdout(predicate::str::contains("accuracy: 50.0%"));

    assert_eq!(fs::read_to_string(&path).unwrap(), APT);
}

#[test]
fn audit_json_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("apt_entities.jsonl"), APT).unwrap();

    let output = spanguard()
        .args(["audit", "--format", "json"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["records"], 2);
    assert_eq!(json["totals"]["repaired"], 1);
}

#[test]
fn audit_min_accuracy_gate() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("apt_entities.jsonl"), APT).unwrap();

    spanguard()
        .args(["audit", "--min-accuracy", "90"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the required 90.0%"));
}

#[test]
fn fix_apply_writes_backup_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apt_entities.jsonl");
    fs::write(&path, APT).unwrap();

    spanguard()
        .args(["fix", "--apply", "-q"])
        .arg(&path)
        .assert()
        .success();

    let fixed = fs::read_to_string(&path).unwrap();
    assert!(fixed.contains("[10,21,\"IP_ADDRESS\"]"));
    let backup = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.to_string_lossy().contains(".backup_"))
        .expect("backup file");
    assert_eq!(fs::read_to_string(backup).unwrap(), APT);
}

#[test]
fn fix_without_apply_is_a_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apt_entities.jsonl");
    fs::write(&path, APT).unwrap();

    spanguard()
        .arg("fix")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Dry run"));

    assert_eq!(fs::read_to_string(&path).unwrap(), APT);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn apply_and_output_conflict() {
    spanguard()
        .args(["fix", "--apply", "-o", "out", "data"])
        .assert()
        .failure();
}

#[test]
fn missing_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    spanguard()
        .arg("audit")
        .arg(dir.path().join("nope.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be processed"));
}

// =============================================================================
// check / patterns / align / config
// =============================================================================

#[test]
fn check_shows_repair() {
    spanguard()
        .args(["check", "-t", "Reconnect 192.168.1.1/24 now", "-s", "IP_ADDRESS:10:24"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INVALID_PATTERN"))
        .stdout(predicate::str::contains("-> repaired [10, 21) \"192.168.1.1\""));
}

#[test]
fn check_reads_stdin() {
    spanguard()
        .args(["check", "-s", "SECURITY_TYPE:0:8"])
        .write_stdin("Security incident response\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROBLEMATIC_LABEL"))
        .stdout(predicate::str::contains("removed"));
}

#[test]
fn check_rejects_bad_span_spec() {
    spanguard()
        .args(["check", "-t", "abc", "-s", "IP_ADDRESS:x:3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid start offset"));
}

#[test]
fn patterns_classify_a_string() {
    spanguard()
        .args(["patterns", "--test", "CVE-2021-44228"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CVE_ID"))
        .stdout(predicate::str::contains("IP_ADDRESS").not());
}

#[test]
fn patterns_unknown_label_fails() {
    spanguard()
        .args(["patterns", "--label", "MALWARE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no pattern"));
}

#[test]
fn align_counts_spans() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("apt_entities.jsonl"), APT).unwrap();

    spanguard()
        .args(["align", "--format", "json"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"spans\": 2"));
}

#[test]
fn config_show_respects_profile() {
    spanguard()
        .args(["--profile", "strict", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile = \"strict\""))
        .stdout(predicate::str::contains("unknown_labels = \"drop\""));
}

#[test]
fn config_file_is_layered_over_profile() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("spanguard.toml");
    fs::write(&config, "profile = \"lenient\"\nmin_length = 3\n\n[repair]\nwindow = 60\n").unwrap();

    spanguard()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile = \"lenient\""))
        .stdout(predicate::str::contains("min_length = 3"))
        .stdout(predicate::str::contains("window = 60"))
        .stdout(predicate::str::contains("tolerance = 20"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("spanguard.toml");

    spanguard().args(["config", "init"]).arg(&target).assert().success();
    assert!(fs::read_to_string(&target).unwrap().contains("[repair]"));

    spanguard()
        .args(["config", "init"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn bad_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "min_lenght = 3\n").unwrap();

    spanguard()
        .arg("-c")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.toml"));
}
