use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn pyguard() -> Command {
    Command::cargo_bin("pyguard").unwrap()
}

#[test]
fn config_prints_defaults() {
    let tmp = tempfile::tempdir().unwrap();

    pyguard()
        .current_dir(tmp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("PyGuard Configuration"));
}

#[test]
fn config_json_is_well_formed() {
    let tmp = tempfile::tempdir().unwrap();

    let output = pyguard()
        .current_dir(tmp.path())
        .arg("config")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed.get("rules").is_some());
}

#[test]
fn config_validate_reports_success_without_printing_config() {
    let tmp = tempfile::tempdir().unwrap();

    pyguard()
        .current_dir(tmp.path())
        .arg("config")
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid").or(predicate::str::contains("OK")));
}
