use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn pyguard() -> Command {
    Command::cargo_bin("pyguard").unwrap()
}

#[test]
fn lint_reports_missing_annotation() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("bad.py"), "def greet(name):\n    return name\n").unwrap();

    pyguard()
        .arg("lint")
        .arg(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("TYP001"));
}

#[test]
fn lint_clean_file_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("good.py"), "def greet(name: str) -> None:\n    print(name)\n").unwrap();

    pyguard()
        .arg("lint")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found."));
}
