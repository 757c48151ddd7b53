use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn pyguard() -> Command {
    Command::cargo_bin("pyguard").unwrap()
}

#[test]
fn fix_check_reports_pending_changes_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("dirty.py");
    fs::write(&file, "def f():\n    pass\n").unwrap();

    pyguard()
        .arg("fix")
        .arg("--check")
        .arg(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("file(s) would be changed").or(predicate::str::contains("file would be changed")));

    assert_eq!(fs::read_to_string(&file).unwrap(), "def f():\n    pass\n");
}

#[test]
fn fix_writes_changed_files_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("dirty.py");
    fs::write(&file, "def f():\n    pass\n").unwrap();

    pyguard()
        .arg("fix")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 file"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "def f() -> None:\n    pass\n");
}

#[test]
fn fix_diff_prints_unified_diff_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("dirty.py");
    fs::write(&file, "def f():\n    pass\n").unwrap();

    pyguard()
        .arg("fix")
        .arg("--diff")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-def f():"))
        .stdout(predicate::str::contains("+def f() -> None:"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "def f():\n    pass\n");
}
