use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn pyguard() -> Command {
    Command::cargo_bin("pyguard").unwrap()
}

#[test]
fn explain_unknown_rule_fails() {
    pyguard()
        .arg("explain")
        .arg("NOPE999")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unknown rule code"));
}

#[test]
fn explain_known_rule_shows_detail() {
    pyguard()
        .arg("explain")
        .arg("TYP001")
        .assert()
        .success()
        .stdout(predicate::str::contains("TYP001"))
        .stdout(predicate::str::contains("Missing Parameter Annotations"));
}

#[test]
fn explain_all_lists_every_rule() {
    pyguard()
        .arg("explain")
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains("TYP001"))
        .stdout(predicate::str::contains("EXP002"));
}
