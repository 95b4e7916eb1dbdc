//! Rules command tests

mod common;

use predicates::prelude::*;

#[test]
fn test_rules_prints_builtin_patterns() {
    common::unidup_cmd()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("include:"))
        .stdout(predicate::str::contains("exclude:"))
        .stdout(predicate::str::contains("edition_tokens:"))
        .stdout(predicate::str::contains("KB"));
}

#[test]
fn test_rules_with_override_file() {
    let inventory = common::TestInventory::new();
    let rules = inventory.write_rules("include:\n  - '(?i)^acme'\n");

    common::unidup_cmd()
        .args(["rules", "--rules", rules.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme"));
}

#[test]
fn test_rules_invalid_pattern_rejected() {
    let inventory = common::TestInventory::new();
    let rules = inventory.write_rules("include:\n  - '(unclosed'\n");

    common::unidup_cmd()
        .args(["rules", "--rules", rules.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_rules_missing_file() {
    common::unidup_cmd()
        .args(["rules", "--rules", "/nonexistent/rules.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rules file not found"));
}
