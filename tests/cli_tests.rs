//! CLI integration tests using the REAL tresor binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn tresor_cmd() -> Command {
    Command::cargo_bin("tresor").unwrap()
}

#[test]
fn test_help_output() {
    tresor_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("--claude-dir"));
}

#[test]
fn test_version_output() {
    tresor_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tresor"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_completions_bash() {
    tresor_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tresor"));
}

#[test]
fn test_completions_unknown_shell() {
    tresor_cmd()
        .args(["completions", "--shell", "tcsh"])
        .assert()
        .failure();
}

#[test]
fn test_update_rejects_conflicting_scopes() {
    let tresor = common::TestTresor::new();
    tresor
        .cmd()
        .args(["update", "--commands-only", "--agents-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_update_rejects_rollback_with_cleanup() {
    let tresor = common::TestTresor::new();
    tresor
        .cmd()
        .args(["update", "--rollback", "--cleanup"])
        .assert()
        .failure();
}

#[test]
fn test_claude_dir_from_environment() {
    let tresor = common::TestTresor::new();
    tresor_cmd()
        .env("TRESOR_CLAUDE_DIR", &tresor.root)
        .env("TRESOR_SOURCE", &tresor.checkout)
        .args(["install", "--force"])
        .assert()
        .success();
    assert!(tresor.root_exists("agents/code-reviewer/agent.md"));
}
