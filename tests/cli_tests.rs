//! Integration tests for the runbot CLI boundary.
//!
//! These only exercise argument parsing and pre-mutation validation — no
//! hypervisor is touched: every failing invocation errors before the
//! first `lxc` call.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn runbot() -> Command {
    let mut cmd = Command::cargo_bin("runbot").expect("runbot binary should exist");
    // Point the config at a nonexistent file so user configuration never
    // leaks into the tests (defaults apply).
    cmd.env("RUNBOT_CONFIG", "/nonexistent/runbot-tests/config.yaml");
    cmd
}

// --- Help and version ---

#[test]
fn no_args_shows_help_and_exits_two() {
    runbot()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Disposable application instances"));
}

#[test]
fn help_lists_the_lifecycle_commands() {
    runbot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("move"))
        .stdout(predicate::str::contains("rename"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("set-env"))
        .stdout(predicate::str::contains("route"));
}

#[test]
fn version_flag_shows_the_version() {
    runbot()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("runbot"));
}

#[test]
fn unknown_subcommand_exits_two() {
    runbot().arg("teleport").assert().code(2);
}

// --- Pre-mutation validation ---

#[test]
fn create_rejects_image_and_version_together() {
    runbot()
        .args(["create", "demo1", "--image", "debian-10", "--version", "15.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn create_requires_an_image_or_a_version() {
    runbot()
        .args(["create", "demo1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("image or a version"));
}

#[test]
fn create_rejects_an_environment_outside_the_closed_set() {
    runbot()
        .args(["create", "demo1", "--version", "15.0", "--env", "qa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid"));
}

#[test]
fn create_rejects_an_unknown_application() {
    runbot()
        .args(["create", "demo1", "--version", "15.0", "--app", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}

#[test]
fn create_rejects_an_unknown_version() {
    runbot()
        .args(["create", "demo1", "--version", "9.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'9.0'"));
}

#[test]
fn set_env_rejects_an_environment_outside_the_closed_set() {
    runbot()
        .args(["set-env", "demo1", "qa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid"));
}

#[test]
fn exec_requires_a_command() {
    runbot().args(["exec", "demo1"]).assert().code(2);
}
