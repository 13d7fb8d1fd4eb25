//! CLI integration tests.
//!
//! These run the `bn` binary end to end against temporary directories,
//! asserting on stdout/stderr and exit codes (0 on success, 100 on any
//! uncaught error).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn bn(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bn").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn write_demo(dir: &Path) -> std::path::PathBuf {
    let file = dir.join("Demo.java");
    fs::write(
        &file,
        "import java.util.List;\nclass Demo { void check(String s){ if(s.length()>1){} } }\n",
    )
    .unwrap();
    file
}

#[test]
fn optimize_removes_unused_import_and_reports_remainder() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_demo(dir.path());

    bn(dir.path())
        .args(["optimize", "Demo.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied 1 fix(es)"))
        .stdout(predicate::str::contains("1 issue(s) remaining"))
        .stdout(predicate::str::contains("magic-number"));

    let optimized = fs::read_to_string(&file).unwrap();
    assert!(!optimized.contains("import java.util.List"));
    assert!(optimized.contains("class Demo"));
}

#[test]
fn inspect_numbers_issues() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["inspect", "Demo.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  1. "))
        .stdout(predicate::str::contains("unused-import"))
        .stdout(predicate::str::contains("magic-number"));
}

#[test]
fn log_shows_commits_after_optimize() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["optimize", "Demo.java"])
        .assert()
        .success();

    bn(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("unpublished"))
        .stdout(predicate::str::contains("java.util.List"));
}

#[test]
fn show_prints_current_source() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["inspect", "Demo.java"])
        .assert()
        .success();

    bn(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("class Demo"));
}

#[test]
fn whereis_locates_declarations() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["inspect", "Demo.java"])
        .assert()
        .success();

    bn(dir.path())
        .args(["whereis", "method", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("method 'check' at Demo.java:"));

    bn(dir.path())
        .args(["whereis", "method", "missing"])
        .assert()
        .failure()
        .code(100)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn rm_removes_all_issues_of_a_kind() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("Imports.java");
    fs::write(
        &file,
        "import java.util.List;\nimport java.util.Map;\nclass Imports { }\n",
    )
    .unwrap();

    bn(dir.path())
        .args(["inspect", "Imports.java"])
        .assert()
        .success();

    bn(dir.path())
        .args(["rm", "unused-import"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 2 'unused-import'"));

    let cleaned = fs::read_to_string(&file).unwrap();
    assert!(!cleaned.contains("import"));
}

#[test]
fn rm_of_magic_numbers_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["inspect", "Demo.java"])
        .assert()
        .success();

    bn(dir.path())
        .args(["rm", "magic-number"])
        .assert()
        .failure()
        .code(100)
        .stderr(predicate::str::contains("no safe removal fix"));
}

#[test]
fn commands_without_a_session_exit_100() {
    let dir = tempfile::tempdir().unwrap();

    for command in ["log", "show", "reset", "publish"] {
        bn(dir.path())
            .arg(command)
            .assert()
            .failure()
            .code(100)
            .stderr(predicate::str::contains("no active session"));
    }
}

#[test]
fn publish_without_remote_exits_100() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["optimize", "Demo.java"])
        .assert()
        .success();

    bn(dir.path())
        .arg("publish")
        .assert()
        .failure()
        .code(100)
        .stderr(predicate::str::contains("no remote repository is configured"));
}

#[test]
fn publish_delivers_to_configured_remote() {
    let dir = tempfile::tempdir().unwrap();
    let remote_dir = dir.path().join("remote");
    fs::create_dir_all(dir.path().join(".burnish")).unwrap();
    fs::write(
        dir.path().join(".burnish/config.toml"),
        format!("[remote]\npath = \"{}\"\n", remote_dir.display()),
    )
    .unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["optimize", "Demo.java"])
        .assert()
        .success();

    bn(dir.path())
        .arg("publish")
        .assert()
        .success()
        .stdout(predicate::str::contains("published 1 of 1 commit(s)"));

    let stored: Vec<_> = fs::read_dir(&remote_dir).unwrap().collect();
    assert_eq!(stored.len(), 1);

    // Re-publishing is idempotent: the remote still holds one commit.
    bn(dir.path())
        .arg("publish")
        .assert()
        .success();
    let stored: Vec<_> = fs::read_dir(&remote_dir).unwrap().collect();
    assert_eq!(stored.len(), 1);

    // And the log now shows the commit as published.
    bn(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("[published]"));
}

#[test]
fn reset_reports_kept_commits() {
    let dir = tempfile::tempdir().unwrap();
    write_demo(dir.path());

    bn(dir.path())
        .args(["optimize", "Demo.java"])
        .assert()
        .success();

    // The cursor sits at the tip, so reset is a no-op that keeps the log.
    bn(dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("history re-rooted"));
}
