//! Integration tests for plugbuild clean actions
//!
//! All scenarios run with build actions disabled so only path preparation
//! touches the filesystem.

mod common;

use common::{stderr, TestProject};

#[test]
fn test_clean_packages_removes_build_output() {
    let project = TestProject::new();
    project.create_file("Build/com.apple.unityplugin.core-1.0.0.tgz", "tarball");

    let output = project.run(&["-b", "none", "-k", "packages", "-f"]);
    assert!(output.status.success());
    assert!(!project.exists("Build"));
}

#[test]
fn test_clean_packages_without_output_is_noop() {
    let project = TestProject::new();

    let output = project.run(&["-b", "none", "-k", "packages", "-f"]);
    assert!(output.status.success());
    assert!(!project.exists("Build"));
}

#[test]
fn test_clean_tests_removes_test_output_and_players() {
    let project = TestProject::new();
    project.create_file("TestBuilds/TestBuild_2026-01-01_00-00-00/old.bin", "stale");
    project.create_dir("plug-ins/Apple.Core/Apple.Core_Unity/TestPlayers");
    project.create_dir("plug-ins/Apple.GameKit");

    let output = project.run(&["-b", "none", "-k", "tests", "-f"]);
    assert!(output.status.success());
    assert!(!project.exists("TestBuilds"));
    assert!(!project.exists("plug-ins/Apple.Core/Apple.Core_Unity/TestPlayers"));
    // a plug-in without a Unity project is untouched
    assert!(project.exists("plug-ins/Apple.GameKit"));
}

#[test]
fn test_declined_prompt_skips_cleanup() {
    let project = TestProject::new();
    project.create_file("Build/stale.tgz", "tarball");

    // stdin is closed, so the confirmation prompt reads EOF and declines
    let output = project.run(&["-b", "none", "-k", "packages"]);
    assert!(output.status.success());
    assert!(project.exists("Build/stale.tgz"));
}

#[test]
fn test_unknown_clean_action_warns_and_defaults_to_none() {
    let project = TestProject::new();
    project.create_file("Build/stale.tgz", "tarball");

    let output = project.run(&["-b", "none", "-k", "everything"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Ignoring unknown clean action 'everything'"));
    assert!(project.exists("Build/stale.tgz"));
}
