//! End-to-end tests for the `walk` command
//!
//! These tests invoke the actual CLI binary and validate its behavior
//! from a user's perspective.

mod common;
use common::prelude::*;

use std::fs;

fn nested_fixture() -> TestFixture {
    TestFixture::new()
        .with_file("project.json", r#"{"code": "root", "name": "Root"}"#)
        .with_file(
            "api/component.json",
            r#"{"code": "api", "name": "API", "tier": 1}"#,
        )
        .with_file(
            "api/lib/component.json",
            r#"{"code": "lib", "name": "Lib", "tier": 2}"#,
        )
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_walk_help() {
    let mut cmd = cargo_bin_cmd!("repoweave");

    cmd.arg("walk")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Embed nested manifests into each ancestor's components list",
        ));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_walk_embeds_descendants() {
    let fixture = nested_fixture();

    fixture
        .command()
        .arg("walk")
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest(s) updated"));

    let root_json = fs::read_to_string(fixture.path().join("project.json")).unwrap();
    let root: serde_json::Value = serde_json::from_str(&root_json).unwrap();
    let components = root["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["code"], "api");
    assert_eq!(components[0]["__file"], "api/component.json");
    assert_eq!(components[1]["__file"], "api/lib/component.json");

    // The api document carries its own nested entry.
    let nested = components[0]["components"].as_array().unwrap();
    assert_eq!(nested[0]["code"], "lib");
    assert_eq!(nested[0]["__file"], "lib/component.json");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_walk_twice_is_idempotent() {
    let fixture = nested_fixture();

    fixture.command().arg("walk").assert().success();
    let first = fs::read_to_string(fixture.path().join("project.json")).unwrap();

    fixture.command().arg("walk").assert().success();
    let second = fs::read_to_string(fixture.path().join("project.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_walk_reports_invalid_containment_and_exits_zero() {
    let fixture = TestFixture::new()
        .with_file("api/component.json", r#"{"code": "api"}"#)
        .with_file("api/app/project.json", r#"{"code": "app"}"#);

    // Per-directory validation failures are reported, not fatal.
    fixture
        .command()
        .arg("walk")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping due to validation"));

    // The offending component manifest was not rewritten.
    let api_json = fs::read_to_string(fixture.path().join("api/component.json")).unwrap();
    assert!(!api_json.contains("components"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_walk_honors_gitignore() {
    let fixture = TestFixture::new()
        .with_gitignore("vendor/\n")
        .with_file("api/component.json", r#"{"code": "api"}"#)
        .with_file("vendor/dep/component.json", r#"{"code": "dep"}"#);

    fixture.command().arg("walk").assert().success();

    // The ignored manifest was never processed.
    let dep_json = fs::read_to_string(fixture.path().join("vendor/dep/component.json")).unwrap();
    assert!(!dep_json.contains("components"));
    let api_json = fs::read_to_string(fixture.path().join("api/component.json")).unwrap();
    assert!(api_json.contains("components"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_walk_ambiguous_directory_is_fatal() {
    let fixture = TestFixture::new()
        .with_file("api/component.json", "{}")
        .with_file("api/project.json", "{}");

    fixture
        .command()
        .arg("walk")
        .assert()
        .failure()
        .stderr(predicate::str::contains("both"));
}
