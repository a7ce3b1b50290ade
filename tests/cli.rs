//
//  redmine-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use assert_cmd::Command;
use predicates::prelude::*;

/// A command isolated from the caller's environment and config file.
fn redmine(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("redmine").unwrap();
    cmd.env_remove("REDMINE_URL")
        .env_remove("REDMINE_API_KEY")
        .env_remove("REDMINE_TIMEOUT")
        .env("REDMINE_CONFIG", config_dir.path().join("config.toml"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn version_prints_name() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("redmine version "));
}

#[test]
fn missing_url_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .args(["issue", "view", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("REDMINE_URL"));
}

#[test]
fn missing_api_key_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .args(["meta", "trackers", "--url", "http://127.0.0.1:1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("REDMINE_API_KEY"));
}

#[test]
fn tools_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("get_issue"))
        .stdout(predicate::str::contains("download_attachment"));
}

#[test]
fn delete_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .args(["issue", "delete", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--confirm"));
}

#[test]
fn config_set_then_get_masks_key() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .args(["config", "set", "api_key", "abcdef123456"])
        .assert()
        .success();
    redmine(&dir)
        .args(["config", "get", "api_key"])
        .assert()
        .success()
        .stdout("********3456\n");
}

#[test]
fn serve_answers_bad_lines_without_network() {
    let dir = tempfile::tempdir().unwrap();
    redmine(&dir)
        .args(["serve", "--url", "http://127.0.0.1:1", "--api-key", "k"])
        .write_stdin("{\"id\": 1, \"tool\": \"nope\"}\nnot json\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""error":"Unknown tool: nope""#))
        .stdout(predicate::str::contains(r#""id":null"#));
}
