//
//  bitbucket-v1
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `bbv1` with its config file in a scratch directory and the
/// keyring bypassed through `BBV1_TOKEN`.
fn bbv1(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bbv1").unwrap();
    cmd.env("BBV1_CONFIG", config_dir.path().join("config.toml"))
        .env("BBV1_TOKEN", "test-token")
        .env("NO_COLOR", "1")
        .env_remove("BBV1_REPO")
        .env_remove("BBV1_USERNAME")
        .env_remove("BBV1_PASSWORD")
        .env_remove("BBV1_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    bbv1(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("issue"))
        .stdout(predicate::str::contains("comment"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    bbv1(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bbv1 version"));
}

#[test]
fn test_issue_list_without_repo_fails() {
    let dir = TempDir::new().unwrap();
    bbv1(&dir)
        .args(["issue", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No repository specified"));
}

#[test]
fn test_invalid_repo_format() {
    let dir = TempDir::new().unwrap();
    bbv1(&dir)
        .args(["--repo", "tools", "issue", "view", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Expected OWNER/REPO"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    bbv1(&dir)
        .args(["config", "set", "owner", "team"])
        .assert()
        .success();
    bbv1(&dir)
        .args(["config", "get", "owner"])
        .assert()
        .success()
        .stdout("team\n");
    bbv1(&dir)
        .args(["config", "set", "cache", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for cache"));
}

#[test]
fn test_issue_view_json_against_mock_server() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/7")
        .match_header("authorization", "Bearer test-token")
        .with_body(r#"{"local_id": 7, "title": "Crash on save", "status": "new", "priority": "major"}"#)
        .create();

    bbv1(&dir)
        .args(["config", "set", "base_url", &server.url()])
        .assert()
        .success();
    bbv1(&dir)
        .args(["--repo", "jdoe/tools", "--json", "issue", "view", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "Crash on save""#));

    mock.assert();
}

#[test]
fn test_not_found_exit_code() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/repositories/jdoe/tools/issues/99")
        .with_status(404)
        .create();

    bbv1(&dir)
        .args(["config", "set", "base_url", &server.url()])
        .assert()
        .success();
    bbv1(&dir)
        .args(["--repo", "jdoe/tools", "issue", "view", "99"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Resource not found"));
}

#[test]
fn test_login_without_prompt_needs_username() {
    let dir = TempDir::new().unwrap();
    bbv1(&dir)
        .args(["--no-prompt", "auth", "login"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("A username is required"));
}
