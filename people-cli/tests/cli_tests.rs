//! Integration tests for the People CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the people binary, isolated from any caller environment
#[allow(deprecated)]
fn people_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("people").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MONGO_URI")
        .env_remove("MONGO_DB")
        .env_remove("MONGO_COLLECTION")
        .env_remove("PEOPLE_LOG_LEVEL")
        .env_remove("PEOPLE_DEBUG");
    cmd
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("People CLI"))
        .stdout(predicate::str::contains("Usage: people"))
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("create-many"))
        .stdout(predicate::str::contains("delete-many"))
        .stdout(predicate::str::contains("query"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_query_help() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["query", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sort"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--select"));
}

#[test]
fn test_demo_in_memory() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--memory", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("People demo"))
        .stdout(predicate::str::contains("create_and_save_person"))
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("query_chain"))
        .stdout(predicate::str::contains("10 steps, 7 succeeded, 3 failed"))
        .stderr(predicate::str::contains("invalid object id"));
}

#[test]
fn test_demo_in_memory_with_inserted_id() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--memory", "demo", "--use-inserted-id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hamburger"))
        .stdout(predicate::str::contains("10 steps, 10 succeeded, 0 failed"));
}

#[test]
fn test_create_in_memory() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--memory", "create", "Dana", "--age", "41", "--food", "Soup,Tea"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Person saved"))
        .stdout(predicate::str::contains("\"favoriteFoods\""))
        .stdout(predicate::str::contains("Tea"));
}

#[test]
fn test_create_requires_name() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--memory", "create", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path `name` is required."));
}

#[test]
fn test_create_many_from_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("people.json");
    fs::write(
        &file,
        r#"[{"name": "Mary", "favoriteFoods": ["Curry"]}, {"name": "Mary", "age": 50}]"#,
    )
    .unwrap();

    people_cmd(&dir)
        .args(["--memory", "create-many", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("People added (2)"))
        .stdout(predicate::str::contains("Curry"));
}

#[test]
fn test_get_rejects_invalid_id() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--memory", "get", "example-id-here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid object id"));
}

#[test]
fn test_query_rejects_mixed_projection() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--memory", "query", "--select", "name -age"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot mix inclusion and exclusion"));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("people.toml"), "[database\n").unwrap();

    people_cmd(&dir)
        .args(["find", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_ping_unreachable_server() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--uri", "mongodb://127.0.0.1:1", "--timeout", "1", "ping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database connection error"));
}

#[test]
fn test_demo_continues_when_server_unreachable() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--uri", "mongodb://127.0.0.1:1", "--timeout", "1", "demo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Database connection error"))
        .stdout(predicate::str::contains("10 steps, 0 succeeded, 10 failed"));
}

#[test]
fn test_demo_continues_when_client_cannot_be_created() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--uri", "mongodb+srv://user:pw@nosuch-cluster.invalid/app", "--timeout", "1", "demo"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Database connection error"))
        .stdout(predicate::str::contains("10 steps, 0 succeeded, 10 failed"));
}

#[test]
fn test_find_fails_when_client_cannot_be_created() {
    let dir = TempDir::new().unwrap();
    people_cmd(&dir)
        .args(["--uri", "not-a-uri", "find", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse URI"));
}
