use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
[environments.test]
url = "http://127.0.0.1:9"
deploy = "http://127.0.0.1:9/deploy"
timeout_secs = 2

[organizations.acme]
id = 42
name = "acme"
owner_email = "ops@acme.test"
"#;

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

fn deployer() -> Command {
    let mut cmd = Command::cargo_bin("deployer").unwrap();
    cmd.env_remove("DEPLOYER_ENV")
        .env_remove("DEPLOYER_ORG")
        .env_remove("DEPLOYER_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_version() {
    deployer()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("deployer version "));
}

#[test]
fn test_help_lists_commands() {
    deployer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("target"))
        .stdout(predicate::str::contains("wizard"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_unknown_method_is_usage_error() {
    let (_dir, path) = write_config(CONFIG);

    deployer()
        .args(["--config", path.to_str().unwrap(), "--env", "test"])
        .args(["api", "patch", "projects"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown request method: patch"));
}

#[test]
fn test_missing_environment_is_config_error() {
    let (_dir, path) = write_config(CONFIG);

    deployer()
        .args(["--config", path.to_str().unwrap(), "--env", "production"])
        .args(["project", "show", "shop"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Missing production block"));
}

#[test]
fn test_unknown_target_type_is_usage_error() {
    let (_dir, path) = write_config(CONFIG);

    deployer()
        .args(["--config", path.to_str().unwrap(), "--env", "test"])
        .args(["target", "options", "4", "--project", "shop", "--type", "heroku"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Incorrect target settings type: heroku"));
}

#[test]
fn test_completion_script() {
    deployer()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deployer"));
}
