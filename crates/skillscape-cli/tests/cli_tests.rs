//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skillscape() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("skillscape").unwrap();
    for var in [
        "SKILLSCAPE_GEMINI_KEY",
        "GOOGLE_API_KEY",
        "SKILLSCAPE_ANTHROPIC_KEY",
        "SKILLSCAPE_OPENAI_KEY",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// A temp dir that doubles as `$HOME`, so no user config leaks in.
fn sandbox() -> (TempDir, Command) {
    let dir = TempDir::new().unwrap();
    let mut cmd = skillscape();
    cmd.current_dir(dir.path()).env("HOME", dir.path());
    (dir, cmd)
}

#[test]
fn help_output() {
    skillscape()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Find out what you already know before you study something",
        ))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("summarize"));
}

#[test]
fn version_output() {
    skillscape()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillscape"));
}

#[test]
fn init_creates_config() {
    let (dir, mut cmd) = sandbox();

    cmd.arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skillscape.toml"));

    let written = std::fs::read_to_string(dir.path().join("skillscape.toml")).unwrap();
    assert!(written.contains("[providers.gemini]"));
}

#[test]
fn init_skips_existing() {
    let (dir, mut cmd) = sandbox();
    std::fs::write(dir.path().join("skillscape.toml"), "# mine\n").unwrap();

    cmd.arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let kept = std::fs::read_to_string(dir.path().join("skillscape.toml")).unwrap();
    assert_eq!(kept, "# mine\n");
}

#[test]
fn assess_missing_content_file() {
    let (_dir, mut cmd) = sandbox();
    cmd.args(["assess", "--content", "nope.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read content file"));
}

#[test]
fn assess_without_provider_config() {
    let (dir, mut cmd) = sandbox();
    std::fs::write(dir.path().join("notes.md"), "Ownership in Rust").unwrap();

    cmd.args(["assess", "--content", "notes.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'gemini' is not configured"));
}

#[test]
fn summarize_rejects_unknown_audience() {
    let (dir, mut cmd) = sandbox();
    std::fs::write(dir.path().join("notes.md"), "Ownership in Rust").unwrap();

    cmd.args(["summarize", "--content", "notes.md", "--audience", "martians"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown audience"));
}

#[test]
fn explicit_config_must_exist() {
    let (dir, mut cmd) = sandbox();
    std::fs::write(dir.path().join("notes.md"), "Ownership in Rust").unwrap();

    cmd.args(["organize", "--content", "notes.md", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn list_models_for_configured_providers() {
    let (dir, mut cmd) = sandbox();
    std::fs::write(
        dir.path().join("skillscape.toml"),
        r#"
[providers.gemini]
type = "gemini"
api_key = "test-key"

[providers.local]
type = "openai"
base_url = "http://localhost:11434"
"#,
    )
    .unwrap();

    cmd.arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: gemini"))
        .stdout(predicate::str::contains("gemini-2.5-flash: Gemini 2.5 Flash"))
        .stdout(predicate::str::contains("[default]"))
        .stdout(predicate::str::contains("Provider: local"));
}

#[test]
fn list_models_without_config() {
    let (_dir, mut cmd) = sandbox();
    cmd.arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}
