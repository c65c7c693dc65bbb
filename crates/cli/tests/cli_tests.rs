//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("linkmark");
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("linkmark-cli-tests-no-config"));
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_file_input() {
    cmd()
        .args(["--offline", &get_fixture_path("post.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"class="link-mention""#))
        .stdout(predicate::str::contains("GitHub — acme/widget"))
        .stdout(predicate::str::contains("X post by @alice"));
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("post.html")).unwrap();
    cmd()
        .args(["--offline", "-"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"class="embed-frame""#));
}

#[test]
fn test_cli_algorithm_markup() {
    cmd()
        .args(["--offline", &get_fixture_path("post.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<div class="algorithm-title">Algorithm Insertion Sort</div>"#))
        .stdout(predicate::str::contains("algorithm-spacer"));
}

#[test]
fn test_cli_full_document() {
    cmd()
        .args(["--offline", &get_fixture_path("document.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("Fast Sorting (PDF)"));
}

#[test]
fn test_cli_json_format() {
    let output = cmd().args(["--offline", "-f", "json", &get_fixture_path("post.html")]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["mentions"], 2);
    assert_eq!(json["report"]["embeds"], 1);
    assert_eq!(json["report"]["algorithms"], 1);
    assert!(json["html"].as_str().unwrap().contains("link-mention"));

    let record = &json["metadata"]["https://github.com/acme/widget"];
    assert_eq!(record["host_label"], "GI");
    assert_eq!(record["derived_title"], "GitHub — acme/widget");
    assert!(record["title"].is_null());
}

#[test]
fn test_cli_disable_kinds() {
    cmd()
        .args(["--offline", "--no-mentions", "--no-embeds", "--no-algorithms", &get_fixture_path("post.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("link-mention").not())
        .stdout(predicate::str::contains("embed-frame").not())
        .stdout(predicate::str::contains(r#"class="algorithm""#).not());
}

#[test]
fn test_cli_config_file() {
    cmd()
        .args(["--offline", "--config", &get_fixture_path("config.json"), &get_fixture_path("post.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("embed-frame").not())
        .stdout(predicate::str::contains("link-mention"));
}

#[test]
fn test_cli_missing_config_file() {
    cmd()
        .args(["--offline", "--config", "nonexistent.json", &get_fixture_path("post.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_cli_zero_timeout_rejected() {
    cmd()
        .args(["--offline", "--timeout", "0", &get_fixture_path("post.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("output.html");

    cmd()
        .args(["--offline", "-o", output.to_str().unwrap()])
        .arg(get_fixture_path("post.html"))
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("link-mention"));
}

#[test]
fn test_cli_invalid_file() {
    cmd().args(["--offline", "nonexistent.html"]).assert().failure();
}

#[test]
fn test_cli_invalid_format() {
    cmd().args(["--offline", "-f", "markdown", &get_fixture_path("post.html")]).assert().failure();
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["--offline", "-v", &get_fixture_path("post.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("linkmark"))
        .stderr(predicate::str::contains("Transform Summary"));
}

#[test]
fn test_cli_idempotent() {
    let first = cmd().args(["--offline", &get_fixture_path("post.html")]).output().unwrap();
    assert!(first.status.success());

    let second = cmd().args(["--offline", "-"]).write_stdin(first.stdout.clone()).output().unwrap();
    assert!(second.status.success());
    assert_eq!(
        String::from_utf8_lossy(&second.stdout).matches("link-mention__title").count(),
        String::from_utf8_lossy(&first.stdout).matches("link-mention__title").count()
    );
}
