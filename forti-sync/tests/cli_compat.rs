use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn forti_sync() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("forti-sync"))
}

#[test]
fn compat_reports_supported_version() {
    forti_sync()
        .args(["compat", "--version", "7.0.1", "--rules", r#"{">=": ["6.2.0"]}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("version=7.0.1"))
        .stdout(predicate::str::contains("rules=>=[6.2.0]"))
        .stdout(predicate::str::contains("supported"));
}

#[test]
fn compat_strict_fails_for_unsupported_version() {
    forti_sync()
        .args([
            "compat",
            "--version",
            "6.0.0",
            "--rules",
            r#"{">=": ["6.2.0"]}"#,
            "--strict",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unsupported"))
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn compat_json_output_fails_closed_on_garbage_version() {
    let output = forti_sync()
        .args([
            "compat",
            "--version",
            "latest",
            "--rules",
            r#"{"<=": ["9.9.9"]}"#,
            "--format",
            "json",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(body["supported"], Value::Bool(false));
    assert_eq!(body["rules"]["<="][0], "9.9.9");
}

#[test]
fn compat_rejects_malformed_rules() {
    forti_sync()
        .args(["compat", "--version", "7.0.0", "--rules", "[1, 2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid rules JSON"));
}
