//! Integration tests for the lamina CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn lamina() -> Command {
    Command::cargo_bin("lamina").unwrap()
}

#[test]
fn show_prints_merged_view() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("application.properties"), "x=base\ny=2\n").unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("x=base"))
        .stdout(predicate::str::contains("y=2"));
}

#[test]
fn show_json_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("application.yaml"), "server:\n  port: 8080\n").unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .args(["show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"server.port\":\"8080\""));
}

#[test]
fn set_override_wins_over_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("application.properties"), "x=file\n").unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .args(["--set", "x=cli"])
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("x=cli"));
}

#[test]
fn profiles_reports_activation() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("application.properties"), "x=base\n").unwrap();
    fs::write(dir.path().join("application-prod.properties"), "x=prod\n").unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .args(["--set", "profiles.active=prod"])
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"));
}

#[test]
fn contributors_prints_ordered_selection() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("registrations"),
        "lamina.contributors=web,jdbc\n",
    )
    .unwrap();
    fs::write(dir.path().join("metadata"), "web.after=jdbc\n").unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .args(["--registry", dir.path().join("registrations").to_str().unwrap()])
        .args(["--metadata", dir.path().join("metadata").to_str().unwrap()])
        .arg("contributors")
        .assert()
        .success()
        .stdout("jdbc\nweb\n");
}

#[test]
fn contributors_requires_registry() {
    let dir = TempDir::new().unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .arg("contributors")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("--registry"));
}

#[test]
fn invalid_exclusion_maps_to_selection_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("registrations"),
        "lamina.contributors=web\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("application.properties"),
        "autoconfigure.exclude=ghost\n",
    )
    .unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .args(["--registry", dir.path().join("registrations").to_str().unwrap()])
        .arg("contributors")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn malformed_set_is_invalid_arguments() {
    lamina()
        .args(["--set", "missing-separator"])
        .arg("show")
        .assert()
        .failure()
        .code(4);
}

#[test]
fn broken_config_maps_to_load_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("application.yaml"), "x: [broken\n").unwrap();

    lamina()
        .args(["--config-dir", dir.path().to_str().unwrap()])
        .args(["--working-dir", dir.path().to_str().unwrap()])
        .arg("show")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("application.yaml"));
}
