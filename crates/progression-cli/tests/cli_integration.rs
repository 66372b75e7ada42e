//! Binary-level tests for progression-train and progression-serve.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn train_cmd() -> Command {
    Command::cargo_bin("progression-train").unwrap()
}

#[test]
fn test_train_writes_both_artifacts() {
    let dir = TempDir::new().unwrap();
    train_cmd()
        .args(["--out_dir"])
        .arg(dir.path())
        .args(["--kind", "linear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved model and metrics to:"))
        .stdout(predicate::str::contains(
            "\"model_name\": \"StandardScaler+LinearRegression\"",
        ));

    assert!(dir.path().join("model.pkl").is_file());
    let metrics: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("metrics.json")).unwrap()).unwrap();
    assert_eq!(metrics["seed"], 42);
    assert_eq!(metrics["n_train"], 353);
    assert_eq!(metrics["n_test"], 89);
}

#[test]
fn test_train_accepts_kebab_out_dir() {
    let dir = TempDir::new().unwrap();
    train_cmd()
        .arg("--out-dir")
        .arg(dir.path())
        .args(["--kind", "ridge"])
        .assert()
        .success();
    assert!(dir.path().join("metrics.json").is_file());
}

#[test]
fn test_train_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("artifacts");
    train_cmd()
        .arg("--out_dir")
        .arg(&out)
        .args(["--kind", "svm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported kind 'svm'"));
    assert!(!out.exists());
}

#[test]
fn test_serve_without_model_fails_fast() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("progression-serve")
        .unwrap()
        .env("MODEL_DIR", dir.path())
        .args(["--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("model artifact not found"));
}

#[test]
fn test_serve_help_mentions_model_dir() {
    Command::cargo_bin("progression-serve")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--model-dir"))
        .stdout(predicate::str::contains("MODEL_DIR"));
}
