//! End-to-end tests for the `hs` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use historystore::HistoryStore;
use predicates::prelude::*;
use tempfile::TempDir;

fn setup(temp: &Path) -> (PathBuf, HistoryStore) {
    let store_path = temp.join("store");
    let config = temp.join("hs.yml");
    fs::write(&config, format!("store-path: {}\n", store_path.display())).unwrap();
    (config, HistoryStore::open(&store_path).unwrap())
}

fn hs(temp: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hs").expect("hs binary");
    cmd.current_dir(temp).env("NO_COLOR", "1").arg("--config").arg(config);
    cmd
}

#[test]
fn test_list_empty() {
    let temp = TempDir::new().unwrap();
    let (config, _store) = setup(temp.path());

    hs(temp.path(), &config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No histories found"));
}

#[test]
fn test_show_stats_delete() {
    let temp = TempDir::new().unwrap();
    let (config, store) = setup(temp.path());
    for n in 1..=3 {
        store.append("42", serde_json::json!({ "n": n }), 5).unwrap();
    }

    hs(temp.path(), &config)
        .args(["show", "42", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"n\":3}"))
        .stdout(predicate::str::contains("{\"n\":1}").not());

    hs(temp.path(), &config)
        .args(["stats", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records: 3"));

    hs(temp.path(), &config)
        .args(["delete", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted history: 42"));

    hs(temp.path(), &config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No histories found"));
}

#[test]
fn test_invalid_key_fails() {
    let temp = TempDir::new().unwrap();
    let (config, _store) = setup(temp.path());

    hs(temp.path(), &config)
        .args(["show", "../etc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid key"));
}
