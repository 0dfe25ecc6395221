//! End-to-end runs of the `tastetree` binary against small data files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

const ITEMS: &str = "url, timedelta, n_images, is_weekend, n_links
http://news.example/1, 700.0, 9.0, 1.0, 2.0
http://news.example/2, 700.0, 8.0, 1.0, 9.0
http://news.example/3, 700.0, 1.0, 0.0, 2.0
http://news.example/4, 700.0, 2.0, 0.0, 8.0
http://news.example/5, 700.0, 7.0, 1.0, 1.0
http://news.example/6, 700.0, 9.0, 0.0, 1.0
http://news.example/7, 700.0, 1.0, 1.0, 1.0
";

const USERS: &str = "# id liked disliked
1 2 1
http://news.example/1
http://news.example/2
http://news.example/3

2 0 0
";

fn write_fixture(name: &str) -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("tastetree_cli_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("Failed to create fixture dir {dir:?}: {e}"));
    let items = dir.join("items.csv");
    let users = dir.join("users.txt");
    fs::write(&items, ITEMS).unwrap_or_else(|e| panic!("Failed to write items: {e}"));
    fs::write(&users, USERS).unwrap_or_else(|e| panic!("Failed to write users: {e}"));
    (items, users)
}

fn tastetree() -> Command {
    Command::cargo_bin("tastetree").unwrap_or_else(|e| panic!("binary missing: {e}"))
}

#[test]
fn recommend_prints_a_section_per_user() {
    let (items, users) = write_fixture("text");
    tastetree()
        .args(["recommend", "--seed", "11", "--items"])
        .arg(&items)
        .arg("--users")
        .arg(&users)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("The system recommends the following items to user 1:")
                .and(predicate::str::contains(
                    "The system recommends the following items to user 2:",
                )),
        )
        // Rated items never come back.
        .stdout(predicate::str::contains("http://news.example/1\n").not())
        .stdout(predicate::str::contains("http://news.example/3\n").not());
}

#[test]
fn recommend_json_report_respects_the_limit() {
    let (items, users) = write_fixture("json");
    let output = tastetree()
        .args(["recommend", "--seed", "5", "--limit", "1", "--format", "json", "--dump-trees"])
        .arg("--items")
        .arg(&items)
        .arg("--users")
        .arg(&users)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output)
        .unwrap_or_else(|e| panic!("report is not JSON: {e}"));
    assert_eq!(report["limit"], 1);
    assert_eq!(report["seed"], 5);
    let recommendations = report["recommendations"]
        .as_array()
        .unwrap_or_else(|| panic!("recommendations missing: {report}"));
    assert_eq!(recommendations.len(), 2);
    for entry in recommendations {
        let picked = entry["items"].as_array().map_or(0, Vec::len);
        assert!(picked <= 1, "limit exceeded: {entry}");
    }
    // User 2 has no feedback and is never shown anything.
    assert_eq!(recommendations[1]["items"], serde_json::json!([]));
    assert_eq!(report["trees"][0]["likes"], 2);
    assert!(report["ts"].as_str().is_some_and(|ts| !ts.is_empty()));
}

#[test]
fn dump_trees_prints_every_tree() {
    let (items, users) = write_fixture("dump");
    tastetree()
        .args(["recommend", "--seed", "1", "--dump-trees", "--items"])
        .arg(&items)
        .arg("--users")
        .arg(&users)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("User 1 decision tree:")
                .and(predicate::str::contains("User 2 decision tree:"))
                .and(predicate::str::contains("<empty>")),
        );
}

#[test]
fn audience_lists_interested_users() {
    let (items, users) = write_fixture("audience");
    tastetree()
        .args(["audience", "--key", "http://news.example/5", "--items"])
        .arg(&items)
        .arg("--users")
        .arg(&users)
        .assert()
        .success()
        .stdout(predicate::str::contains("User 1").and(predicate::str::contains("User 2").not()));
}

#[test]
fn audience_rejects_unknown_keys() {
    let (items, users) = write_fixture("unknown");
    tastetree()
        .args(["audience", "--key", "http://news.example/404", "--items"])
        .arg(&items)
        .arg("--users")
        .arg(&users)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown item key"));
}

#[test]
fn keys_writes_one_key_per_line() {
    let (items, _) = write_fixture("keys");
    let out = items.with_file_name("keys.txt");
    tastetree()
        .args(["keys", "--items"])
        .arg(&items)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 7 keys"));

    let written = fs::read_to_string(&out).unwrap_or_else(|e| panic!("keys missing: {e}"));
    assert_eq!(written.lines().count(), 7);
    assert_eq!(written.lines().next(), Some("http://news.example/1"));
}

#[test]
fn missing_user_file_fails_with_context() {
    let (items, users) = write_fixture("missing");
    let missing = users.with_file_name("nobody.txt");
    tastetree()
        .args(["recommend", "--items"])
        .arg(&items)
        .arg("--users")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open user file"));
}
