use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn quotekeeper(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quotekeeper").unwrap();
    cmd.env_remove("QUOTEKEEPER_LOG_DIR").arg("--db").arg(db);
    cmd
}

#[test]
fn fresh_database_lists_seed_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("quotes.sqlite3");

    quotekeeper(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Life is what happens when you're busy making other plans.\" - (Life)",
        ))
        .stdout(predicate::str::contains("(Motivation)").count(2));
}

#[test]
fn add_then_filter_by_category() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("quotes.sqlite3");

    quotekeeper(&db)
        .args(["add", "Stay curious", "Learning"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quote added successfully!"));

    quotekeeper(&db)
        .args(["filter", "Learning"])
        .assert()
        .success()
        .stdout("\"Stay curious\" - (Learning)\n");

    quotekeeper(&db)
        .arg("last")
        .assert()
        .success()
        .stdout("\"Stay curious\" - (Learning)\n");
}

#[test]
fn blank_add_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("quotes.sqlite3");

    quotekeeper(&db)
        .args(["add", "   ", "Learning"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please enter both a quote and a category!",
        ));
}

#[test]
fn unknown_category_filter_reports_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("quotes.sqlite3");

    quotekeeper(&db)
        .args(["filter", "Nowhere"])
        .assert()
        .success()
        .stdout("No quotes available in this category!\n");
}

#[test]
fn export_and_import_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let source_db = dir.path().join("source.sqlite3");
    let target_db = dir.path().join("target.sqlite3");
    let export_path = dir.path().join("quotes.json");

    quotekeeper(&source_db)
        .args(["add", "Stay curious", "Learning"])
        .assert()
        .success();
    quotekeeper(&source_db)
        .arg("export")
        .arg("--out")
        .arg(&export_path)
        .assert()
        .success();

    quotekeeper(&target_db)
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("+ \"Stay curious\" - (Learning)"));

    quotekeeper(&target_db)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Learning"));
}

#[test]
fn malformed_import_fails_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("quotes.sqlite3");
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();

    quotekeeper(&db)
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON format!"));
}
