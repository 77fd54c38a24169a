use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_cli_db, rdb, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rdb()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database ready"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_query_missing_database_fails() {
    let db_path = setup_test_db("cli_missing");

    rdb()
        .args(["--db", &db_path, "--test", "query", "SELECT 1"])
        .assert()
        .failure()
        .stderr(contains("Connection error"));
}

#[test]
fn test_insert_and_query_table() {
    let db_path = init_cli_db("cli_insert_query");

    rdb()
        .args(["--db", &db_path, "--test", "insert", "users", "name=Alice", "age=30"])
        .assert()
        .success()
        .stdout(contains("Inserted 1 row(s) into users"));

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "query",
            "SELECT name, age FROM users WHERE name='Alice'",
        ])
        .assert()
        .success()
        .stdout(contains("Alice"))
        .stdout(contains("30"))
        .stdout(contains("(1 row)"));
}

#[test]
fn test_query_json_output() {
    let db_path = init_cli_db("cli_query_json");

    rdb()
        .args(["--db", &db_path, "--test", "insert", "users", "name=Bob", "age=NULL"])
        .assert()
        .success();

    let out = rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "query",
            "SELECT name, age FROM users",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json, serde_json::json!([{ "name": "Bob", "age": null }]));
}

#[test]
fn test_query_csv_output() {
    let db_path = init_cli_db("cli_query_csv");

    rdb()
        .args(["--db", &db_path, "--test", "insert", "users", "name='Smith, J'", "age=41"])
        .assert()
        .success();

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "query",
            "SELECT name, age FROM users",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout("name,age\n\"Smith, J\",41\n");
}

#[test]
fn test_update_changes_only_matching_rows() {
    let db_path = init_cli_db("cli_update");

    for (name, age) in [("Alice", "30"), ("Bob", "40")] {
        rdb()
            .args([
                "--db",
                &db_path,
                "--test",
                "insert",
                "users",
                &format!("name={name}"),
                &format!("age={age}"),
            ])
            .assert()
            .success();
    }

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "update",
            "users",
            "age=31",
            "--where",
            "name='Alice'",
        ])
        .assert()
        .success()
        .stdout(contains("Updated 1 row(s) in users"));

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "query",
            "SELECT name || ':' || age AS v FROM users ORDER BY id",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout("v\nAlice:31\nBob:40\n");
}

#[test]
fn test_update_without_match_warns() {
    let db_path = init_cli_db("cli_update_nomatch");

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "update",
            "users",
            "age=1",
            "-w",
            "name='Nobody'",
        ])
        .assert()
        .success()
        .stdout(contains("No rows in users matched"));
}

#[test]
fn test_dry_run_prints_statement_without_touching_db() {
    let db_path = setup_test_db("cli_dry_run");

    // no database exists: a dry run must not need one
    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "insert",
            "users",
            "name=O'Brien",
            "age=30",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("INSERT INTO users (name, age) VALUES ('O''Brien', 30)"));

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "update",
            "users",
            "age=31",
            "--where",
            "id = 1",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("UPDATE users SET age = 31 WHERE id = 1"));

    assert!(!std::path::Path::new(&db_path).exists());
}

#[test]
fn test_syntax_error_reports_query_error() {
    let db_path = init_cli_db("cli_syntax");

    rdb()
        .args(["--db", &db_path, "--test", "query", "SELEKT * FROM users"])
        .assert()
        .failure()
        .stderr(contains("Query error").and(contains("SELEKT")));
}

#[test]
fn test_invalid_assignment_is_validation_error() {
    let db_path = init_cli_db("cli_bad_assignment");

    rdb()
        .args(["--db", &db_path, "--test", "insert", "users", "age"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));
}

#[test]
fn test_exec_script_file() {
    let db_path = init_cli_db("cli_exec_file");
    let script = setup_test_db("cli_exec_file_script");
    fs::write(
        &script,
        "INSERT INTO users (name, age) VALUES ('a', 1);\nINSERT INTO users (name, age) VALUES ('b', 2);\n",
    )
    .unwrap();

    rdb()
        .args(["--db", &db_path, "--test", "exec", "--file", &script])
        .assert()
        .success()
        .stdout(contains("Script executed"));

    rdb()
        .args([
            "--db",
            &db_path,
            "--test",
            "query",
            "SELECT count(*) AS n FROM users",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout("n\n2\n");
}

#[test]
fn test_ping_shows_session() {
    let db_path = init_cli_db("cli_ping");

    rdb()
        .args(["--db", &db_path, "--test", "ping"])
        .assert()
        .success()
        .stdout(contains("Connection OK"))
        .stdout(contains("UTF-8"))
        .stdout(contains("+08:00"));
}

#[test]
fn test_config_print() {
    let db_path = setup_test_db("cli_config_print");

    rdb()
        .args(["--db", &db_path, "--test", "config", "--print"])
        .assert()
        .success()
        .stdout(contains("database:"))
        .stdout(contains(db_path.as_str()))
        .stdout(contains("time_zone:").and(contains("08:00")));
}
