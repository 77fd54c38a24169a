#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rdbhelper::db::{ConnectOptions, Database};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rdb() -> Command {
    cargo_bin_cmd!("rdbhelper")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rdbhelper.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh database file with a `users` table and two rows.
pub fn users_db(name: &str) -> (String, Database) {
    let path = setup_test_db(name);
    let db = Database::connect(ConnectOptions::new(&path).create_if_missing(true))
        .expect("open test db");

    db.execute_batch(
        "CREATE TABLE users (
             id INTEGER PRIMARY KEY,
             name TEXT NOT NULL UNIQUE,
             age INTEGER,
             score REAL
         );
         INSERT INTO users (name, age) VALUES ('Bob', 40);
         INSERT INTO users (name, age) VALUES ('Carol', 25);",
    )
    .expect("create users table");

    (path, db)
}

/// Initialize a DB file through the CLI and create the `users` table.
pub fn init_cli_db(name: &str) -> String {
    let path = setup_test_db(name);

    rdb()
        .args(["--db", &path, "--test", "init"])
        .assert()
        .success();

    rdb()
        .args([
            "--db",
            &path,
            "--test",
            "exec",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);",
        ])
        .assert()
        .success();

    path
}
