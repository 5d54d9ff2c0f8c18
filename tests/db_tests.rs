//! Database setup tests
//!
//! Run with: cargo test --test db_tests

mod common;

use blogpad::cli::commands::init_db_with;
use blogpad::db::{Database, RequestDb};
use common::{seed, test_config};

#[test]
fn test_request_db_reuses_and_closes_connection() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&dir);
    seed(&config);

    let db = RequestDb::new(Database::new(config.database_path()));
    let first = db
        .with(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM user", [], |row| row.get::<_, i64>(0))?))
        .expect("Query failed");
    assert_eq!(first, 2);
    assert!(db.is_open());

    db.close();
    assert!(!db.is_open());
}

#[test]
fn test_init_db_resets_seeded_data() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&dir);
    seed(&config);

    let mut out = Vec::new();
    init_db_with(&config, &mut out).expect("init-db failed");

    let conn = Database::new(config.database_path())
        .connect()
        .expect("Failed to connect");
    let posts: i64 = conn
        .query_row("SELECT COUNT(*) FROM post", [], |row| row.get(0))
        .expect("Failed to count posts");
    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
        .expect("Failed to count users");
    assert_eq!((posts, users), (0, 0));

    let out = String::from_utf8(out).expect("Output is not UTF-8");
    assert!(out.contains("Initialized the database."));
    assert_eq!(out.trim_end().lines().count(), 1);
}
