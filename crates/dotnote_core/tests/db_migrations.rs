use dotnote_core::db::migrations::{apply_migrations_up_to, latest_version};
use dotnote_core::db::{open_db, open_db_in_memory, DbError};
use dotnote_core::DEFAULT_CATEGORIES;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "notes");
    assert_table_exists(&conn, "categories");
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn first_open_seeds_default_categories() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(category_count(&conn), DEFAULT_CATEGORIES.len() as i64);

    let defaults: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM categories WHERE is_default = 1;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(defaults, 5);
}

#[test]
fn opening_same_database_twice_seeds_only_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dotnote.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(category_count(&conn_first), 5);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(category_count(&conn_second), 5);
}

#[test]
fn note_only_database_is_upgraded_and_keeps_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let mut legacy = Connection::open(&path).unwrap();
    apply_migrations_up_to(&mut legacy, 1).unwrap();
    assert_eq!(schema_version(&legacy), 1);
    legacy
        .execute(
            "INSERT INTO notes (id, title, content, importance, created_at)
             VALUES ('1700000000000', 'Old note', '', 2, 1700000000000);",
            [],
        )
        .unwrap();
    drop(legacy);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(category_count(&conn), 5);
    let category: Option<String> = conn
        .query_row(
            "SELECT category_id FROM notes WHERE id = '1700000000000';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(category.is_none());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn category_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
