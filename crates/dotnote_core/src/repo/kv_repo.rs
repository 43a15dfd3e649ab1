//! String key-value store backed by the `kv_store` table.
//!
//! Holds small device-local preferences such as the user profile. Values are
//! opaque strings; callers own their encoding.

use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

pub trait KeyValueStore {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or replaces the value stored under `key`.
    fn put_value(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Returns whether a value was removed.
    fn remove_value(&self, key: &str) -> RepoResult<bool>;

    fn contains_key(&self, key: &str) -> RepoResult<bool> {
        Ok(self.get_value(key)?.is_some())
    }
}

pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["kv_store"])?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_value(&self, key: &str, value: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}
