//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist user categories and list all categories for the picker.
//! - Delete a category and detach its notes in the same transaction.
//!
//! # Invariants
//! - Listing order is defaults first, then name (case-insensitive).
//! - No note references a deleted category after `delete_category` commits.

use crate::model::category::{Category, CategoryId};
use crate::repo::{bool_from_db, ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    color,
    is_default,
    created_at
FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    fn insert_category(&self, category: &Category) -> RepoResult<()>;
    fn get_category(&self, id: &str) -> RepoResult<Option<Category>>;
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Counts notes currently referencing the category.
    fn count_notes_in_category(&self, id: &str) -> RepoResult<usize>;
    /// Clears `category_id` on referencing notes, then deletes the category.
    ///
    /// Returns the number of detached notes.
    fn delete_category(&self, id: &str) -> RepoResult<usize>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["notes", "categories"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn insert_category(&self, category: &Category) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO categories (id, name, color, is_default, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                category.id.as_str(),
                category.name.as_str(),
                category.color.as_str(),
                category.is_default,
                category.created_at,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_category(&self, id: &str) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_category_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY is_default DESC, name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn count_notes_in_category(&self, id: &str) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE category_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }

    fn delete_category(&self, id: &str) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let detached = tx.execute(
            "UPDATE notes SET category_id = NULL WHERE category_id = ?1;",
            [id],
        )?;
        let deleted = tx.execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        tx.commit()?;
        Ok(detached)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id: CategoryId = row.get("id")?;
    Ok(Category {
        id,
        name: row.get("name")?,
        color: row.get("color")?,
        is_default: bool_from_db(row.get("is_default")?, "categories.is_default")?,
        created_at: row.get("created_at")?,
    })
}
