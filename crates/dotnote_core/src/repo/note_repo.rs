//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes and read them back with their joined category summary.
//! - Own the batch delete used by selection mode.
//!
//! # Invariants
//! - `created_at` is written once by `insert_note` and never updated.
//! - `delete_notes` removes all requested rows in one transaction.
//! - Note list order is `created_at DESC, id ASC`.

use crate::model::category::CategoryRef;
use crate::model::note::{Importance, Note, NoteDraft, NoteId};
use crate::repo::{bool_from_db, ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    n.id,
    n.title,
    n.content,
    n.importance,
    n.created_at,
    c.id AS category_id,
    c.name AS category_name,
    c.color AS category_color,
    c.is_default AS category_is_default
FROM notes n
LEFT JOIN categories c ON c.id = n.category_id";

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts a fully built note, including its id and timestamp.
    fn insert_note(&self, note: &Note) -> RepoResult<()>;
    /// Replaces editable fields of an existing note.
    ///
    /// Expects a normalized draft; leaves `created_at` untouched.
    fn update_note(&self, id: &str, draft: &NoteDraft) -> RepoResult<()>;
    fn get_note(&self, id: &str) -> RepoResult<Option<Note>>;
    /// Lists every note, newest first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Deletes all given notes atomically and returns the number removed.
    ///
    /// Unknown ids are skipped.
    fn delete_notes(&self, ids: &[NoteId]) -> RepoResult<usize>;
    /// Resolves the category summary a draft refers to.
    fn find_category(&self, id: &str) -> RepoResult<Option<CategoryRef>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["notes", "categories"])?;
        Ok(Self { conn })
    }

    fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<()> {
        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO notes (id, title, content, importance, created_at, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note.id.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.importance.value(),
                note.created_at,
                note.category_id(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn update_note(&self, id: &str, draft: &NoteDraft) -> RepoResult<()> {
        let tx = self.write_tx()?;
        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                importance = ?4,
                category_id = ?5
             WHERE id = ?1;",
            params![
                id,
                draft.title.as_str(),
                draft.content.as_str(),
                draft.importance.value(),
                draft.category_id.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE n.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY n.created_at DESC, n.id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_notes(&self, ids: &[NoteId]) -> RepoResult<usize> {
        let tx = self.write_tx()?;
        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM notes WHERE id = ?1;")?;
            for id in ids {
                deleted += stmt.execute([id.as_str()])?;
            }
        }
        tx.commit()?;
        Ok(deleted)
    }

    fn find_category(&self, id: &str) -> RepoResult<Option<CategoryRef>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, color, is_default FROM categories WHERE id = ?1;",
                [id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, name, color, is_default)) => Ok(Some(CategoryRef {
                id,
                name,
                color,
                is_default: bool_from_db(is_default, "categories.is_default")?,
            })),
            None => Ok(None),
        }
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id: String = row.get("id")?;
    let raw_importance: i64 = row.get("importance")?;
    let importance = Importance::try_from(raw_importance).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid importance `{raw_importance}` in notes.importance for {id}"
        ))
    })?;

    let category = match row.get::<_, Option<String>>("category_id")? {
        Some(category_id) => Some(CategoryRef {
            id: category_id,
            name: row.get("category_name")?,
            color: row.get("category_color")?,
            is_default: bool_from_db(
                row.get("category_is_default")?,
                "categories.is_default",
            )?,
        }),
        None => None,
    };

    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        importance,
        created_at: row.get("created_at")?,
        category,
    })
}
