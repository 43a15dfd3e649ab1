//! First-run seeding of default categories.

use super::DbResult;
use crate::model::category::DEFAULT_CATEGORIES;
use crate::model::now_epoch_ms;
use log::info;
use rusqlite::{params, Connection, TransactionBehavior};

/// Inserts the default categories when the `categories` table is empty.
///
/// Returns the number of inserted rows (`0` when any category already
/// exists, including user-created ones).
pub fn seed_default_categories(conn: &mut Connection) -> DbResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let has_any: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories);",
        [],
        |row| row.get(0),
    )?;
    if has_any == 1 {
        return Ok(0);
    }

    let created_at = now_epoch_ms();
    for seed in &DEFAULT_CATEGORIES {
        let category = seed.to_category(created_at);
        tx.execute(
            "INSERT INTO categories (id, name, color, is_default, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                category.id,
                category.name,
                category.color,
                category.is_default,
                category.created_at
            ],
        )?;
    }
    tx.commit()?;

    info!(
        "event=db_seed module=db status=ok inserted={}",
        DEFAULT_CATEGORIES.len()
    );
    Ok(DEFAULT_CATEGORIES.len())
}
