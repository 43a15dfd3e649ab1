//! Domain model for notes, categories and the local user profile.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the field-level validation rules shared by add and edit flows.
//!
//! # Invariants
//! - Every note and category is identified by a stable string id.
//! - Timestamps are Unix epoch milliseconds.

pub mod category;
pub mod note;
pub mod profile;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
