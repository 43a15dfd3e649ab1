//! Screen-level state for the mobile UI.
//!
//! # Responsibility
//! - Derive the visible note list from the stored notes.
//! - Drive selection mode, confirmation prompts and status messages.
//!
//! # Invariants
//! - View state is plain data; the UI renders it and forwards events.
//! - Writes always go through services; views never touch SQL.

pub mod category_picker;
pub mod form;
pub mod home;
pub mod list;
pub mod selection;
pub mod status;
