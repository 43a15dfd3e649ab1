//! Core domain logic for dotnote.
//! This crate is the single source of truth for note/category invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{
    Category, CategoryId, CategoryRef, CategoryValidationError, DefaultCategory,
    CATEGORY_PALETTE, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR,
};
pub use model::note::{Importance, Note, NoteDraft, NoteId, NoteValidationError};
pub use model::profile::{ProfileValidationError, UserProfile};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::kv_repo::{KeyValueStore, SqliteKvStore};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::{CategoryService, CategoryServiceError};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::profile_service::{ProfileService, ProfileServiceError, USER_KEY};
pub use view::category_picker::CategoryPicker;
pub use view::form::{FormOutcome, NoteForm};
pub use view::home::{deleted_notes_message, DeletePrompt, HomeScreen, DELETE_FAILURE_MESSAGE};
pub use view::list::{derive_note_list, NoteListView, SortMode};
pub use view::selection::{PressOutcome, Selection};
pub use view::status::{
    StatusKind, StatusMessage, GENERIC_FAILURE_MESSAGE, STATUS_AUTO_DISMISS,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
