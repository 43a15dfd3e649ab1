//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, screen-level functions to Dart via FRB.
//! - Translate core results into flat envelopes (`ok`, `message`, payload).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens its own connection; only the resolved database path
//!   is kept between calls.
//! - Validation failures carry the user-facing message from core; storage
//!   failures are logged and reported with a generic message.

use dotnote_core::db::open_db;
use dotnote_core::{
    core_version as core_version_inner, deleted_notes_message, derive_note_list,
    init_logging as init_logging_inner, ping as ping_inner, Category, CategoryPicker,
    CategoryService, Importance, Note, NoteForm, NoteService, ProfileService,
    ProfileServiceError, SortMode, SqliteCategoryRepository, SqliteKvStore,
    SqliteNoteRepository, DELETE_FAILURE_MESSAGE, GENERIC_FAILURE_MESSAGE,
};
use log::warn;
use rusqlite::Connection;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "dotnote.sqlite3";
const DB_PATH_ENV: &str = "DOTNOTE_DB_PATH";
const NOTE_MISSING_MESSAGE: &str = "This note no longer exists.";
static CONFIGURED_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by every later call.
///
/// Takes precedence over `DOTNOTE_DB_PATH` and the temp-dir fallback.
/// Repeating the same path is a no-op; a different path is rejected.
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path must not be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = CONFIGURED_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already configured as `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Note row as shown by the list and edit screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// 1..=5, rendered as dots.
    pub importance: u8,
    pub created_at_ms: i64,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        let (category_id, category_name, category_color) = match note.category {
            Some(category) => (Some(category.id), Some(category.name), Some(category.color)),
            None => (None, None, None),
        };
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            importance: note.importance.value(),
            created_at_ms: note.created_at,
            category_id,
            category_name,
            category_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    /// `#RRGGBB`.
    pub color: String,
    pub is_default: bool,
}

impl From<Category> for CategoryItem {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            color: category.color,
            is_default: category.is_default,
        }
    }
}

/// Filtered and sorted note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<NoteItem>,
    /// Sort label actually applied (`date-desc` when none was given).
    pub applied_sort: String,
}

/// Single-note envelope for get/create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteResponse {
    pub ok: bool,
    pub message: String,
    pub note: Option<NoteItem>,
}

impl NoteResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<CategoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResponse {
    pub ok: bool,
    pub message: String,
    pub category: Option<CategoryItem>,
}

/// Envelope for destructive calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResponse {
    pub ok: bool,
    pub message: String,
    /// Notes deleted, or notes detached from a deleted category.
    pub affected: u32,
}

impl DeleteResponse {
    fn success(message: impl Into<String>, affected: usize) -> Self {
        Self {
            ok: true,
            message: message.into(),
            affected: u32::try_from(affected).unwrap_or(u32::MAX),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            affected: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub message: String,
    pub username: Option<String>,
}

/// Lists notes matching `query`, ordered by `sort`.
///
/// `sort` accepts `date-desc|date-asc|importance-desc|importance-asc`;
/// `None` keeps the default newest-first order.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(query: String, sort: Option<String>) -> NoteListResponse {
    let sort = match sort.as_deref().map(str::parse::<SortMode>) {
        None => SortMode::default(),
        Some(Ok(mode)) => mode,
        Some(Err(message)) => {
            return NoteListResponse {
                ok: false,
                message,
                items: Vec::new(),
                applied_sort: SortMode::default().to_string(),
            };
        }
    };

    let result = with_db("notes_list", |conn| {
        let service = note_service(conn)?;
        service
            .list_notes()
            .map_err(|err| storage_failure("notes_list", err))
    });

    match result {
        Ok(notes) => {
            let items: Vec<NoteItem> = derive_note_list(&notes, &query, sort)
                .into_iter()
                .map(NoteItem::from)
                .collect();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NoteListResponse {
                ok: true,
                message,
                items,
                applied_sort: sort.to_string(),
            }
        }
        Err(message) => NoteListResponse {
            ok: false,
            message,
            items: Vec::new(),
            applied_sort: sort.to_string(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_get(id: String) -> NoteResponse {
    let result = with_db("note_get", |conn| {
        note_service(conn)?
            .get_note(id.trim())
            .map_err(|err| storage_failure("note_get", err))
    });
    match result {
        Ok(Some(note)) => NoteResponse {
            ok: true,
            message: String::new(),
            note: Some(note.into()),
        },
        Ok(None) => NoteResponse::failure(NOTE_MISSING_MESSAGE),
        Err(message) => NoteResponse::failure(message),
    }
}

/// Validates and stores a new note.
///
/// Blank `category_id` means "no category".
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(
    title: String,
    content: String,
    importance: u8,
    category_id: Option<String>,
) -> NoteResponse {
    let mut form = NoteForm::new();
    if let Err(message) = fill_form(&mut form, title, content, importance, category_id) {
        return NoteResponse::failure(message);
    }
    match with_db("note_create", |conn| Ok(form.submit(&note_service(conn)?))) {
        Ok(outcome) => NoteResponse {
            ok: outcome.status.is_success(),
            message: outcome.status.message,
            note: outcome.note.map(NoteItem::from),
        },
        Err(message) => NoteResponse::failure(message),
    }
}

/// Replaces title, content, importance and category; keeps `created_at`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update(
    id: String,
    title: String,
    content: String,
    importance: u8,
    category_id: Option<String>,
) -> NoteResponse {
    let result = with_db("note_update", |conn| {
        let service = note_service(conn)?;
        let Some(mut form) = NoteForm::load(&service, id.trim())
            .map_err(|err| storage_failure("note_update", err))?
        else {
            return Ok(None);
        };
        fill_form(&mut form, title, content, importance, category_id)?;
        Ok(Some(form.submit(&service)))
    });
    match result {
        Ok(Some(outcome)) => NoteResponse {
            ok: outcome.status.is_success(),
            message: outcome.status.message,
            note: outcome.note.map(NoteItem::from),
        },
        Ok(None) => NoteResponse::failure(NOTE_MISSING_MESSAGE),
        Err(message) => NoteResponse::failure(message),
    }
}

/// Deletes every listed note in one transaction.
///
/// Unknown ids are skipped; `affected` counts rows actually removed.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(ids: Vec<String>) -> DeleteResponse {
    if ids.is_empty() {
        return DeleteResponse::failure("No notes selected.");
    }
    let result = with_db("notes_delete", |conn| {
        note_service(conn)?.delete_notes(&ids).map_err(|err| {
            warn!("event=ffi_call module=ffi status=error op=notes_delete error={err}");
            DELETE_FAILURE_MESSAGE.to_string()
        })
    });
    match result {
        Ok(deleted) => DeleteResponse::success(deleted_notes_message(deleted), deleted),
        Err(message) => DeleteResponse::failure(message),
    }
}

/// Lists defaults first, then user categories by name.
#[flutter_rust_bridge::frb(sync)]
pub fn categories_list() -> CategoryListResponse {
    let result = with_db("categories_list", |conn| {
        category_service(conn)?
            .list_categories()
            .map_err(|err| storage_failure("categories_list", err))
    });
    match result {
        Ok(categories) => CategoryListResponse {
            ok: true,
            message: String::new(),
            items: categories.into_iter().map(CategoryItem::from).collect(),
        },
        Err(message) => CategoryListResponse {
            ok: false,
            message,
            items: Vec::new(),
        },
    }
}

/// Adds a user category. `color` falls back to the default accent.
#[flutter_rust_bridge::frb(sync)]
pub fn category_create(name: String, color: Option<String>) -> CategoryResponse {
    let result = with_db("category_create", |conn| {
        let service = category_service(conn)?;
        let mut picker = CategoryPicker::load(&service, None)
            .map_err(|err| storage_failure("category_create", err))?;
        picker.add(&service, &name, color.as_deref())
    });
    match result {
        Ok(category) => CategoryResponse {
            ok: true,
            message: "Category added.".to_string(),
            category: Some(category.into()),
        },
        Err(message) => CategoryResponse {
            ok: false,
            message,
            category: None,
        },
    }
}

/// Deletes a user category and detaches its notes.
///
/// Default categories are rejected. `affected` is the number of notes left
/// without a category.
#[flutter_rust_bridge::frb(sync)]
pub fn category_delete(id: String) -> DeleteResponse {
    let result = with_db("category_delete", |conn| {
        let service = category_service(conn)?;
        let mut picker = CategoryPicker::load(&service, None)
            .map_err(|err| storage_failure("category_delete", err))?;
        picker.request_delete(id.trim())?;
        picker
            .confirm_delete(&service)
            .unwrap_or_else(|| Err(GENERIC_FAILURE_MESSAGE.to_string()))
    });
    match result {
        Ok(detached) => DeleteResponse::success("Category deleted.", detached),
        Err(message) => DeleteResponse::failure(message),
    }
}

/// Returns the stored username; `username` is `None` before first save.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_get_username() -> ProfileResponse {
    let result = with_db("profile_get_username", |conn| {
        profile_service(conn)?
            .current_username()
            .map_err(|err| storage_failure("profile_get_username", err))
    });
    match result {
        Ok(username) => ProfileResponse {
            ok: true,
            message: String::new(),
            username,
        },
        Err(message) => ProfileResponse {
            ok: false,
            message,
            username: None,
        },
    }
}

/// Validates and stores the username (3..=20 chars after trimming).
#[flutter_rust_bridge::frb(sync)]
pub fn profile_save_username(username: String) -> ProfileResponse {
    let result = with_db("profile_save_username", |conn| {
        profile_service(conn)?
            .save_username(&username)
            .map_err(|err| match err {
                ProfileServiceError::Validation(validation) => validation.user_message(),
                other => storage_failure("profile_save_username", other),
            })
    });
    match result {
        Ok(profile) => ProfileResponse {
            ok: true,
            message: "Username saved.".to_string(),
            username: Some(profile.username),
        },
        Err(message) => ProfileResponse {
            ok: false,
            message,
            username: None,
        },
    }
}

fn fill_form(
    form: &mut NoteForm,
    title: String,
    content: String,
    importance: u8,
    category_id: Option<String>,
) -> Result<(), String> {
    form.title = title;
    form.content = content;
    form.category_id = category_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    match Importance::new(importance) {
        Ok(value) => {
            form.importance = value;
            Ok(())
        }
        // Title and content errors come first in the validation order.
        Err(err) => Err(form
            .validation_message()
            .unwrap_or_else(|| err.user_message())),
    }
}

fn resolve_db_path() -> PathBuf {
    if let Some(path) = CONFIGURED_DB_PATH.get() {
        return path.clone();
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn with_db<T>(
    op: &'static str,
    f: impl FnOnce(&Connection) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| storage_failure(op, err))?;
    f(&conn)
}

fn note_service(conn: &Connection) -> Result<NoteService<SqliteNoteRepository<'_>>, String> {
    SqliteNoteRepository::try_new(conn)
        .map(NoteService::new)
        .map_err(|err| storage_failure("note_repo_init", err))
}

fn category_service(
    conn: &Connection,
) -> Result<CategoryService<SqliteCategoryRepository<'_>>, String> {
    SqliteCategoryRepository::try_new(conn)
        .map(CategoryService::new)
        .map_err(|err| storage_failure("category_repo_init", err))
}

fn profile_service(conn: &Connection) -> Result<ProfileService<SqliteKvStore<'_>>, String> {
    SqliteKvStore::try_new(conn)
        .map(ProfileService::new)
        .map_err(|err| storage_failure("kv_repo_init", err))
}

fn storage_failure(op: &str, err: impl Display) -> String {
    warn!("event=ffi_call module=ffi status=error op={op} error={err}");
    GENERIC_FAILURE_MESSAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        categories_list, category_create, category_delete, configure_db_path, core_version,
        init_logging, note_create, note_get, note_update, notes_delete, notes_list, ping,
        profile_get_username, profile_save_username, resolve_db_path,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_db_path_is_sticky() {
        use_test_db();
        assert!(!configure_db_path("   ".to_string()).is_empty());

        let active = resolve_db_path();
        assert!(configure_db_path(active.display().to_string()).is_empty());
        let error = configure_db_path("/somewhere/else.sqlite3".to_string());
        assert!(error.contains("refusing to switch"), "{error}");
    }

    #[test]
    fn created_note_is_found_by_query() {
        use_test_db();
        let token = unique_token("find");
        let created = note_create(
            format!("Title {token}"),
            String::new(),
            4,
            Some("cat_2".to_string()),
        );
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.message, "Note added.");
        let note = created.note.unwrap();
        assert_eq!(note.category_name.as_deref(), Some("Personal"));

        let listed = notes_list(token.to_uppercase(), Some("importance-desc".to_string()));
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.applied_sort, "importance-desc");
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, note.id);

        let fetched = note_get(note.id.clone());
        assert_eq!(fetched.note, Some(note));
    }

    #[test]
    fn invalid_note_input_is_rejected_with_user_message() {
        use_test_db();
        let short = note_create("ab".to_string(), String::new(), 1, None);
        assert!(!short.ok);
        assert_eq!(short.message, "Title must be at least 3 characters.");

        let content = note_create("Valid title".to_string(), "tiny".to_string(), 1, None);
        assert_eq!(content.message, "Note content must be at least 10 characters.");

        let importance = note_create("Valid title".to_string(), String::new(), 9, None);
        assert_eq!(importance.message, "Importance must be between 1 and 5.");

        let title_first = note_create(String::new(), String::new(), 0, None);
        assert!(!title_first.ok);
        assert_eq!(title_first.message, "Please enter a title.");

        let content_first = note_create("Valid title".to_string(), "tiny".to_string(), 0, None);
        assert_eq!(content_first.message, "Note content must be at least 10 characters.");

        let category = note_create(
            "Valid title".to_string(),
            String::new(),
            1,
            Some("missing".to_string()),
        );
        assert!(!category.ok);
        assert!(category.note.is_none());
    }

    #[test]
    fn notes_list_rejects_unknown_sort() {
        let response = notes_list(String::new(), Some("alphabetical".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("unsupported sort mode"));
        assert_eq!(response.applied_sort, "date-desc");
    }

    #[test]
    fn note_update_keeps_created_at() {
        use_test_db();
        let token = unique_token("update");
        let created = note_create(format!("Draft {token}"), String::new(), 2, None)
            .note
            .unwrap();

        let updated = note_update(
            created.id.clone(),
            format!("Final {token}"),
            "now with enough content".to_string(),
            5,
            None,
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.message, "Note updated.");
        let note = updated.note.unwrap();
        assert_eq!(note.importance, 5);
        assert_eq!(note.created_at_ms, created.created_at_ms);

        let missing = note_update(
            "no-such-note".to_string(),
            "Whatever".to_string(),
            String::new(),
            1,
            None,
        );
        assert!(!missing.ok);
        assert_eq!(missing.message, "This note no longer exists.");
    }

    #[test]
    fn notes_delete_removes_listed_notes() {
        use_test_db();
        let token = unique_token("delete");
        let first = note_create(format!("One {token}"), String::new(), 1, None)
            .note
            .unwrap();
        let second = note_create(format!("Two {token}"), String::new(), 1, None)
            .note
            .unwrap();

        let response = notes_delete(vec![first.id, second.id]);
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.affected, 2);
        assert_eq!(response.message, "2 notes deleted.");
        assert!(notes_list(token, None).items.is_empty());

        assert!(!notes_delete(Vec::new()).ok);
    }

    #[test]
    fn category_lifecycle_detaches_notes() {
        use_test_db();
        let name = unique_token("cat");
        let created = category_create(name.clone(), Some("#00bcd4".to_string()));
        assert!(created.ok, "{}", created.message);
        let category = created.category.unwrap();
        assert_eq!(category.color, "#00BCD4");
        assert!(!category.is_default);

        let duplicate = category_create(name.to_uppercase(), None);
        assert!(!duplicate.ok);
        assert_eq!(duplicate.message, "This category already exists.");

        let note = note_create(
            format!("Tagged {name}"),
            String::new(),
            3,
            Some(category.id.clone()),
        )
        .note
        .unwrap();

        let deleted = category_delete(category.id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.affected, 1);

        let reloaded = note_get(note.id).note.unwrap();
        assert!(reloaded.category_id.is_none());
        assert!(categories_list()
            .items
            .iter()
            .all(|listed| listed.id != category.id));
    }

    #[test]
    fn default_category_delete_is_rejected() {
        use_test_db();
        let response = category_delete("cat_1".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "Default categories cannot be deleted.");

        let defaults = categories_list()
            .items
            .into_iter()
            .filter(|category| category.is_default)
            .count();
        assert_eq!(defaults, 5);
    }

    #[test]
    fn profile_username_round_trip() {
        use_test_db();
        let rejected = profile_save_username("al".to_string());
        assert!(!rejected.ok);
        assert!(rejected.username.is_none());

        let saved = profile_save_username("  ada  ".to_string());
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(saved.username.as_deref(), Some("ada"));
        assert_eq!(profile_get_username().username.as_deref(), Some("ada"));
    }

    fn use_test_db() {
        static TEST_DIR: OnceLock<TempDir> = OnceLock::new();
        let dir = TEST_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().expect("create temp dir");
            let path = dir.path().join("ffi.sqlite3");
            let error = configure_db_path(path.display().to_string());
            assert!(error.is_empty(), "{error}");
            dotnote_core::db::open_db(&path).expect("bootstrap test db");
            dir
        });
        assert!(resolve_db_path().starts_with(dir.path()));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
