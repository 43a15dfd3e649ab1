//! Note use-case service.
//!
//! # Responsibility
//! - Create, update, read, list and batch-delete notes.
//! - Run the shared note validator before every write.
//!
//! # Invariants
//! - Invalid drafts never reach the repository.
//! - A draft may only reference an existing category.
//! - Logged events carry ids and counts only, never note text.

use crate::model::category::CategoryRef;
use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Draft failed field validation; nothing was written.
    Validation(NoteValidationError),
    /// Draft references a category that does not exist.
    CategoryNotFound(String),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl NoteServiceError {
    /// Returns the validation failure when this is a user input error.
    pub fn validation(&self) -> Option<&NoteValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates the draft and persists a new note.
    ///
    /// Title and content are stored trimmed; the id and `created_at` are
    /// generated here.
    pub fn create_note(&self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        draft.validate()?;
        let category = self.resolve_category(draft)?;

        let mut note = Note::from_draft(draft);
        note.category = category;
        if let Err(err) = self.repo.insert_note(&note) {
            warn!("event=note_create module=service status=error error={err}");
            return Err(err.into());
        }
        info!(
            "event=note_create module=service status=ok note_id={} has_category={}",
            note.id,
            note.category.is_some()
        );

        self.repo
            .get_note(&note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Validates the draft and replaces the editable fields of a note.
    pub fn update_note(&self, id: &str, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        draft.validate()?;
        self.resolve_category(draft)?;

        if let Err(err) = self.repo.update_note(id, &draft.normalized()) {
            warn!("event=note_update module=service status=error note_id={id} error={err}");
            return Err(err.into());
        }
        info!("event=note_update module=service status=ok note_id={id}");

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    pub fn get_note(&self, id: &str) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists all notes, newest first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    /// Deletes the given notes in one transaction.
    ///
    /// Returns the number of notes actually removed; unknown ids are skipped.
    pub fn delete_notes(&self, ids: &[NoteId]) -> Result<usize, NoteServiceError> {
        match self.repo.delete_notes(ids) {
            Ok(deleted) => {
                info!(
                    "event=notes_delete module=service status=ok requested={} deleted={}",
                    ids.len(),
                    deleted
                );
                Ok(deleted)
            }
            Err(err) => {
                warn!(
                    "event=notes_delete module=service status=error requested={} error={}",
                    ids.len(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn resolve_category(&self, draft: &NoteDraft) -> Result<Option<CategoryRef>, NoteServiceError> {
        let Some(category_id) = draft.category_id.as_deref() else {
            return Ok(None);
        };
        self.repo
            .find_category(category_id)?
            .map(Some)
            .ok_or_else(|| NoteServiceError::CategoryNotFound(category_id.to_string()))
    }
}
