//! Add/edit note form.
//!
//! # Responsibility
//! - Hold the editable field values of the add and edit screens.
//! - Validate once, then write through `NoteService`, and report a status.
//!
//! # Invariants
//! - Add and edit share the same validator (`NoteDraft::validate`).
//! - A failed validation never touches storage.

use crate::model::category::CategoryId;
use crate::model::note::{Importance, Note, NoteDraft, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::view::status::{StatusMessage, STATUS_AUTO_DISMISS};
use std::time::Duration;

const CREATE_SUCCESS_MESSAGE: &str = "Note added.";
const CREATE_FAILURE_MESSAGE: &str = "Something went wrong while adding the note.";
const UPDATE_SUCCESS_MESSAGE: &str = "Note updated.";
const UPDATE_FAILURE_MESSAGE: &str = "Something went wrong while updating the note.";
const CATEGORY_GONE_MESSAGE: &str = "The selected category no longer exists.";
const NOTE_GONE_MESSAGE: &str = "This note no longer exists.";

/// Result of submitting the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    pub status: StatusMessage,
    /// Persisted note on success.
    pub note: Option<Note>,
    /// Delay before the UI navigates back; `None` keeps the form open.
    pub navigate_back_after: Option<Duration>,
}

impl FormOutcome {
    fn saved(note: Note, message: &str) -> Self {
        Self {
            status: StatusMessage::success(message),
            note: Some(note),
            navigate_back_after: Some(STATUS_AUTO_DISMISS),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: StatusMessage::error(message),
            note: None,
            navigate_back_after: None,
        }
    }
}

/// Field values of the add/edit screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub importance: Importance,
    pub category_id: Option<CategoryId>,
    editing: Option<NoteId>,
}

impl NoteForm {
    /// Empty add form: importance 1, no category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit form prefilled from an existing note.
    pub fn from_note(note: &Note) -> Self {
        let draft = NoteDraft::from(note);
        Self {
            title: draft.title,
            content: draft.content,
            importance: draft.importance,
            category_id: draft.category_id,
            editing: Some(note.id.clone()),
        }
    }

    /// Loads the edit form for `id`, or `None` when the note is gone.
    pub fn load<R: NoteRepository>(
        service: &NoteService<R>,
        id: &str,
    ) -> Result<Option<Self>, NoteServiceError> {
        Ok(service.get_note(id)?.as_ref().map(Self::from_note))
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            importance: self.importance,
            category_id: self.category_id.clone(),
        }
    }

    /// Validation message for the current values, if any.
    pub fn validation_message(&self) -> Option<String> {
        self.draft().validate().err().map(|err| err.user_message())
    }

    /// Saves the form: creates a note in add mode, updates it in edit mode.
    pub fn submit<R: NoteRepository>(&self, service: &NoteService<R>) -> FormOutcome {
        let draft = self.draft();
        match self.editing.as_deref() {
            None => match service.create_note(&draft) {
                Ok(note) => FormOutcome::saved(note, CREATE_SUCCESS_MESSAGE),
                Err(err) => FormOutcome::rejected(failure_message(&err, CREATE_FAILURE_MESSAGE)),
            },
            Some(id) => match service.update_note(id, &draft) {
                Ok(note) => FormOutcome::saved(note, UPDATE_SUCCESS_MESSAGE),
                Err(err) => FormOutcome::rejected(failure_message(&err, UPDATE_FAILURE_MESSAGE)),
            },
        }
    }
}

fn failure_message(err: &NoteServiceError, storage_message: &str) -> String {
    match err {
        NoteServiceError::Validation(validation) => validation.user_message(),
        NoteServiceError::CategoryNotFound(_) => CATEGORY_GONE_MESSAGE.to_string(),
        NoteServiceError::NoteNotFound(_) => NOTE_GONE_MESSAGE.to_string(),
        NoteServiceError::Repo(_) | NoteServiceError::InconsistentState(_) => {
            storage_message.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteForm;

    #[test]
    fn new_form_defaults_to_lowest_importance_and_no_category() {
        let form = NoteForm::new();
        assert_eq!(form.importance.value(), 1);
        assert!(form.category_id.is_none());
        assert!(form.editing().is_none());
    }

    #[test]
    fn validation_message_follows_fixed_order() {
        let mut form = NoteForm::new();
        form.content = "short".to_string();
        assert_eq!(
            form.validation_message().as_deref(),
            Some("Please enter a title.")
        );

        form.title = "ab".to_string();
        assert_eq!(
            form.validation_message().as_deref(),
            Some("Title must be at least 3 characters.")
        );

        form.title = "abc".to_string();
        assert_eq!(
            form.validation_message().as_deref(),
            Some("Note content must be at least 10 characters.")
        );

        form.content.clear();
        assert!(form.validation_message().is_none());
    }
}
