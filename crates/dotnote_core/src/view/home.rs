//! Main note list screen state.
//!
//! # Responsibility
//! - Combine the derived note list, selection mode, the delete confirmation
//!   prompt and the last status message.
//! - Run the confirmed batch delete through `NoteService`.
//!
//! # Invariants
//! - Deletion only happens after `request_delete` opened a prompt.
//! - A successful delete always returns to browsing.
//! - On failure the selection is kept so the user can retry.

use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::view::list::{NoteListView, SortMode};
use crate::view::selection::{PressOutcome, Selection};
use crate::view::status::StatusMessage;
use log::warn;
use std::collections::HashSet;

pub const DELETE_FAILURE_MESSAGE: &str =
    "Something went wrong while deleting notes. Please try again.";

/// Success text after deleting `count` notes.
pub fn deleted_notes_message(count: usize) -> String {
    if count == 1 {
        "Note deleted.".to_string()
    } else {
        format!("{count} notes deleted.")
    }
}

/// Confirmation shown before a batch delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub title: String,
    pub message: String,
    pub count: usize,
}

impl DeletePrompt {
    fn for_count(count: usize) -> Self {
        let message = if count == 1 {
            "Are you sure you want to delete this note?".to_string()
        } else {
            format!("Are you sure you want to delete {count} notes?")
        };
        Self {
            title: "Delete notes".to_string(),
            message,
            count,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomeScreen {
    list: NoteListView,
    selection: Selection,
    delete_prompt: Option<DeletePrompt>,
    status: Option<StatusMessage>,
}

impl HomeScreen {
    /// Builds the screen from the current contents of storage.
    pub fn load<R: NoteRepository>(service: &NoteService<R>) -> Result<Self, NoteServiceError> {
        let mut screen = Self::default();
        screen.refresh(service)?;
        Ok(screen)
    }

    /// Re-reads notes and drops selected ids that no longer exist.
    pub fn refresh<R: NoteRepository>(
        &mut self,
        service: &NoteService<R>,
    ) -> Result<(), NoteServiceError> {
        self.list.reload(service)?;
        let existing: HashSet<&str> = self
            .list
            .all_notes()
            .iter()
            .map(|note| note.id.as_str())
            .collect();
        self.selection.retain_existing(|id| existing.contains(id));
        Ok(())
    }

    pub fn visible_notes(&self) -> &[Note] {
        self.list.visible()
    }

    pub fn list(&self) -> &NoteListView {
        &self.list
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn delete_prompt(&self) -> Option<&DeletePrompt> {
        self.delete_prompt.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn dismiss_status(&mut self) {
        self.status = None;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.list.set_query(query);
    }

    pub fn clear_query(&mut self) {
        self.list.clear_query();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.list.set_sort(sort);
    }

    pub fn long_press(&mut self, id: &str) {
        self.selection.long_press(id);
    }

    pub fn press(&mut self, id: &str) -> PressOutcome {
        self.selection.press(id)
    }

    pub fn enter_selection(&mut self) {
        self.selection.enter();
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
        self.delete_prompt = None;
    }

    /// Header text: selection count while selecting, owner name otherwise.
    pub fn header_title(&self, username: Option<&str>) -> String {
        if self.selection.is_selecting() {
            return format!("{} selected", self.selection.len());
        }
        match username {
            Some(name) if !name.trim().is_empty() => format!("{}'s notes", name.trim()),
            _ => "Notes".to_string(),
        }
    }

    /// Opens the confirmation prompt for the current selection.
    ///
    /// Returns `None` (and opens nothing) when no note is selected.
    pub fn request_delete(&mut self) -> Option<&DeletePrompt> {
        if self.selection.is_empty() {
            return None;
        }
        self.delete_prompt = Some(DeletePrompt::for_count(self.selection.len()));
        self.delete_prompt.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.delete_prompt = None;
    }

    /// Deletes every selected note in one transaction.
    ///
    /// Returns `None` when no prompt was open. Otherwise the resulting
    /// status is also stored on the screen.
    pub fn confirm_delete<R: NoteRepository>(
        &mut self,
        service: &NoteService<R>,
    ) -> Option<StatusMessage> {
        self.delete_prompt.take()?;

        let ids = self.selection.selected().to_vec();
        let status = match service.delete_notes(&ids) {
            Ok(_) => {
                self.selection.cancel();
                if let Err(err) = self.list.reload(service) {
                    warn!("event=home_reload module=view status=error error={err}");
                    let gone: HashSet<&str> = ids.iter().map(String::as_str).collect();
                    let remaining = self
                        .list
                        .all_notes()
                        .iter()
                        .filter(|note| !gone.contains(note.id.as_str()))
                        .cloned()
                        .collect();
                    self.list.replace_notes(remaining);
                }
                StatusMessage::success(deleted_notes_message(ids.len()))
            }
            Err(_) => StatusMessage::error(DELETE_FAILURE_MESSAGE),
        };

        self.status = Some(status.clone());
        Some(status)
    }
}
