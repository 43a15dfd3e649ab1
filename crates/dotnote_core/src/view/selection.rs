//! Multi-select state machine for the note list.
//!
//! Two states: browsing (taps open the editor) and selecting (taps toggle
//! membership). Removing the last selected note returns to browsing.

use crate::model::note::NoteId;

/// What a tap on a list item resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Browsing: the UI should open the editor for this note.
    OpenEditor(NoteId),
    /// Selecting: the note was added to the selection.
    Selected(NoteId),
    /// Selecting: the note was removed; `exited` is true when that emptied
    /// the selection and returned to browsing.
    Deselected { id: NoteId, exited: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Browsing,
    /// Selected ids in the order they were picked.
    Selecting(Vec<NoteId>),
}

impl Selection {
    pub fn is_selecting(&self) -> bool {
        matches!(self, Self::Selecting(_))
    }

    pub fn selected(&self) -> &[NoteId] {
        match self {
            Self::Browsing => &[],
            Self::Selecting(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.selected().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected().iter().any(|selected| selected == id)
    }

    /// Explicit entry into selection mode with nothing selected yet.
    pub fn enter(&mut self) {
        if !self.is_selecting() {
            *self = Self::Selecting(Vec::new());
        }
    }

    /// Long-press enters selection mode with exactly `id` selected.
    ///
    /// Ignored while already selecting.
    pub fn long_press(&mut self, id: &str) {
        if !self.is_selecting() {
            *self = Self::Selecting(vec![id.to_string()]);
        }
    }

    pub fn press(&mut self, id: &str) -> PressOutcome {
        let Self::Selecting(ids) = self else {
            return PressOutcome::OpenEditor(id.to_string());
        };

        if let Some(position) = ids.iter().position(|selected| selected == id) {
            ids.remove(position);
            let exited = ids.is_empty();
            if exited {
                *self = Self::Browsing;
            }
            PressOutcome::Deselected {
                id: id.to_string(),
                exited,
            }
        } else {
            ids.push(id.to_string());
            PressOutcome::Selected(id.to_string())
        }
    }

    /// Leaves selection mode and forgets every selected id.
    pub fn cancel(&mut self) {
        *self = Self::Browsing;
    }

    /// Drops ids that no longer exist; leaves selection mode if none remain.
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        if let Self::Selecting(ids) = self {
            let had_any = !ids.is_empty();
            ids.retain(|id| exists(id.as_str()));
            if had_any && ids.is_empty() {
                *self = Self::Browsing;
            }
        }
    }
}
