//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and the editable draft shape.
//! - Provide the single validator used by both add and edit flows.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `created_at` is assigned once at creation and never changes.
//! - `importance` is always within `1..=5`.

use crate::model::category::{CategoryId, CategoryRef};
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = String;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MIN_CHARS: usize = 10;

/// Note priority rendered as a 1..5 dot scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Importance(u8);

impl Importance {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Creates an importance level, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, NoteValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(NoteValidationError::ImportanceOutOfRange(i64::from(value)))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Importance {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Importance {
    type Error = NoteValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Importance {
    type Error = NoteValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| NoteValidationError::ImportanceOutOfRange(value))
            .and_then(Self::new)
    }
}

impl From<Importance> for u8 {
    fn from(value: Importance) -> Self {
        value.0
    }
}

/// Field-level validation failure for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    TitleEmpty,
    TitleTooShort,
    TitleTooLong,
    ContentTooShort,
    ImportanceOutOfRange(i64),
}

impl NoteValidationError {
    /// User-facing message shown by the form status dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::TitleEmpty => "Please enter a title.".to_string(),
            Self::TitleTooShort => {
                format!("Title must be at least {TITLE_MIN_CHARS} characters.")
            }
            Self::TitleTooLong => format!("Title must be at most {TITLE_MAX_CHARS} characters."),
            Self::ContentTooShort => {
                format!("Note content must be at least {CONTENT_MIN_CHARS} characters.")
            }
            Self::ImportanceOutOfRange(_) => format!(
                "Importance must be between {} and {}.",
                Importance::MIN,
                Importance::MAX
            ),
        }
    }
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImportanceOutOfRange(value) => {
                write!(f, "importance out of range: {value}")
            }
            other => write!(f, "{}", other.user_message()),
        }
    }
}

impl Error for NoteValidationError {}

/// Persisted note with its joined category summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Empty string when the user left content blank.
    pub content: String,
    pub importance: Importance,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub category: Option<CategoryRef>,
}

impl Note {
    /// Builds a new note from an already validated draft.
    ///
    /// Assigns a generated id and the current timestamp. The category is
    /// left empty; callers attach the resolved `CategoryRef`.
    pub fn from_draft(draft: &NoteDraft) -> Self {
        let normalized = draft.normalized();
        Self {
            id: Uuid::new_v4().to_string(),
            title: normalized.title,
            content: normalized.content,
            importance: normalized.importance,
            created_at: now_epoch_ms(),
            category: None,
        }
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.id.as_str())
    }
}

/// Editable note fields as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub importance: Importance,
    pub category_id: Option<CategoryId>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates fields in fixed order and reports the first failure.
    ///
    /// Order: title empty, title too short, title too long, content too
    /// short. Blank content is always accepted.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::TitleEmpty);
        }
        let title_chars = title.chars().count();
        if title_chars < TITLE_MIN_CHARS {
            return Err(NoteValidationError::TitleTooShort);
        }
        if title_chars > TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong);
        }

        let content = self.content.trim();
        if !content.is_empty() && content.chars().count() < CONTENT_MIN_CHARS {
            return Err(NoteValidationError::ContentTooShort);
        }

        Ok(())
    }

    /// Returns a copy with title and content trimmed for persistence.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            importance: self.importance,
            category_id: self.category_id.clone(),
        }
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            importance: note.importance,
            category_id: note.category.as_ref().map(|category| category.id.clone()),
        }
    }
}
