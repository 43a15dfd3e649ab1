//! Category domain model.
//!
//! # Responsibility
//! - Define persisted categories and the summary embedded in notes.
//! - Declare the seeded default categories and the selectable palette.
//!
//! # Invariants
//! - Category names are unique under case-insensitive comparison.
//! - Default categories (`is_default = true`) are never deleted.
//! - `color` is always a `#RRGGBB` hex value.

use crate::model::now_epoch_ms;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Stable identifier for a category.
pub type CategoryId = String;

/// Color used when the add form does not pick one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#FF5252";

/// Colors offered by the category add form.
pub const CATEGORY_PALETTE: [&str; 12] = [
    "#FF5252", "#FF4081", "#E040FB", "#7C4DFF", "#448AFF", "#40C4FF", "#18FFFF", "#64FFDA",
    "#69F0AE", "#B2FF59", "#EEFF41", "#FFD740",
];

/// Seed definition for a non-deletable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

pub const DEFAULT_CATEGORIES: [DefaultCategory; 5] = [
    DefaultCategory {
        id: "cat_1",
        name: "Work",
        color: "#FF5252",
    },
    DefaultCategory {
        id: "cat_2",
        name: "Personal",
        color: "#448AFF",
    },
    DefaultCategory {
        id: "cat_3",
        name: "Shopping",
        color: "#66BB6A",
    },
    DefaultCategory {
        id: "cat_4",
        name: "Health",
        color: "#FFA726",
    },
    DefaultCategory {
        id: "cat_5",
        name: "Education",
        color: "#AB47BC",
    },
];

/// Persisted category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub is_default: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Category fields embedded in a note read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub is_default: bool,
}

impl Category {
    /// Creates a user category with a generated id.
    ///
    /// Expects `name` and `color` to be normalized already.
    pub fn new_user(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            is_default: false,
            created_at: now_epoch_ms(),
        }
    }

    pub fn summary(&self) -> CategoryRef {
        CategoryRef {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            is_default: self.is_default,
        }
    }

    /// Case-insensitive name comparison used for duplicate detection.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl DefaultCategory {
    pub fn to_category(&self, created_at: i64) -> Category {
        Category {
            id: self.id.to_string(),
            name: self.name.to_string(),
            color: self.color.to_string(),
            is_default: true,
            created_at,
        }
    }
}

/// Validation failure for category input or lifecycle rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    NameEmpty,
    DuplicateName(String),
    InvalidColor(String),
    DefaultNotDeletable(CategoryId),
}

impl CategoryValidationError {
    /// User-facing message shown by the category picker.
    pub fn user_message(&self) -> String {
        match self {
            Self::NameEmpty => "Category name cannot be empty.".to_string(),
            Self::DuplicateName(_) => "This category already exists.".to_string(),
            Self::InvalidColor(_) => "Category color must look like #RRGGBB.".to_string(),
            Self::DefaultNotDeletable(_) => "Default categories cannot be deleted.".to_string(),
        }
    }
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameEmpty => write!(f, "category name must not be blank"),
            Self::DuplicateName(name) => write!(f, "category name already exists: `{name}`"),
            Self::InvalidColor(color) => write!(f, "invalid category color: `{color}`"),
            Self::DefaultNotDeletable(id) => write!(f, "default category cannot be deleted: {id}"),
        }
    }
}

impl Error for CategoryValidationError {}

/// Trims a category name and rejects blank input.
pub fn normalize_category_name(name: &str) -> Result<String, CategoryValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CategoryValidationError::NameEmpty);
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional color to uppercase `#RRGGBB`.
///
/// `None` and blank input fall back to `DEFAULT_CATEGORY_COLOR`.
pub fn normalize_category_color(color: Option<&str>) -> Result<String, CategoryValidationError> {
    let Some(raw) = color.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_CATEGORY_COLOR.to_string());
    };
    if !HEX_COLOR_RE.is_match(raw) {
        return Err(CategoryValidationError::InvalidColor(raw.to_string()));
    }
    Ok(raw.to_ascii_uppercase())
}
