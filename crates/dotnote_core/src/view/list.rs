//! Note list filtering and sorting.
//!
//! # Responsibility
//! - Derive the displayed note list from the stored notes, a free-text query
//!   and a sort mode.
//!
//! # Invariants
//! - Filtering is a case-insensitive substring match on title OR content;
//!   the query is not trimmed.
//! - Sorting is stable: notes with equal keys keep their snapshot order.
//! - The projection is recomputed in full on every input change.

use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Display order of the note list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "date-desc")]
    NewestFirst,
    #[serde(rename = "date-asc")]
    OldestFirst,
    #[serde(rename = "importance-desc")]
    MostImportantFirst,
    #[serde(rename = "importance-asc")]
    LeastImportantFirst,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::NewestFirst,
        SortMode::OldestFirst,
        SortMode::MostImportantFirst,
        SortMode::LeastImportantFirst,
    ];

    /// Stable wire label used by the FFI layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewestFirst => "date-desc",
            Self::OldestFirst => "date-asc",
            Self::MostImportantFirst => "importance-desc",
            Self::LeastImportantFirst => "importance-asc",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unsupported sort mode `{value}`; expected date-desc|date-asc|importance-desc|importance-asc"
                )
            })
    }
}

/// Returns the notes matching `query`, ordered by `sort`.
///
/// Only an empty query keeps every note; whitespace is matched literally.
pub fn derive_note_list(notes: &[Note], query: &str, sort: SortMode) -> Vec<Note> {
    let needle = query.to_lowercase();
    let mut visible: Vec<Note> = notes
        .iter()
        .filter(|note| needle.is_empty() || matches_query(note, &needle))
        .cloned()
        .collect();

    match sort {
        SortMode::NewestFirst => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::OldestFirst => visible.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::MostImportantFirst => visible.sort_by(|a, b| b.importance.cmp(&a.importance)),
        SortMode::LeastImportantFirst => visible.sort_by(|a, b| a.importance.cmp(&b.importance)),
    }
    visible
}

fn matches_query(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}

/// Snapshot of all notes plus the derived, visible projection.
///
/// Callers `reload` after every write so the projection tracks the store.
#[derive(Debug, Clone, Default)]
pub struct NoteListView {
    notes: Vec<Note>,
    query: String,
    sort: SortMode,
    visible: Vec<Note>,
}

impl NoteListView {
    pub fn new(notes: Vec<Note>) -> Self {
        let mut view = Self {
            notes,
            ..Self::default()
        };
        view.recompute();
        view
    }

    /// Re-reads every note from storage and recomputes the projection.
    pub fn reload<R: NoteRepository>(
        &mut self,
        service: &NoteService<R>,
    ) -> Result<(), NoteServiceError> {
        self.notes = service.list_notes()?;
        self.recompute();
        Ok(())
    }

    pub fn replace_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.recompute();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.recompute();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn visible(&self) -> &[Note] {
        &self.visible
    }

    pub fn all_notes(&self) -> &[Note] {
        &self.notes
    }

    fn recompute(&mut self) {
        self.visible = derive_note_list(&self.notes, &self.query, self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_note_list, NoteListView, SortMode};
    use crate::model::note::{Importance, Note};

    fn note(id: &str, title: &str, content: &str, importance: u8, created_at: i64) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            importance: Importance::new(importance).unwrap(),
            created_at,
            category: None,
        }
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|note| note.id.as_str()).collect()
    }

    fn sample() -> Vec<Note> {
        vec![
            note("a", "Shopping list", "milk, eggs and bread", 3, 2_000),
            note("b", "Meeting", "Quarterly PLANNING session", 5, 1_000),
            note("c", "Dentist", "", 1, 3_000),
        ]
    }

    #[test]
    fn filter_matches_title_or_content_case_insensitively() {
        let notes = sample();
        assert_eq!(ids(&derive_note_list(&notes, "DENT", SortMode::NewestFirst)), vec!["c"]);
        assert_eq!(
            ids(&derive_note_list(&notes, "planning", SortMode::NewestFirst)),
            vec!["b"]
        );
        assert!(derive_note_list(&notes, "zzz", SortMode::NewestFirst).is_empty());
    }

    #[test]
    fn only_empty_query_keeps_everything() {
        let notes = sample();
        assert_eq!(derive_note_list(&notes, "", SortMode::NewestFirst).len(), 3);
        assert_eq!(
            ids(&derive_note_list(&notes, " ", SortMode::NewestFirst)),
            vec!["a", "b"]
        );
    }

    #[test]
    fn whitespace_in_query_is_part_of_the_substring() {
        let notes = vec![note("m", "milk,eggs", "", 1, 1)];
        assert!(derive_note_list(&notes, "milk ", SortMode::NewestFirst).is_empty());
        assert!(derive_note_list(&notes, " ", SortMode::NewestFirst).is_empty());
        assert_eq!(
            ids(&derive_note_list(&notes, "MILK,", SortMode::NewestFirst)),
            vec!["m"]
        );
    }

    #[test]
    fn each_sort_mode_orders_as_expected() {
        let notes = sample();
        assert_eq!(
            ids(&derive_note_list(&notes, "", SortMode::NewestFirst)),
            vec!["c", "a", "b"]
        );
        assert_eq!(
            ids(&derive_note_list(&notes, "", SortMode::OldestFirst)),
            vec!["b", "a", "c"]
        );
        assert_eq!(
            ids(&derive_note_list(&notes, "", SortMode::MostImportantFirst)),
            vec!["b", "a", "c"]
        );
        assert_eq!(
            ids(&derive_note_list(&notes, "", SortMode::LeastImportantFirst)),
            vec!["c", "a", "b"]
        );
    }

    #[test]
    fn equal_keys_keep_encounter_order() {
        let notes = vec![
            note("first", "one", "", 4, 10),
            note("second", "two", "", 4, 10),
            note("third", "three", "", 4, 10),
        ];
        for mode in SortMode::ALL {
            assert_eq!(
                ids(&derive_note_list(&notes, "", mode)),
                vec!["first", "second", "third"],
                "mode {mode}"
            );
        }
    }

    #[test]
    fn sort_mode_labels_parse_back() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!(" DATE-ASC ".parse::<SortMode>().unwrap(), SortMode::OldestFirst);
        assert!("alphabetical".parse::<SortMode>().is_err());
        assert_eq!(
            serde_json::to_string(&SortMode::MostImportantFirst).unwrap(),
            r#""importance-desc""#
        );
    }

    #[test]
    fn view_recomputes_on_every_input_change() {
        let mut view = NoteListView::new(sample());
        assert_eq!(ids(view.visible()), vec!["c", "a", "b"]);

        view.set_query("e");
        assert_eq!(ids(view.visible()), vec!["c", "a", "b"]);
        view.set_query("milk");
        assert_eq!(ids(view.visible()), vec!["a"]);

        view.clear_query();
        view.set_sort(SortMode::MostImportantFirst);
        assert_eq!(ids(view.visible()), vec!["b", "a", "c"]);

        view.replace_notes(vec![note("d", "Only", "", 2, 5)]);
        assert_eq!(ids(view.visible()), vec!["d"]);
        assert_eq!(view.all_notes().len(), 1);
    }
}
