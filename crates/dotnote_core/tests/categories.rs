use dotnote_core::db::open_db_in_memory;
use dotnote_core::{
    CategoryPicker, CategoryService, CategoryServiceError, CategoryValidationError, NoteDraft,
    NoteService, SqliteCategoryRepository, SqliteNoteRepository, DEFAULT_CATEGORIES,
    DEFAULT_CATEGORY_COLOR,
};

#[test]
fn add_category_rejects_blank_and_case_insensitive_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let err = service.add_category("   ", None).unwrap_err();
    assert_eq!(err.validation(), Some(&CategoryValidationError::NameEmpty));

    let err = service.add_category(" work ", None).unwrap_err();
    assert!(matches!(
        err,
        CategoryServiceError::Validation(CategoryValidationError::DuplicateName(_))
    ));

    service.add_category("Travel", Some("#40c4ff")).unwrap();
    let err = service.add_category("TRAVEL", None).unwrap_err();
    assert_eq!(
        err.validation().map(|validation| validation.user_message()),
        Some("This category already exists.".to_string())
    );
    assert_eq!(service.list_categories().unwrap().len(), 6);
}

#[test]
fn add_category_generates_identity_and_normalizes_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let travel = service.add_category("  Travel ", Some("#40c4ff")).unwrap();
    assert_eq!(travel.name, "Travel");
    assert_eq!(travel.color, "#40C4FF");
    assert!(!travel.is_default);
    assert!(travel.created_at > 0);
    assert!(!travel.id.is_empty());

    let hobby = service.add_category("Hobby", None).unwrap();
    assert_eq!(hobby.color, DEFAULT_CATEGORY_COLOR);
    assert_ne!(hobby.id, travel.id);

    let err = service.add_category("Garden", Some("green")).unwrap_err();
    assert!(matches!(
        err,
        CategoryServiceError::Validation(CategoryValidationError::InvalidColor(_))
    ));
}

#[test]
fn default_categories_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    for seed in &DEFAULT_CATEGORIES {
        let err = service.delete_category(seed.id).unwrap_err();
        assert!(matches!(
            err,
            CategoryServiceError::Validation(CategoryValidationError::DefaultNotDeletable(_))
        ));
    }
    assert_eq!(service.list_categories().unwrap().len(), 5);
}

#[test]
fn deleting_category_detaches_all_of_its_notes() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let travel = categories.add_category("Travel", None).unwrap();
    let mut tagged = Vec::new();
    for title in ["Pack bags", "Book hotel", "Renew passport"] {
        let mut draft = NoteDraft::new(title);
        draft.category_id = Some(travel.id.clone());
        tagged.push(notes.create_note(&draft).unwrap().id);
    }
    let mut work_draft = NoteDraft::new("Standup notes");
    work_draft.category_id = Some("cat_1".to_string());
    let work_note = notes.create_note(&work_draft).unwrap();

    assert_eq!(categories.count_notes_in_category(&travel.id).unwrap(), 3);
    let detached = categories.delete_category(&travel.id).unwrap();
    assert_eq!(detached, 3);

    for id in &tagged {
        assert!(notes.get_note(id).unwrap().unwrap().category.is_none());
    }
    assert_eq!(
        notes.get_note(&work_note.id).unwrap().unwrap().category_id(),
        Some("cat_1")
    );
    assert!(categories.get_category(&travel.id).unwrap().is_none());
}

#[test]
fn delete_unknown_category_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    assert!(matches!(
        service.delete_category("missing").unwrap_err(),
        CategoryServiceError::CategoryNotFound(_)
    ));
}

#[test]
fn picker_selects_new_category_and_clears_selection_on_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let mut picker = CategoryPicker::load(&service, None).unwrap();
    assert_eq!(picker.categories().len(), 5);
    assert!(picker.selected().is_none());

    let travel = picker.add(&service, "Travel", Some("#7C4DFF")).unwrap();
    assert_eq!(picker.selected_id(), Some(travel.id.as_str()));
    assert_eq!(picker.categories().len(), 6);

    let pending = picker.request_delete(&travel.id).unwrap();
    assert_eq!(pending.id, travel.id);
    assert_eq!(picker.confirm_delete(&service), Some(Ok(0)));
    assert!(picker.selected().is_none());
    assert_eq!(picker.categories().len(), 5);
    assert!(picker.confirm_delete(&service).is_none());
}

#[test]
fn picker_keeps_selection_when_other_category_is_deleted() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let mut picker = CategoryPicker::load(&service, Some("cat_3")).unwrap();
    let hobby = picker.add(&service, "Hobby", None).unwrap();
    assert!(picker.select(Some("cat_3")));

    picker.request_delete(&hobby.id).unwrap();
    picker.confirm_delete(&service).unwrap().unwrap();
    assert_eq!(picker.selected_id(), Some("cat_3"));
}

#[test]
fn picker_rejects_default_delete_before_confirmation() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let mut picker = CategoryPicker::load(&service, None).unwrap();

    let message = picker.request_delete("cat_1").unwrap_err();
    assert_eq!(message, "Default categories cannot be deleted.");
    assert!(picker.pending_delete().is_none());

    let message = picker.add(&service, "personal", None).unwrap_err();
    assert_eq!(message, "This category already exists.");
    assert!(!picker.select(Some("unknown")));
}

#[test]
fn failed_category_delete_keeps_note_references() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let travel = categories.add_category("Travel", None).unwrap();
    let mut draft = NoteDraft::new("Pack bags");
    draft.category_id = Some(travel.id.clone());
    let note = notes.create_note(&draft).unwrap();

    conn.execute_batch(
        "CREATE TRIGGER block_category_delete BEFORE DELETE ON categories
         BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
    )
    .unwrap();

    assert!(matches!(
        categories.delete_category(&travel.id).unwrap_err(),
        CategoryServiceError::Repo(_)
    ));
    let reloaded = notes.get_note(&note.id).unwrap().unwrap();
    assert_eq!(reloaded.category_id(), Some(travel.id.as_str()));
    assert_eq!(reloaded.category, Some(travel.summary()));
    assert!(categories.get_category(&travel.id).unwrap().is_some());
}
