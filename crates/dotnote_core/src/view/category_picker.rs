//! Category selector shown on the add/edit screens.
//!
//! Holds the category list, the current selection and a pending delete
//! confirmation. Errors come back as user-facing messages.

use crate::model::category::{Category, CategoryId, CategoryValidationError};
use crate::repo::category_repo::CategoryRepository;
use crate::service::category_service::{CategoryService, CategoryServiceError};

const ADD_FAILURE_MESSAGE: &str = "Something went wrong while adding the category.";
const DELETE_FAILURE_MESSAGE: &str = "Something went wrong while deleting the category.";
const CATEGORY_GONE_MESSAGE: &str = "This category no longer exists.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPicker {
    categories: Vec<Category>,
    selected: Option<CategoryId>,
    pending_delete: Option<Category>,
}

impl CategoryPicker {
    pub fn load<R: CategoryRepository>(
        service: &CategoryService<R>,
        selected: Option<&str>,
    ) -> Result<Self, CategoryServiceError> {
        let mut picker = Self::default();
        picker.reload(service)?;
        if let Some(id) = selected {
            picker.select(Some(id));
        }
        Ok(picker)
    }

    pub fn reload<R: CategoryRepository>(
        &mut self,
        service: &CategoryService<R>,
    ) -> Result<(), CategoryServiceError> {
        self.categories = service.list_categories()?;
        if let Some(id) = self.selected.as_deref() {
            if !self.categories.iter().any(|category| category.id == id) {
                self.selected = None;
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected(&self) -> Option<&Category> {
        let id = self.selected.as_deref()?;
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects a listed category, or clears with `None` ("no category").
    ///
    /// Returns false and keeps the selection when `id` is not listed.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.categories.iter().any(|category| category.id == id) => {
                self.selected = Some(id.to_string());
                true
            }
            Some(_) => false,
        }
    }

    /// Creates a category and selects it.
    pub fn add<R: CategoryRepository>(
        &mut self,
        service: &CategoryService<R>,
        name: &str,
        color: Option<&str>,
    ) -> Result<Category, String> {
        let category = service
            .add_category(name, color)
            .map_err(|err| user_message(&err, ADD_FAILURE_MESSAGE))?;
        if self.reload(service).is_err() {
            self.categories.push(category.clone());
        }
        self.selected = Some(category.id.clone());
        Ok(category)
    }

    /// Opens the delete confirmation for `id`.
    ///
    /// Default categories are rejected before any confirmation.
    pub fn request_delete(&mut self, id: &str) -> Result<&Category, String> {
        let category = self
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or_else(|| CATEGORY_GONE_MESSAGE.to_string())?;
        if category.is_default {
            return Err(CategoryValidationError::DefaultNotDeletable(category.id).user_message());
        }
        let pending = self.pending_delete.insert(category);
        Ok(&*pending)
    }

    pub fn pending_delete(&self) -> Option<&Category> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the pending category and clears the selection if it pointed
    /// at it. Returns `None` when nothing was pending, otherwise the number
    /// of notes left without a category.
    pub fn confirm_delete<R: CategoryRepository>(
        &mut self,
        service: &CategoryService<R>,
    ) -> Option<Result<usize, String>> {
        let category = self.pending_delete.take()?;
        let result = service
            .delete_category(&category.id)
            .map_err(|err| user_message(&err, DELETE_FAILURE_MESSAGE));

        if result.is_ok() {
            if self.selected.as_deref() == Some(category.id.as_str()) {
                self.selected = None;
            }
            if self.reload(service).is_err() {
                self.categories.retain(|listed| listed.id != category.id);
            }
        }
        Some(result)
    }
}

fn user_message(err: &CategoryServiceError, storage_message: &str) -> String {
    match err {
        CategoryServiceError::Validation(validation) => validation.user_message(),
        CategoryServiceError::CategoryNotFound(_) => CATEGORY_GONE_MESSAGE.to_string(),
        CategoryServiceError::Repo(_) => storage_message.to_string(),
    }
}
