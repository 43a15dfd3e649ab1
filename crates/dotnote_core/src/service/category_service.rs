//! Category use-case service.
//!
//! # Responsibility
//! - Validate and create user categories.
//! - Delete non-default categories and detach their notes atomically.
//!
//! # Invariants
//! - Names stay unique under case-insensitive comparison.
//! - Default categories are never deleted.

use crate::model::category::{
    normalize_category_color, normalize_category_name, Category, CategoryValidationError,
};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from category service operations.
#[derive(Debug)]
pub enum CategoryServiceError {
    Validation(CategoryValidationError),
    CategoryNotFound(String),
    Repo(RepoError),
}

impl CategoryServiceError {
    pub fn validation(&self) -> Option<&CategoryValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for CategoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::CategoryNotFound(_) => None,
        }
    }
}

impl From<CategoryValidationError> for CategoryServiceError {
    fn from(value: CategoryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CategoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::CategoryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Category service facade.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists categories: defaults first, then by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self.repo.list_categories()?)
    }

    pub fn get_category(&self, id: &str) -> Result<Option<Category>, CategoryServiceError> {
        Ok(self.repo.get_category(id)?)
    }

    /// Creates a user category.
    ///
    /// `color` falls back to the first palette color when `None` or blank.
    pub fn add_category(
        &self,
        name: &str,
        color: Option<&str>,
    ) -> Result<Category, CategoryServiceError> {
        let name = normalize_category_name(name)?;
        let color = normalize_category_color(color)?;

        let existing = self.repo.list_categories()?;
        if existing.iter().any(|category| category.has_name(&name)) {
            return Err(CategoryValidationError::DuplicateName(name).into());
        }

        let category = Category::new_user(name, color);
        if let Err(err) = self.repo.insert_category(&category) {
            warn!("event=category_create module=service status=error error={err}");
            return Err(err.into());
        }
        info!(
            "event=category_create module=service status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    /// Deletes a user category after detaching every note that uses it.
    ///
    /// Returns the number of notes that now have no category.
    pub fn delete_category(&self, id: &str) -> Result<usize, CategoryServiceError> {
        let category = self
            .repo
            .get_category(id)?
            .ok_or_else(|| CategoryServiceError::CategoryNotFound(id.to_string()))?;
        if category.is_default {
            return Err(CategoryValidationError::DefaultNotDeletable(category.id).into());
        }

        match self.repo.delete_category(id) {
            Ok(detached) => {
                info!(
                    "event=category_delete module=service status=ok category_id={id} detached_notes={detached}"
                );
                Ok(detached)
            }
            Err(err) => {
                warn!(
                    "event=category_delete module=service status=error category_id={id} error={err}"
                );
                Err(err.into())
            }
        }
    }

    pub fn count_notes_in_category(&self, id: &str) -> Result<usize, CategoryServiceError> {
        Ok(self.repo.count_notes_in_category(id)?)
    }
}
