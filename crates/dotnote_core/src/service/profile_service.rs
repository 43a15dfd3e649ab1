//! User profile service.
//!
//! Stores the single local profile as JSON under `USER_KEY`.

use crate::model::profile::{ProfileValidationError, UserProfile};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key of the persisted profile record.
pub const USER_KEY: &str = "user_data";

#[derive(Debug)]
pub enum ProfileServiceError {
    Validation(ProfileValidationError),
    /// Stored JSON could not be decoded.
    Corrupt(serde_json::Error),
    Repo(RepoError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Corrupt(err) => write!(f, "stored profile is not valid JSON: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for ProfileServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Corrupt(value)
    }
}

pub struct ProfileService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProfileService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and stores the username, replacing any previous profile.
    pub fn save_username(&self, username: &str) -> Result<UserProfile, ProfileServiceError> {
        let profile = UserProfile::new(username)?;
        let json = serde_json::to_string(&profile)?;
        self.store.put_value(USER_KEY, &json)?;
        info!("event=profile_save module=service status=ok");
        Ok(profile)
    }

    pub fn load_profile(&self) -> Result<Option<UserProfile>, ProfileServiceError> {
        match self.store.get_value(USER_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn current_username(&self) -> Result<Option<String>, ProfileServiceError> {
        Ok(self.load_profile()?.map(|profile| profile.username))
    }

    pub fn has_user(&self) -> Result<bool, ProfileServiceError> {
        Ok(self.store.contains_key(USER_KEY)?)
    }

    pub fn remove_user(&self) -> Result<bool, ProfileServiceError> {
        Ok(self.store.remove_value(USER_KEY)?)
    }
}
