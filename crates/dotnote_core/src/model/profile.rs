//! Local user profile model.
//!
//! Only one profile exists per device. It is persisted as a JSON document
//! (`{"username": "..."}`) in the key-value store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
}

impl UserProfile {
    /// Validates and trims the username entered on the login screen.
    pub fn new(username: &str) -> Result<Self, ProfileValidationError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(ProfileValidationError::UsernameEmpty);
        }
        let chars = trimmed.chars().count();
        if chars < USERNAME_MIN_CHARS {
            return Err(ProfileValidationError::UsernameTooShort);
        }
        if chars > USERNAME_MAX_CHARS {
            return Err(ProfileValidationError::UsernameTooLong);
        }
        Ok(Self {
            username: trimmed.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidationError {
    UsernameEmpty,
    UsernameTooShort,
    UsernameTooLong,
}

impl ProfileValidationError {
    pub fn user_message(&self) -> String {
        match self {
            Self::UsernameEmpty => "Please enter a username.".to_string(),
            Self::UsernameTooShort => {
                format!("Username must be at least {USERNAME_MIN_CHARS} characters.")
            }
            Self::UsernameTooLong => {
                format!("Username must be at most {USERNAME_MAX_CHARS} characters.")
            }
        }
    }
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl Error for ProfileValidationError {}

#[cfg(test)]
mod tests {
    use super::{ProfileValidationError, UserProfile};

    #[test]
    fn username_is_trimmed_and_length_checked() {
        assert_eq!(UserProfile::new("  ada  ").unwrap().username, "ada");
        assert_eq!(
            UserProfile::new("  ").unwrap_err(),
            ProfileValidationError::UsernameEmpty
        );
        assert_eq!(
            UserProfile::new("al").unwrap_err(),
            ProfileValidationError::UsernameTooShort
        );
        assert_eq!(
            UserProfile::new(&"a".repeat(21)).unwrap_err(),
            ProfileValidationError::UsernameTooLong
        );
    }

    #[test]
    fn profile_json_shape_is_stable() {
        let profile = UserProfile::new("ada").unwrap();
        assert_eq!(
            serde_json::to_string(&profile).unwrap(),
            r#"{"username":"ada"}"#
        );
    }
}
