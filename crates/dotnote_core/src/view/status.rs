//! Success/error status shown after a user action.

use serde::Serialize;
use std::time::Duration;

/// How long a success status stays up before the UI navigates back.
///
/// The UI owns the timer; the core only reports the delay.
pub const STATUS_AUTO_DISMISS: Duration = Duration::from_secs(1);

/// Generic message for storage failures without a more specific context.
pub const GENERIC_FAILURE_MESSAGE: &str = "Operation failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}
