//! Structured errors
//!
//! Every failure carries a machine-readable [`ErrorCode`] plus a short message that the
//! control surface can show as-is.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{code:?}] {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// User-entered text could not become an action
    Validation,
    /// Macro text is not a sequence of records
    MalformedDocument,
    /// The OS refused the hotkey binding
    RegistrationFailed,
    /// A synthetic input call was rejected
    ActionFailed,
    /// Reading or writing a macro file failed
    Storage,
    NotImplemented,
    Unknown,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
            context: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Rejected form input. The message is the status line shown to the user.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    pub fn malformed_document(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MalformedDocument,
            format!("Not a macro document: {}", reason.into()),
        )
    }

    pub fn registration_failed(combo: &str, reason: &str) -> Self {
        Self::new(
            ErrorCode::RegistrationFailed,
            format!("Could not register hotkey {}: {}", combo, reason),
        )
    }

    pub fn action_failed(action: &str, reason: &str) -> Self {
        Self::new(
            ErrorCode::ActionFailed,
            format!("{} failed: {}", action, reason),
        )
    }

    pub fn storage(path: &str, reason: &str) -> Self {
        Self::new(ErrorCode::Storage, format!("{}: {}", path, reason))
    }

    pub fn not_implemented(what: &str) -> Self {
        Self::new(
            ErrorCode::NotImplemented,
            format!("{} is not supported on this platform yet", what),
        )
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::Validation
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::new(ErrorCode::Unknown, e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorCode::Storage, e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::malformed_document(e.to_string())
    }
}
