//! Client Error Types
//!
//! Every failure a view can hit, and the single alert line each view shows
//! for it.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::routes::AppRoute;
use crate::schedule::TimestampError;
use crate::session::SessionError;

/// Errors raised while talking to the Tailink API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection failure, timeout or malformed request
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status; `message` is the first readable error in the body
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Success status with a body that does not decode
    #[error("Parse error: {0}")]
    Decode(String),

    /// No session token stored
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Register step 2 reached without the step 1 fields
    #[error("Registration details submitted without account details")]
    MissingDraft,

    #[error("Failed to read {path:?}: {error}")]
    File { path: PathBuf, error: String },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<TimestampError> for ClientError {
    fn from(e: TimestampError) -> Self {
        ClientError::InvalidInput(e.to_string())
    }
}

impl ClientError {
    /// Server-provided message, if the API rejected the request
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The alert the given view shows for this error
    pub fn alert(&self, view: AppRoute) -> String {
        match view {
            AppRoute::Login => match self.api_message() {
                Some(msg) => format!("Login failed: {}", msg),
                None => "Something went wrong. Please try again.".to_string(),
            },
            AppRoute::Register | AppRoute::RegisterDetails => match self {
                ClientError::Api { message, .. } => format!("Register failed: {}", message),
                ClientError::MissingDraft => {
                    "Please fill in your account details first".to_string()
                }
                _ => "Failed to register".to_string(),
            },
            AppRoute::Dogs => "Error adding dog".to_string(),
            AppRoute::SetAvailability => "Error setting availability".to_string(),
            AppRoute::Map => "Failed to load place or availability data".to_string(),
            AppRoute::Landing => self.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
