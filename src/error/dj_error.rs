//! Unified error type for the Mr. DJ client.

use thiserror::Error;

use super::category::ErrorCategory;
use super::network::{classify_http_error, FailureCause};
use crate::sse::SseParseError;
use crate::traits::HttpError;

/// Every error the library surfaces to its callers.
#[derive(Debug, Error)]
pub enum DjError {
    /// Transport failure (request, status, or body read).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A stream frame could not be interpreted.
    #[error(transparent)]
    Stream(#[from] SseParseError),

    /// A buffered JSON response did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading or writing the preferences file failed.
    #[error("preference storage failed: {0}")]
    Storage(#[from] std::io::Error),

    /// A previous turn has not reached a terminal state yet.
    #[error("a reply is still streaming")]
    TurnInProgress,

    #[error("message is empty")]
    EmptyMessage,
}

impl DjError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DjError::Http(err) => match self.failure_cause() {
                Some(FailureCause::AuthExpired) => ErrorCategory::Auth,
                Some(FailureCause::ServerError { .. }) => ErrorCategory::Server,
                _ if err.status().is_some() => ErrorCategory::Server,
                _ => ErrorCategory::Network,
            },
            DjError::Stream(_) | DjError::Decode(_) => ErrorCategory::Client,
            DjError::Config(_) => ErrorCategory::Configuration,
            DjError::Storage(_) => ErrorCategory::System,
            DjError::TurnInProgress | DjError::EmptyMessage => ErrorCategory::User,
        }
    }

    /// Failure cause for transport errors, `None` otherwise.
    pub fn failure_cause(&self) -> Option<FailureCause> {
        match self {
            DjError::Http(err) => Some(classify_http_error(err)),
            _ => None,
        }
    }

    /// Suggested next step for the user.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Plain-language description suitable for the conversation view.
    pub fn user_message(&self) -> String {
        match self {
            DjError::Http(err) => classify_http_error(err).user_message(),
            DjError::Stream(_) | DjError::Decode(_) => {
                "Received data Mr. DJ could not understand. Please try again.".to_string()
            }
            DjError::Config(msg) => format!("Configuration problem: {}", msg),
            DjError::Storage(_) => "Could not save your preferences.".to_string(),
            DjError::TurnInProgress => {
                "Please wait for the current reply to finish before sending another message."
                    .to_string()
            }
            DjError::EmptyMessage => "Type a message first.".to_string(),
        }
    }
}
