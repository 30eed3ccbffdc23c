//! Transport failure classification.
//!
//! Every transport problem that ends a turn is reduced to one of a few causes
//! with a plain-language message. That message becomes the text of the
//! synthetic assistant error message, exactly like an `error` event's text.

use std::fmt;

use crate::traits::HttpError;

/// User-facing cause of a failed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The bearer token was rejected (401/403).
    AuthExpired,
    /// The backend answered with a 5xx status.
    ServerError { status: u16 },
    /// Anything else: connection drops, timeouts, unexpected statuses.
    Generic { detail: String },
}

impl FailureCause {
    pub fn user_message(&self) -> String {
        match self {
            FailureCause::AuthExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            FailureCause::ServerError { .. } => {
                "The server ran into a problem. Please try again in a moment.".to_string()
            }
            FailureCause::Generic { detail } => {
                format!("Sorry, something went wrong: {}", detail)
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FailureCause::AuthExpired => "E_AUTH_EXPIRED",
            FailureCause::ServerError { .. } => "E_SERVER",
            FailureCause::Generic { .. } => "E_GENERIC",
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::AuthExpired => write!(f, "authentication expired"),
            FailureCause::ServerError { status } => write!(f, "server error (HTTP {})", status),
            FailureCause::Generic { detail } => write!(f, "{}", detail),
        }
    }
}

/// Map an HTTP status to a failure cause.
pub fn classify_status(status: u16) -> FailureCause {
    match status {
        401 | 403 => FailureCause::AuthExpired,
        500..=599 => FailureCause::ServerError { status },
        _ => FailureCause::Generic {
            detail: format!("the server answered with HTTP {}", status),
        },
    }
}

/// Map a transport error to a failure cause.
pub fn classify_http_error(err: &HttpError) -> FailureCause {
    match err {
        HttpError::ServerError { status, .. } => classify_status(*status),
        HttpError::ConnectionFailed(_) => FailureCause::Generic {
            detail: "could not reach the server".to_string(),
        },
        HttpError::Timeout(_) => FailureCause::Generic {
            detail: "the server took too long to respond".to_string(),
        },
        HttpError::Io(msg) => FailureCause::Generic {
            detail: format!("the connection was interrupted ({})", msg),
        },
        HttpError::InvalidUrl(msg) | HttpError::Other(msg) => FailureCause::Generic {
            detail: msg.clone(),
        },
    }
}
