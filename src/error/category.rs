//! High-level error classification.

use std::fmt;

/// Coarse classification used for logging and for choosing what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection drops, timeouts, unreachable backend.
    Network,

    /// Expired or missing access token.
    Auth,

    /// Backend answered with a 5xx or reported a failure in the stream.
    Server,

    /// Malformed data from the backend or a client bug.
    Client,

    /// The user must act first (e.g. wait for the current reply).
    User,

    /// Filesystem problems while storing preferences.
    System,

    /// Invalid environment or command-line configuration.
    Configuration,
}

impl ErrorCategory {
    /// Whether resubmitting the same message may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Suggested next step for the user.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and send the message again",
            ErrorCategory::Auth => "Log in with Spotify again to get a fresh token",
            ErrorCategory::Server => "Mr. DJ is having trouble right now. Try again shortly",
            ErrorCategory::Client => "This may be a bug. Please report it if it keeps happening",
            ErrorCategory::User => "Wait for the current reply to finish",
            ErrorCategory::System => "Check permissions on your config directory",
            ErrorCategory::Configuration => "Check the MRDJ_* environment variables",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::User.is_retryable());
        assert!(!ErrorCategory::System.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(format!("{}", ErrorCategory::Configuration), "configuration");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Auth.recovery_hint().contains("Spotify"));
        assert!(ErrorCategory::User.recovery_hint().contains("current reply"));
    }
}
