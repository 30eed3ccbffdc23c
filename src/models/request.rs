use serde::{Deserialize, Serialize};

use crate::session::ClientSession;

/// Body of the streaming chat request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,
    /// Existing conversation thread; `None` starts a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Use the slower, deeper-reasoning model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultrathink: Option<bool>,
}

impl ChatRequest {
    /// Request that starts a new thread.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            thread_id: None,
            ultrathink: None,
        }
    }

    /// Build a request carrying the session's thread and feature flag.
    pub fn for_session(message: impl Into<String>, session: &ClientSession) -> Self {
        Self::new(message)
            .with_thread_id(session.thread_id().map(String::from))
            .with_ultrathink(session.ultrathink())
    }

    pub fn with_thread_id(mut self, thread_id: Option<String>) -> Self {
        self.thread_id = thread_id;
        self
    }

    /// Only an enabled flag is sent; the backend default is off.
    pub fn with_ultrathink(mut self, enabled: bool) -> Self {
        self.ultrathink = enabled.then_some(true);
        self
    }
}
