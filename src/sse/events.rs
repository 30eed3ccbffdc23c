//! Chat stream event types.

use crate::models::PlaylistData;

/// One interpreted event from the chat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// Human-readable progress update
    Status { message: String },
    /// Backend started a unit of tool work
    ToolStart { tool: Option<String>, message: String },
    /// Backend finished the most recent unit of tool work
    ToolEnd { tool: Option<String>, message: String },
    /// Final answer; ends the turn successfully
    Complete {
        message: String,
        thread_id: Option<String>,
        playlist: Option<PlaylistData>,
    },
    /// Backend failure; ends the turn
    Error { message: String },
    /// A `type` this client does not know; ignored by the interpreter
    Unknown { kind: String },
}

impl ChatEvent {
    /// Event type name for logging.
    pub fn kind(&self) -> &str {
        match self {
            ChatEvent::Status { .. } => "status",
            ChatEvent::ToolStart { .. } => "tool_start",
            ChatEvent::ToolEnd { .. } => "tool_end",
            ChatEvent::Complete { .. } => "complete",
            ChatEvent::Error { .. } => "error",
            ChatEvent::Unknown { kind } => kind,
        }
    }

    /// Whether this event ends the turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::Complete { .. } | ChatEvent::Error { .. })
    }
}

/// Errors from interpreting a frame payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// Payload is not the expected JSON object
    InvalidJson { source: String },
    /// Payload parsed but has no `type`
    MissingType,
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::InvalidJson { source } => {
                write!(f, "Invalid JSON in stream frame: {}", source)
            }
            SseParseError::MissingType => write!(f, "Stream frame has no event type"),
        }
    }
}

impl std::error::Error for SseParseError {}
