use serde::{Deserialize, Serialize};

use super::tools::ToolPanel;

/// Identifier of a message within a [`crate::state::Conversation`].
pub type MessageId = u64;

/// What a conversation entry is, and the data needed to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    /// Text the user submitted
    User { text: String },
    /// Final assistant reply, or the synthetic error reply of a failed turn
    Assistant { text: String, is_error: bool },
    /// Latest progress string of the current turn
    Status { text: String },
    /// Grouped tool activity of the current turn
    ToolPanel(ToolPanel),
}

/// One entry in the conversation view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn new(id: MessageId, kind: MessageKind) -> Self {
        Self { id, kind }
    }

    /// Text content for text-bearing messages; `None` for tool panels.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::User { text }
            | MessageKind::Assistant { text, .. }
            | MessageKind::Status { text } => Some(text),
            MessageKind::ToolPanel(_) => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.kind, MessageKind::User { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, MessageKind::Assistant { is_error: true, .. })
    }

    pub fn tool_panel(&self) -> Option<&ToolPanel> {
        match &self.kind {
            MessageKind::ToolPanel(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn tool_panel_mut(&mut self) -> Option<&mut ToolPanel> {
        match &mut self.kind {
            MessageKind::ToolPanel(panel) => Some(panel),
            _ => None,
        }
    }

    /// Replace the text of a text-bearing message. Returns false for panels.
    pub fn set_text(&mut self, new_text: impl Into<String>) -> bool {
        match &mut self.kind {
            MessageKind::User { text }
            | MessageKind::Assistant { text, .. }
            | MessageKind::Status { text } => {
                *text = new_text.into();
                true
            }
            MessageKind::ToolPanel(_) => false,
        }
    }
}
