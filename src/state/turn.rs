//! Per-turn stream interpretation
//!
//! TurnInterpreter folds the events of one chat response into the
//! [`Conversation`]: a lazily created status line, a tool panel grouping the
//! backend's tool work, and exactly one final assistant message.
//!
//! Status text that arrives before any tool work is held back and only shown
//! once the first tool starts, so a quick answer never flashes a status line.

use tracing::{debug, warn};

use super::conversation::Conversation;
use crate::error::FailureCause;
use crate::models::{MessageId, MessageKind, PlaylistData, ToolPanel};
use crate::sse::ChatEvent;

/// Status line text once the turn completed.
pub const COMPLETION_STATUS: &str = "Playlist ready";
/// Status line text once the turn failed.
pub const FAILURE_STATUS: &str = "Something went wrong";

const DEFAULT_TOOL_LABEL: &str = "Working";
const EMPTY_REPLY: &str = "Sorry, I couldn't put a reply together. Please try again.";
const EMPTY_ERROR: &str = "Something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    AwaitingFirstEvent,
    Streaming,
    Terminal(TurnResult),
}

/// What the host learns when a turn ends.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Completed {
        message: String,
        thread_id: Option<String>,
        playlist: Option<PlaylistData>,
    },
    Failed {
        message: String,
    },
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }

    /// Text of the final assistant message.
    pub fn message(&self) -> &str {
        match self {
            TurnOutcome::Completed { message, .. } | TurnOutcome::Failed { message } => message,
        }
    }

    pub fn thread_id(&self) -> Option<&str> {
        match self {
            TurnOutcome::Completed { thread_id, .. } => thread_id.as_deref(),
            TurnOutcome::Failed { .. } => None,
        }
    }

    /// Move the attached playlist out, leaving `None` behind.
    pub fn take_playlist(&mut self) -> Option<PlaylistData> {
        match self {
            TurnOutcome::Completed { playlist, .. } => playlist.take(),
            TurnOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct TurnInterpreter {
    phase: TurnPhase,
    pending_status: Option<String>,
    status_id: Option<MessageId>,
    panel_id: Option<MessageId>,
}

impl TurnInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh turn, forgetting any previous one.
    pub fn begin(&mut self) {
        *self = Self {
            phase: TurnPhase::AwaitingFirstEvent,
            ..Self::default()
        };
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, TurnPhase::Terminal(_))
    }

    /// Status text held back until the first tool starts.
    pub fn pending_status(&self) -> Option<&str> {
        self.pending_status.as_deref()
    }

    pub fn status_id(&self) -> Option<MessageId> {
        self.status_id
    }

    pub fn panel_id(&self) -> Option<MessageId> {
        self.panel_id
    }

    /// Apply one event.
    ///
    /// Returns the outcome only for the event that ends the turn; every
    /// event after that is ignored.
    pub fn apply(
        &mut self,
        event: ChatEvent,
        conversation: &mut Conversation,
    ) -> Option<TurnOutcome> {
        match self.phase {
            TurnPhase::Terminal(_) => {
                debug!("Ignoring {} event after the turn ended", event.kind());
                return None;
            }
            TurnPhase::Idle => debug!("Event {} arrived before begin()", event.kind()),
            TurnPhase::AwaitingFirstEvent | TurnPhase::Streaming => {}
        }
        if let ChatEvent::Unknown { kind } = &event {
            debug!("Ignoring unknown event type: {}", kind);
            return None;
        }
        self.phase = TurnPhase::Streaming;

        match event {
            ChatEvent::Status { message } => {
                self.on_status(message, conversation);
                None
            }
            ChatEvent::ToolStart { tool, message } => {
                self.on_tool_start(tool, message, conversation);
                None
            }
            ChatEvent::ToolEnd { .. } => {
                self.on_tool_end(conversation);
                None
            }
            ChatEvent::Complete {
                message,
                thread_id,
                playlist,
            } => Some(self.on_complete(message, thread_id, playlist, conversation)),
            ChatEvent::Error { message } => Some(self.on_error(message, conversation)),
            ChatEvent::Unknown { .. } => None,
        }
    }

    /// End the turn because the transport failed.
    pub fn fail_transport(
        &mut self,
        cause: FailureCause,
        conversation: &mut Conversation,
    ) -> Option<TurnOutcome> {
        if self.is_terminal() {
            debug!("Ignoring transport failure after the turn ended: {}", cause);
            return None;
        }
        warn!("Chat stream failed [{}]: {}", cause.error_code(), cause);
        Some(self.on_error(cause.user_message(), conversation))
    }

    /// The body ended. Without a terminal event that counts as a failure.
    pub fn finish_stream(&mut self, conversation: &mut Conversation) -> Option<TurnOutcome> {
        if self.is_terminal() {
            return None;
        }
        self.fail_transport(
            FailureCause::Generic {
                detail: "the stream ended unexpectedly".to_string(),
            },
            conversation,
        )
    }

    fn panel<'c>(&self, conversation: &'c mut Conversation) -> Option<&'c mut ToolPanel> {
        conversation.panel_mut(self.panel_id?)
    }

    fn on_status(&mut self, text: String, conversation: &mut Conversation) {
        let panel_id = match self.panel_id {
            Some(id) => id,
            None => {
                self.pending_status = Some(text);
                return;
            }
        };

        match self.status_id {
            Some(id) => {
                conversation.set_text(id, text);
            }
            None => {
                let id = conversation.insert_before(panel_id, MessageKind::Status { text });
                self.status_id = Some(id);
            }
        }
    }

    fn on_tool_start(
        &mut self,
        tool: Option<String>,
        message: String,
        conversation: &mut Conversation,
    ) {
        let label = if !message.trim().is_empty() {
            message
        } else {
            tool.filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOOL_LABEL.to_string())
        };

        let panel_id = match self.panel_id {
            Some(id) => id,
            None => {
                if let Some(text) = self.pending_status.take() {
                    self.status_id = Some(conversation.push(MessageKind::Status { text }));
                }
                let id = conversation.push(MessageKind::ToolPanel(ToolPanel::new()));
                self.panel_id = Some(id);
                id
            }
        };

        if let Some(panel) = conversation.panel_mut(panel_id) {
            let activity = panel.start(&label);
            debug!("Tool activity {} active: {}", activity.id, activity.label);
        }
    }

    fn on_tool_end(&mut self, conversation: &mut Conversation) {
        let ended = self
            .panel(conversation)
            .map(|panel| panel.end_latest_active())
            .unwrap_or(false);
        if !ended {
            debug!("tool_end with no active tool");
        }
    }

    fn on_complete(
        &mut self,
        message: String,
        thread_id: Option<String>,
        playlist: Option<PlaylistData>,
        conversation: &mut Conversation,
    ) -> TurnOutcome {
        if let Some(panel) = self.panel(conversation) {
            panel.complete_all_active();
            panel.collapse();
        }
        if let Some(id) = self.status_id {
            conversation.set_text(id, COMPLETION_STATUS);
        }
        self.pending_status = None;

        let message = if message.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            message
        };
        conversation.push(MessageKind::Assistant {
            text: message.clone(),
            is_error: false,
        });
        self.phase = TurnPhase::Terminal(TurnResult::Success);

        TurnOutcome::Completed {
            message,
            thread_id,
            playlist,
        }
    }

    fn on_error(&mut self, message: String, conversation: &mut Conversation) -> TurnOutcome {
        if let Some(panel) = self.panel(conversation) {
            panel.mark_last_error();
        }
        if let Some(id) = self.status_id {
            conversation.set_text(id, FAILURE_STATUS);
        }
        self.pending_status = None;

        let message = if message.trim().is_empty() {
            EMPTY_ERROR.to_string()
        } else {
            message
        };
        conversation.push(MessageKind::Assistant {
            text: message.clone(),
            is_error: true,
        });
        self.phase = TurnPhase::Terminal(TurnResult::Error);

        TurnOutcome::Failed { message }
    }
}
