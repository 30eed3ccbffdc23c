//! Ordered conversation view state
//!
//! Conversation owns the message list the host renders. Every mutation is
//! recorded as a [`ConversationChange`] so a render loop can redraw only what
//! moved since it last looked.

use crate::error::{DjError, DjResult};
use crate::models::{ChatMessage, MessageId, MessageKind, ToolPanel};

/// A mutation since the last [`Conversation::drain_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationChange {
    Added(MessageId),
    Updated(MessageId),
    LoadingChanged(bool),
    Cleared,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
    loading: bool,
    changes: Vec<ConversationChange>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user's message and mark the conversation loading.
    ///
    /// Rejected while a previous turn is still loading.
    pub fn begin_turn(&mut self, text: &str) -> DjResult<MessageId> {
        if self.loading {
            return Err(DjError::TurnInProgress);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(DjError::EmptyMessage);
        }

        let id = self.push(MessageKind::User {
            text: text.to_string(),
        });
        self.set_loading(true);
        Ok(id)
    }

    /// Clear the loading flag. Safe to call more than once.
    pub fn end_turn(&mut self) {
        self.set_loading(false);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn get_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        self.next_id
    }

    pub fn push(&mut self, kind: MessageKind) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(ChatMessage::new(id, kind));
        self.changes.push(ConversationChange::Added(id));
        id
    }

    /// Insert directly before `anchor`, or append if `anchor` is gone.
    pub fn insert_before(&mut self, anchor: MessageId, kind: MessageKind) -> MessageId {
        let id = self.allocate_id();
        let message = ChatMessage::new(id, kind);
        match self.position(anchor) {
            Some(index) => self.messages.insert(index, message),
            None => self.messages.push(message),
        }
        self.changes.push(ConversationChange::Added(id));
        id
    }

    /// Replace the text of a message. Returns false if it has no text.
    pub fn set_text(&mut self, id: MessageId, text: impl Into<String>) -> bool {
        let updated = self
            .get_mut(id)
            .map(|message| message.set_text(text))
            .unwrap_or(false);
        if updated {
            self.changes.push(ConversationChange::Updated(id));
        }
        updated
    }

    /// Mutable access to a tool panel; the message is recorded as updated.
    pub fn panel_mut(&mut self, id: MessageId) -> Option<&mut ToolPanel> {
        let index = self.position(id)?;
        if self.messages[index].tool_panel().is_none() {
            return None;
        }
        self.changes.push(ConversationChange::Updated(id));
        self.messages[index].tool_panel_mut()
    }

    /// Flip a panel's expanded flag. Returns the new state.
    pub fn toggle_panel(&mut self, id: MessageId) -> Option<bool> {
        self.panel_mut(id).map(ToolPanel::toggle)
    }

    /// Drop all messages. The loading flag is left alone.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.changes.push(ConversationChange::Cleared);
    }

    /// Take the mutations recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<ConversationChange> {
        std::mem::take(&mut self.changes)
    }

    fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.changes.push(ConversationChange::LoadingChanged(loading));
        }
    }
}
