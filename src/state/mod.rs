//! Application state management
//!
//! This module contains the state the host renders:
//! - Conversation: ordered message list plus the loading flag
//! - TurnInterpreter: folds one streamed reply into the conversation
//! - PlaylistSlot: the playlist shown next to the chat

mod conversation;
mod playlist;
mod turn;

pub use conversation::{Conversation, ConversationChange};
pub use playlist::PlaylistSlot;
pub use turn::{
    TurnInterpreter, TurnOutcome, TurnPhase, TurnResult, COMPLETION_STATUS, FAILURE_STATUS,
};
