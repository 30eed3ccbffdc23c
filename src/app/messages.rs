//! UiUpdate enum for pushing conversation changes to the render loop.

use crate::models::{ChatMessage, PlaylistData};

/// Live updates published while a turn streams.
///
/// Messages carry a snapshot so the receiver can render without borrowing
/// the app.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// A message was appended or inserted
    MessageAdded(ChatMessage),
    /// A message's text or tool panel changed
    MessageUpdated(ChatMessage),
    /// The conversation was reset
    ConversationCleared,
    /// A turn started (`true`) or ended (`false`)
    LoadingChanged(bool),
    /// A new playlist should be shown next to the chat
    PlaylistUpdated(PlaylistData),
}
