//! Chat application driver.
//!
//! This module contains the [`ChatApp`] struct, which owns the session, the
//! conversation and the playlist slot, and drives one turn at a time:
//! - [`UiUpdate`] - Messages for the host's render loop
//! - `stream` - Turn submission and stream processing

mod messages;
mod stream;

pub use messages::UiUpdate;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::ChatClient;
use crate::config::ClientConfig;
use crate::error::{DjError, DjResult};
use crate::models::{MessageId, PlaylistData};
use crate::session::ClientSession;
use crate::state::{Conversation, ConversationChange, PlaylistSlot};
use crate::traits::HttpClient;

/// Sender half of the render loop's update channel.
pub type UpdateSender = mpsc::UnboundedSender<UiUpdate>;

/// Playlist slot shared with the background re-fetch task.
pub(crate) type SharedPlaylist = Arc<Mutex<PlaylistSlot>>;

pub struct ChatApp<H: HttpClient> {
    client: Arc<ChatClient<H>>,
    session: ClientSession,
    conversation: Conversation,
    playlist: SharedPlaylist,
    refetch_delay: Duration,
    refetch_task: Option<JoinHandle<()>>,
    update_tx: Option<UpdateSender>,
}

impl<H: HttpClient> ChatApp<H> {
    pub fn new(http: H, config: ClientConfig) -> Self {
        let refetch_delay = config.playlist_refetch_delay;
        Self {
            client: Arc::new(ChatClient::new(http)),
            session: config.into_session(),
            conversation: Conversation::new(),
            playlist: Arc::new(Mutex::new(PlaylistSlot::new())),
            refetch_delay,
            refetch_task: None,
            update_tx: None,
        }
    }

    /// Publish live updates to `tx` from now on.
    pub fn with_update_sender(mut self, tx: UpdateSender) -> Self {
        self.update_tx = Some(tx);
        self
    }

    pub fn client(&self) -> &ChatClient<H> {
        &self.client
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ClientSession {
        &mut self.session
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Snapshot of the playlist shown next to the chat.
    pub fn playlist(&self) -> Option<PlaylistData> {
        lock_slot(&self.playlist).current().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.conversation.is_loading()
    }

    /// Expand or collapse a tool panel. Allowed while a turn streams.
    pub fn toggle_panel(&mut self, id: MessageId) -> Option<bool> {
        let expanded = self.conversation.toggle_panel(id);
        self.publish_changes();
        expanded
    }

    /// Start over: empty conversation, new thread, no playlist.
    pub fn reset_conversation(&mut self) -> DjResult<()> {
        if self.conversation.is_loading() {
            return Err(DjError::TurnInProgress);
        }
        self.cancel_playlist_refresh();
        self.conversation.clear();
        self.session.reset();
        lock_slot(&self.playlist).clear();
        self.publish_changes();
        debug!("Conversation reset");
        Ok(())
    }

    fn publish_changes(&mut self) {
        publish_changes(&mut self.conversation, self.update_tx.as_ref());
    }

    /// Wait for a pending playlist re-fetch, if any, to finish.
    pub async fn wait_for_playlist_refresh(&mut self) {
        if let Some(task) = self.refetch_task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("Playlist refresh task failed: {}", e);
                }
            }
        }
    }

    fn cancel_playlist_refresh(&mut self) {
        if let Some(task) = self.refetch_task.take() {
            task.abort();
        }
    }
}

pub(crate) fn lock_slot(slot: &SharedPlaylist) -> MutexGuard<'_, PlaylistSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store a playlist and tell the render loop. Returns the slot revision it got.
pub(crate) fn show_playlist(
    slot: &SharedPlaylist,
    playlist: PlaylistData,
    tx: Option<&UpdateSender>,
) -> u64 {
    if let Some(tx) = tx {
        let _ = tx.send(UiUpdate::PlaylistUpdated(playlist.clone()));
    }
    let mut slot = lock_slot(slot);
    slot.replace(playlist);
    slot.revision()
}

/// Drain recorded changes and forward them as snapshots.
///
/// Changes are drained even without a receiver so the log stays bounded.
pub(crate) fn publish_changes(conversation: &mut Conversation, tx: Option<&UpdateSender>) {
    let changes = conversation.drain_changes();
    let tx = match tx {
        Some(tx) => tx,
        None => return,
    };

    for change in changes {
        let update = match change {
            ConversationChange::Added(id) => {
                conversation.get(id).cloned().map(UiUpdate::MessageAdded)
            }
            ConversationChange::Updated(id) => {
                conversation.get(id).cloned().map(UiUpdate::MessageUpdated)
            }
            ConversationChange::LoadingChanged(loading) => Some(UiUpdate::LoadingChanged(loading)),
            ConversationChange::Cleared => Some(UiUpdate::ConversationCleared),
        };
        if let Some(update) = update {
            let _ = tx.send(update);
        }
    }
}
