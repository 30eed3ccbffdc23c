//! Turn submission and stream processing for the ChatApp.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use super::{lock_slot, publish_changes, show_playlist, ChatApp, SharedPlaylist, UpdateSender};
use crate::client::ChatClient;
use crate::error::{classify_http_error, DjError, DjResult};
use crate::models::{ChatRequest, PlaylistData};
use crate::session::ClientSession;
use crate::state::{Conversation, TurnInterpreter, TurnOutcome, FAILURE_STATUS};
use crate::traits::{HttpClient, HttpError};

/// Clears the loading flag however the turn ends, including when the
/// `send_message` future is dropped mid-stream.
struct LoadingGuard<'a> {
    conversation: &'a mut Conversation,
}

impl Deref for LoadingGuard<'_> {
    type Target = Conversation;

    fn deref(&self) -> &Conversation {
        self.conversation
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Conversation {
        self.conversation
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.conversation.end_turn();
    }
}

impl<H: HttpClient + 'static> ChatApp<H> {
    /// Submit a user message and stream the reply into the conversation.
    ///
    /// Returns `TurnInProgress` while a previous reply is still streaming and
    /// `EmptyMessage` for blank input; every other failure ends the turn with
    /// an error message in the conversation and is reported through the
    /// returned outcome.
    ///
    /// Returns as soon as the turn is terminal. A zero-track playlist on
    /// completion is re-fetched once in the background after the configured
    /// delay; see [`ChatApp::wait_for_playlist_refresh`].
    pub async fn send_message(&mut self, text: &str) -> DjResult<TurnOutcome> {
        self.conversation.begin_turn(text)?;
        self.publish_changes();
        info!("Turn started (thread: {:?})", self.session.thread_id());

        let request = ChatRequest::for_session(text.trim(), &self.session);
        let mut outcome = {
            let mut conversation = LoadingGuard {
                conversation: &mut self.conversation,
            };
            run_turn(
                &self.client,
                &self.session,
                &request,
                &mut conversation,
                self.update_tx.as_ref(),
            )
            .await
        };
        self.publish_changes();
        info!("Turn finished (success: {})", outcome.is_success());

        if let Some(thread_id) = outcome.thread_id() {
            self.session.set_thread_id(thread_id);
        }
        if let Some(playlist) = outcome.take_playlist() {
            self.hand_off_playlist(playlist);
        }
        Ok(outcome)
    }

    /// Show a turn's playlist, scheduling one re-fetch if it came without
    /// tracks. A newer playlist cancels the pending re-fetch.
    fn hand_off_playlist(&mut self, playlist: PlaylistData) {
        self.cancel_playlist_refresh();
        let refetch_id = (playlist.is_empty() && !playlist.id.is_empty())
            .then(|| playlist.id.clone());
        let revision = show_playlist(&self.playlist, playlist, self.update_tx.as_ref());

        let playlist_id = match refetch_id {
            Some(id) => id,
            None => return,
        };

        debug!(
            "Playlist {} has no tracks yet, re-fetching in {:?}",
            playlist_id, self.refetch_delay
        );
        self.refetch_task = Some(tokio::spawn(refresh_playlist(
            Arc::clone(&self.client),
            self.session.clone(),
            playlist_id,
            self.refetch_delay,
            Arc::clone(&self.playlist),
            revision,
            self.update_tx.clone(),
        )));
    }
}

/// Fetch a playlist once after `delay` and show it if it now has tracks.
///
/// The result is dropped when the slot moved past `revision` in the
/// meantime. Failures are logged only.
async fn refresh_playlist<H: HttpClient>(
    client: Arc<ChatClient<H>>,
    session: ClientSession,
    playlist_id: String,
    delay: Duration,
    slot: SharedPlaylist,
    revision: u64,
    update_tx: Option<UpdateSender>,
) {
    tokio::time::sleep(delay).await;

    let fresh = match client.fetch_playlist(&session, &playlist_id).await {
        Ok(fresh) if !fresh.is_empty() => fresh,
        Ok(_) => {
            debug!("Playlist {} still has no tracks", playlist_id);
            return;
        }
        Err(e) => {
            warn!("Failed to refresh playlist {}: {}", playlist_id, e);
            return;
        }
    };

    if lock_slot(&slot).revision() != revision {
        debug!("Playlist {} was superseded before its refresh", playlist_id);
        return;
    }
    debug!("Playlist {} now has {} tracks", playlist_id, fresh.tracks.len());
    show_playlist(&slot, fresh, update_tx.as_ref());
}

/// Stream one reply and fold it into the conversation.
///
/// Always yields an outcome; the conversation holds exactly one final
/// assistant or error message for the turn afterwards.
async fn run_turn<H: HttpClient>(
    client: &ChatClient<H>,
    session: &ClientSession,
    request: &ChatRequest,
    conversation: &mut Conversation,
    update_tx: Option<&UpdateSender>,
) -> TurnOutcome {
    let mut turn = TurnInterpreter::new();
    turn.begin();

    let outcome = match client.stream_events(session, request).await {
        Ok(mut events) => loop {
            match events.next().await {
                Some(Ok(event)) => {
                    debug!("Applying {} event", event.kind());
                    let terminal = event.is_terminal();
                    let outcome = turn.apply(event, conversation);
                    publish_changes(conversation, update_tx);
                    if terminal {
                        break outcome;
                    }
                }
                Some(Err(DjError::Http(e))) => break fail_transport(&mut turn, e, conversation),
                Some(Err(e)) => warn!("Skipping unreadable stream frame: {}", e),
                None => break turn.finish_stream(conversation),
            }
        },
        Err(e) => fail_transport(&mut turn, e, conversation),
    };
    publish_changes(conversation, update_tx);

    outcome.unwrap_or_else(|| TurnOutcome::Failed {
        message: FAILURE_STATUS.to_string(),
    })
}

fn fail_transport(
    turn: &mut TurnInterpreter,
    err: HttpError,
    conversation: &mut Conversation,
) -> Option<TurnOutcome> {
    let cause = classify_http_error(&err);
    let category = DjError::Http(err).category();
    debug!(
        "Transport failure is {} (retryable: {})",
        category,
        category.is_retryable()
    );
    turn.fail_transport(cause, conversation)
}
