//! Playlist shown next to the chat.

use crate::models::PlaylistData;

/// Holds the most recent playlist a turn produced.
///
/// A newer snapshot always replaces the older one, including a re-fetched
/// copy of the same playlist.
#[derive(Debug, Default)]
pub struct PlaylistSlot {
    current: Option<PlaylistData>,
    revision: u64,
}

impl PlaylistSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `playlist`, returning the one it displaced.
    pub fn replace(&mut self, playlist: PlaylistData) -> Option<PlaylistData> {
        self.revision += 1;
        self.current.replace(playlist)
    }

    pub fn current(&self) -> Option<&PlaylistData> {
        self.current.as_ref()
    }

    /// Bumped on every store or clear; lets a late re-fetch detect that it
    /// has been superseded.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn take(&mut self) -> Option<PlaylistData> {
        self.current.take()
    }

    /// Forget the playlist. Counts as a revision so older snapshots in
    /// flight are not shown afterwards.
    pub fn clear(&mut self) {
        self.revision += 1;
        self.current = None;
    }
}
