//! Playlist snapshot attached to a completed turn.
//!
//! The backend builds these from Spotify data. Deserialization is forgiving
//! because a freshly created playlist reports `tracks` as a bare count and may
//! leave `owner` or `images` null.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One track in a generated playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub id: String,
    pub name: String,
    /// Comma-joined artist names
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    /// Spotify popularity, 0-100
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub album_cover: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_urls: BTreeMap<String, String>,
}

impl PlaylistTrack {
    /// Duration formatted as `m:ss`.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_ms)
    }

    /// Link to the track on Spotify, if the backend provided one.
    pub fn spotify_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }
}

/// Cover image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistImage {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// A generated playlist as shown next to the chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistData {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default = "unknown_owner", deserialize_with = "owner_or_unknown")]
    pub owner: String,
    #[serde(default, deserialize_with = "tracks_or_count")]
    pub tracks: Vec<PlaylistTrack>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<PlaylistImage>,
    /// Playlist link (present right after creation)
    #[serde(default)]
    pub url: Option<String>,
}

impl PlaylistData {
    /// True when the snapshot carries no track list yet.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration_ms).sum()
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|img| img.url.as_str())
    }
}

/// Format milliseconds as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

fn unknown_owner() -> String {
    "Unknown".to_string()
}

fn owner_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let owner = Option::<String>::deserialize(deserializer)?;
    Ok(owner.filter(|o| !o.is_empty()).unwrap_or_else(unknown_owner))
}

pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TracksField {
    List(Vec<PlaylistTrack>),
    Count(u64),
}

fn tracks_or_count<'de, D>(deserializer: D) -> Result<Vec<PlaylistTrack>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<TracksField>::deserialize(deserializer)? {
        Some(TracksField::List(tracks)) => Ok(tracks),
        Some(TracksField::Count(_)) | None => Ok(Vec::new()),
    }
}
