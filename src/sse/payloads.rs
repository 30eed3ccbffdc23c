//! Raw JSON payload of a stream frame.

use serde::Deserialize;

/// Wire shape shared by all event kinds.
///
/// `playlist_data` stays untyped here so a playlist the client cannot read
/// does not make the whole `complete` event unreadable.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventPayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub playlist_data: Option<serde_json::Value>,
}
