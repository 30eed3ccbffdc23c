//! Stream parsing logic
//!
//! Frames come out of [`FrameAssembler`]; [`parse_frame`] pulls the `data:`
//! payload out of a frame and [`parse_chat_event`] turns the payload into a
//! typed [`ChatEvent`].

mod frames;

pub use frames::FrameAssembler;

use tracing::warn;

use crate::models::PlaylistData;
use crate::sse::events::{ChatEvent, SseParseError};
use crate::sse::payloads::EventPayload;

/// Extract the data payload of a frame.
///
/// Only `data:` lines count; a single space after the colon is stripped and
/// multiple data lines are joined with `\n`. Comments (`:`) and other fields
/// are skipped. A frame without data lines yields `None`.
pub fn parse_frame(frame: &str) -> Option<String> {
    let mut lines = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .peekable();

    lines.peek()?;
    Some(lines.collect::<Vec<_>>().join("\n"))
}

/// Parse a frame payload into a [`ChatEvent`].
///
/// Unknown `type` values become [`ChatEvent::Unknown`]. A `playlist_data`
/// that does not match the playlist shape is dropped with a warning and the
/// rest of the event is kept.
pub fn parse_chat_event(payload: &str) -> Result<ChatEvent, SseParseError> {
    let payload: EventPayload =
        serde_json::from_str(payload).map_err(|e| SseParseError::InvalidJson {
            source: e.to_string(),
        })?;

    let kind = payload.kind.ok_or(SseParseError::MissingType)?;
    let message = payload.message.unwrap_or_default();

    let event = match kind.as_str() {
        "status" => ChatEvent::Status { message },
        "tool_start" => ChatEvent::ToolStart {
            tool: payload.tool,
            message,
        },
        "tool_end" => ChatEvent::ToolEnd {
            tool: payload.tool,
            message,
        },
        "complete" => ChatEvent::Complete {
            message,
            thread_id: payload.thread_id,
            playlist: payload.playlist_data.and_then(parse_playlist),
        },
        "error" => ChatEvent::Error { message },
        _ => ChatEvent::Unknown { kind },
    };
    Ok(event)
}

fn parse_playlist(value: serde_json::Value) -> Option<PlaylistData> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(playlist) => Some(playlist),
        Err(e) => {
            warn!("Ignoring unreadable playlist in complete event: {}", e);
            None
        }
    }
}
