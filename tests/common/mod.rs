//! Common test utilities for integration tests.
//!
//! Builders for stream bodies, playlists and a mock-backed app.

#![allow(dead_code)]

use std::time::Duration;

use bytes::Bytes;
use mrdj::adapters::{MockHttpClient, MockResponse};
use mrdj::app::ChatApp;
use mrdj::config::ClientConfig;
use mrdj::traits::Response;
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://dj.test";
pub const STREAM_URL: &str = "http://dj.test/api/chat/stream";

/// Encode events as one SSE frame each.
pub fn sse_body(events: &[Value]) -> String {
    events
        .iter()
        .map(|event| format!("data: {}\n\n", event))
        .collect()
}

/// Split a body into fixed-size byte chunks, ignoring character boundaries.
pub fn chunked(body: &str, size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(size)
        .map(Bytes::copy_from_slice)
        .collect()
}

pub fn status(message: &str) -> Value {
    json!({ "type": "status", "message": message })
}

pub fn tool_start(label: &str) -> Value {
    json!({ "type": "tool_start", "tool": "spotify", "message": label })
}

pub fn tool_end() -> Value {
    json!({ "type": "tool_end", "message": "" })
}

pub fn complete(message: &str) -> Value {
    json!({ "type": "complete", "message": message, "thread_id": "thread-1" })
}

pub fn complete_with_playlist(message: &str, playlist: Value) -> Value {
    json!({
        "type": "complete",
        "message": message,
        "thread_id": "thread-1",
        "playlist_data": playlist,
    })
}

/// Playlist JSON with `count` generated tracks.
pub fn playlist_json(id: &str, count: usize) -> Value {
    let tracks: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("track-{}", i),
                "name": format!("Song {}", i),
                "artist": "Artist",
                "album": "Album",
                "uri": format!("spotify:track:{}", i),
                "duration_ms": 200_000,
                "popularity": 50,
                "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", i) }
            })
        })
        .collect();
    json!({
        "id": id,
        "name": "Test Mix",
        "description": "generated",
        "public": false,
        "collaborative": false,
        "total_tracks": count,
        "owner": "mrdj",
        "tracks": tracks,
        "images": [],
    })
}

pub fn playlist_url(id: &str) -> String {
    format!("{}/api/playlist/{}", BASE_URL, id)
}

pub fn json_response(value: &Value) -> MockResponse {
    MockResponse::Success(Response::new(200, Bytes::from(value.to_string())))
}

pub fn test_config() -> ClientConfig {
    ClientConfig::default()
        .with_api_url(BASE_URL)
        .with_playlist_refetch_delay(Duration::from_millis(5))
}

/// App backed by `mock`; the mock stays inspectable through its clones.
pub fn test_app(mock: &MockHttpClient) -> ChatApp<MockHttpClient> {
    ChatApp::new(mock.clone(), test_config())
}
