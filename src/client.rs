//! HTTP client for the Mr. DJ backend.
//!
//! Builds requests on top of any [`HttpClient`] so the streaming path can be
//! driven by [`crate::adapters::MockHttpClient`] in tests.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, Stream};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DjError, DjResult};
use crate::models::{ChatRequest, PlaylistData, UserProfile};
use crate::session::ClientSession;
use crate::sse::{parse_chat_event, parse_frame, ChatEvent, FrameAssembler};
use crate::traits::{ByteStream, HttpClient, HttpError};

pub const CHAT_STREAM_PATH: &str = "/api/chat/stream";
pub const HEALTH_PATH: &str = "/health";
pub const USER_PATH: &str = "/api/user";

/// Parsed events of one chat response.
///
/// Malformed frames surface as `Err(DjError::Stream)` and the stream keeps
/// going; a transport failure surfaces as `Err(DjError::Http)` and is the
/// last item.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ChatEvent, DjError>> + Send>>;

pub struct ChatClient<H: HttpClient> {
    http: H,
}

impl<H: HttpClient> ChatClient<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// Open the chat stream for `request` and return the raw body.
    pub async fn stream_chat(
        &self,
        session: &ClientSession,
        request: &ChatRequest,
    ) -> Result<ByteStream, HttpError> {
        let url = session.endpoint(CHAT_STREAM_PATH);
        let body = serde_json::to_string(request).map_err(|e| HttpError::Other(e.to_string()))?;

        let mut headers = session.auth_headers();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        debug!("POST {} (thread: {:?})", url, request.thread_id);
        self.http.post_stream(&url, &body, &headers).await
    }

    /// Open the chat stream and parse it into events.
    pub async fn stream_events(
        &self,
        session: &ClientSession,
        request: &ChatRequest,
    ) -> Result<EventStream, HttpError> {
        let body = self.stream_chat(session, request).await?;
        Ok(chat_events(body))
    }

    /// Fetch the current snapshot of a playlist.
    pub async fn fetch_playlist(
        &self,
        session: &ClientSession,
        playlist_id: &str,
    ) -> DjResult<PlaylistData> {
        self.get_json(session, &format!("/api/playlist/{}", playlist_id))
            .await
    }

    /// Fetch the profile of the signed-in user.
    pub async fn fetch_user(&self, session: &ClientSession) -> DjResult<UserProfile> {
        self.get_json(session, USER_PATH).await
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &ClientSession, path: &str) -> DjResult<T> {
        let url = session.endpoint(path);
        let response = self.http.get(&url, &session.auth_headers()).await?;

        if !response.is_success() {
            return Err(DjError::Http(HttpError::ServerError {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            }));
        }
        Ok(response.json()?)
    }

    /// Whether the backend answers its health endpoint.
    pub async fn health_check(&self, session: &ClientSession) -> DjResult<bool> {
        let url = session.endpoint(HEALTH_PATH);
        let response = self.http.get(&url, &session.auth_headers()).await?;
        Ok(response.is_success())
    }
}

struct EventState {
    body: ByteStream,
    assembler: FrameAssembler,
    frames: VecDeque<String>,
    done: bool,
}

/// Turn a chunked response body into chat events.
///
/// Frames are handed out in arrival order. When the body ends, any trailing
/// frame without a separator is parsed as well. After a transport error no
/// further frames are produced.
pub fn chat_events(body: ByteStream) -> EventStream {
    let state = EventState {
        body,
        assembler: FrameAssembler::new(),
        frames: VecDeque::new(),
        done: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(frame) = state.frames.pop_front() {
                let payload = match parse_frame(&frame) {
                    Some(payload) => payload,
                    None => continue,
                };
                debug!("SSE payload: {}", payload);
                let item = parse_chat_event(&payload).map_err(DjError::from);
                return Some((item, state));
            }

            if state.done {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let frames = state.assembler.push(&chunk);
                    state.frames.extend(frames);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(DjError::Http(e)), state));
                }
                None => {
                    state.done = true;
                    let trailing = state.assembler.finish();
                    state.frames.extend(trailing);
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockHttpClient, MockResponse};
    use crate::traits::Response;
    use bytes::Bytes;

    const BASE: &str = "http://dj.test";

    fn chunks(parts: &[&str]) -> Vec<Bytes> {
        parts.iter().map(|p| Bytes::from(p.to_string())).collect()
    }

    async fn collect(stream: EventStream) -> Vec<Result<ChatEvent, DjError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_stream_chat_sends_request() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://dj.test/api/chat/stream",
            MockResponse::Stream(Vec::new()),
        );
        let client = ChatClient::new(mock.clone());
        let mut session = ClientSession::new(BASE).with_token("tok");
        session.set_thread_id("t-9");

        let request = ChatRequest::for_session("chill vibes", &session);
        client.stream_chat(&session, &request).await.unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.method, "POST");
        assert_eq!(sent.headers["Authorization"], "Bearer tok");
        assert_eq!(sent.headers["Accept"], "text/event-stream");
        assert_eq!(sent.headers["Content-Type"], "application/json");

        let body: serde_json::Value =
            serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["message"], "chill vibes");
        assert_eq!(body["thread_id"], "t-9");
        assert!(body.get("ultrathink").is_none());
    }

    #[tokio::test]
    async fn test_events_survive_malformed_frame() {
        let body = chunks(&[
            "data: {\"type\":\"status\",\"message\":\"Hmm\"}\n\ndata: {\"type\":",
            "\"tool_start\",\"tool\":\"search\"}\n\ndata: {broken\n\n: ping\n\n",
            "data: {\"type\":\"complete\",\"message\":\"done\"}",
        ]);
        let body = stream::iter(body.into_iter().map(Ok::<Bytes, HttpError>));
        let events = collect(chat_events(Box::pin(body))).await;

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], Ok(ChatEvent::Status { .. })));
        assert!(matches!(events[1], Ok(ChatEvent::ToolStart { .. })));
        assert!(matches!(events[2], Err(DjError::Stream(_))));
        assert!(matches!(
            &events[3],
            Ok(ChatEvent::Complete { message, .. }) if message == "done"
        ));
    }

    #[tokio::test]
    async fn test_transport_error_ends_events() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::BrokenStream {
            chunks: chunks(&["data: {\"type\":\"status\",\"message\":\"a\"}\n\ndata: {\"ty"]),
            error: HttpError::Io("connection reset".to_string()),
        });
        let client = ChatClient::new(mock);
        let session = ClientSession::new(BASE);

        let events = collect(
            client
                .stream_events(&session, &ChatRequest::new("x"))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Ok(ChatEvent::Status { .. })));
        assert!(matches!(events[1], Err(DjError::Http(HttpError::Io(_)))));
    }

    #[tokio::test]
    async fn test_fetch_playlist() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://dj.test/api/playlist/pl1",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"id":"pl1","name":"Gym","tracks":[],"owner":null}"#),
            )),
        );
        let client = ChatClient::new(mock);
        let playlist = client
            .fetch_playlist(&ClientSession::new(BASE), "pl1")
            .await
            .unwrap();
        assert_eq!(playlist.name, "Gym");
        assert_eq!(playlist.owner, "Unknown");
        assert!(playlist.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_playlist_errors() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://dj.test/api/playlist/missing",
            MockResponse::Success(Response::new(404, Bytes::from("not found"))),
        );
        mock.set_response(
            "http://dj.test/api/playlist/garbled",
            MockResponse::Success(Response::new(200, Bytes::from("<html>"))),
        );
        let client = ChatClient::new(mock);
        let session = ClientSession::new(BASE);

        let err = client.fetch_playlist(&session, "missing").await.unwrap_err();
        assert!(matches!(
            err,
            DjError::Http(HttpError::ServerError { status: 404, .. })
        ));

        let err = client.fetch_playlist(&session, "garbled").await.unwrap_err();
        assert!(matches!(err, DjError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_user() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://dj.test/api/user",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(r#"{"id":"u1","display_name":"Dana","email":null}"#),
            )),
        );
        let client = ChatClient::new(mock.clone());
        let session = ClientSession::new(BASE).with_token("tok");

        let user = client.fetch_user(&session).await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.display_name, "Dana");
        assert!(user.email.is_none());
        assert!(user.images.is_empty());
        assert_eq!(mock.get_requests()[0].headers["Authorization"], "Bearer tok");
    }

    #[tokio::test]
    async fn test_fetch_user_unauthorized() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://dj.test/api/user",
            MockResponse::Success(Response::new(401, Bytes::from("Not authenticated"))),
        );
        let client = ChatClient::new(mock);

        let err = client.fetch_user(&ClientSession::new(BASE)).await.unwrap_err();
        assert_eq!(err.failure_cause(), Some(crate::error::FailureCause::AuthExpired));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://dj.test/health",
            MockResponse::Success(Response::new(200, Bytes::from("{\"status\":\"ok\"}"))),
        );
        let client = ChatClient::new(mock);
        assert!(client.health_check(&ClientSession::new(BASE)).await.unwrap());
    }
}
