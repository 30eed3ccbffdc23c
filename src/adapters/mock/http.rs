//! Mock HTTP client for testing.
//!
//! Returns canned responses per URL and records every request so tests can
//! assert on what the chat client sent (and how many times).

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// Request body (POST only)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail before any response is produced
    Error(HttpError),
    /// Stream these chunks, then end cleanly
    Stream(Vec<Bytes>),
    /// Stream these chunks, then fail with `error` mid-body
    BrokenStream { chunks: Vec<Bytes>, error: HttpError },
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use mrdj::adapters::mock::{MockHttpClient, MockResponse};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8000/api/chat/stream",
///     MockResponse::Stream(vec![Bytes::from("data: {\"type\":\"complete\",\"message\":\"hi\"}\n\n")]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL (exact match first, then prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of recorded requests whose URL equals `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::BrokenStream { .. }) => Err(
                HttpError::Other("Stream response on non-stream request".to_string()),
            ),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                let stream = futures::stream::iter(chunks.into_iter().map(Ok));
                Ok(Box::pin(stream))
            }
            Some(MockResponse::BrokenStream { chunks, error }) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(error)));
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::Success(response)) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: String::from_utf8_lossy(&response.body).into_owned(),
                })
            }
            Some(MockResponse::Success(_)) => Err(HttpError::Other(
                "Non-stream response on stream request".to_string(),
            )),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
