//! HTTP transport abstraction.
//!
//! The chat client only needs two operations from the network: a plain GET for
//! supplementary JSON (playlist details, health) and a POST whose body is read
//! incrementally as a byte stream. Keeping them behind a trait lets the turn
//! driver run against [`crate::adapters::mock::MockHttpClient`] in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Incrementally delivered response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection could not be established or was dropped
    ConnectionFailed(String),
    /// Request or body read timed out
    Timeout(String),
    /// Server answered with a non-success status
    ServerError { status: u16, message: String },
    /// Reading the body failed part-way through
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    Other(String),
}

impl HttpError {
    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "Stream read failed: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the HTTP operations the chat client performs.
///
/// # Example
///
/// ```ignore
/// use mrdj::traits::{Headers, HttpClient};
///
/// async fn ping<C: HttpClient>(client: &C) -> bool {
///     client
///         .get("http://localhost:8000/health", &Headers::new())
///         .await
///         .map(|r| r.is_success())
///         .unwrap_or(false)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and buffer the whole body.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request and return the body as a stream of chunks.
    ///
    /// A non-success status is reported as [`HttpError::ServerError`] before
    /// any chunk is yielded.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        assert!(Response::new(200, Bytes::new()).is_success());
        assert!(Response::new(204, Bytes::new()).is_success());
        assert!(!Response::new(401, Bytes::new()).is_success());
        assert!(!Response::new(500, Bytes::new()).is_success());
    }

    #[test]
    fn test_response_json() {
        let response = Response::new(200, Bytes::from(r#"{"status":"healthy"}"#));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["status"], "healthy");
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::ServerError {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (502): bad gateway");
        assert_eq!(
            HttpError::Io("reset by peer".to_string()).to_string(),
            "Stream read failed: reset by peer"
        );
    }

    #[test]
    fn test_http_error_status() {
        let err = HttpError::ServerError {
            status: 401,
            message: String::new(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(HttpError::Timeout("slow".to_string()).status(), None);
    }
}
