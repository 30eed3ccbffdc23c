//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP transport (buffered GET, streaming POST)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
