//! Mock implementations for testing without network access.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
