//! Concrete implementations of the trait abstractions in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//!
//! The [`mock`] submodule provides [`mock::MockHttpClient`] for tests.

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
