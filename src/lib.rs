//! Mr. DJ - streaming chat client for an AI playlist assistant
//!
//! The core is the stream reducer: [`sse::FrameAssembler`] turns a chunked
//! response body into frames, and [`state::TurnInterpreter`] folds the parsed
//! [`sse::ChatEvent`]s into the [`state::Conversation`] a host renders.
//! [`app::ChatApp`] drives one turn at a time on top of an
//! [`traits::HttpClient`].
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod cli_output;
pub mod client;
pub mod config;
pub mod error;
pub mod markdown;
pub mod models;
pub mod session;
pub mod sse;
pub mod state;
pub mod storage;
pub mod traits;
