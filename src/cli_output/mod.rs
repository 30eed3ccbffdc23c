//! CLI output utilities for printing the conversation as plain lines.
//!
//! This module turns conversation messages and playlists into terminal text,
//! honoring each block's direction and the chosen theme.

mod transcript;

pub use transcript::*;
