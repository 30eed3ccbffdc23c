//! CLI module for mrdj.
//!
//! This module provides command-line interface functionality:
//! - Argument parsing
//! - Version and usage display
//!
//! # Usage
//!
//! ```ignore
//! use mrdj::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args())? {
//!     CliCommand::Version => print_version(),
//!     CliCommand::Help => print_help(),
//!     CliCommand::Chat(options) => run_chat(options).await?,
//! }
//! ```

pub mod args;

pub use args::{parse_args, ChatOptions, CliCommand};

/// The current version of mrdj, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: mrdj [OPTIONS] [MESSAGE...]

Chat with Mr. DJ. With a MESSAGE, sends it and prints the reply.
Without one, reads one message per line from stdin.

Options:
      --ultrathink       Use the deep-reasoning model
      --theme <THEME>    Set and remember the theme (light or dark)
  -V, --version          Print version
  -h, --help             Print this help

Environment:
  MRDJ_API_URL, MRDJ_ACCESS_TOKEN, MRDJ_ULTRATHINK, MRDJ_PLAYLIST_REFETCH_MS, RUST_LOG";

pub fn version_string() -> String {
    format!("mrdj {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
        assert!(version_string().starts_with("mrdj "));
    }

    #[test]
    fn test_usage_mentions_every_flag() {
        for flag in ["--ultrathink", "--theme", "--version", "--help"] {
            assert!(USAGE.contains(flag), "missing {}", flag);
        }
    }
}
