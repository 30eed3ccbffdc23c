//! Command-line argument parsing for the mrdj CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use crate::error::{DjError, DjResult};
use crate::storage::ThemePreference;

/// Options for a chat session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    /// Request the deep-reasoning model
    pub ultrathink: bool,
    /// Theme to use and remember
    pub theme: Option<ThemePreference>,
    /// One-shot message; `None` reads messages from stdin
    pub message: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Chat with the assistant (default)
    Chat(ChatOptions),
}

/// Parse command-line arguments and return the appropriate command.
///
/// Words that are not flags form the one-shot message. `--` ends flag
/// parsing so a message may start with a dash.
///
/// # Examples
///
/// ```
/// use mrdj::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["mrdj".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> DjResult<CliCommand>
where
    I: Iterator<Item = String>,
{
    let mut options = ChatOptions::default();
    let mut words: Vec<String> = Vec::new();
    let mut args = args.skip(1);
    let mut flags_done = false;

    while let Some(arg) = args.next() {
        if flags_done {
            words.push(arg);
            continue;
        }
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--ultrathink" => options.ultrathink = true,
            "--theme" => {
                let value = args
                    .next()
                    .ok_or_else(|| DjError::Config("--theme needs a value".to_string()))?;
                options.theme = Some(value.parse()?);
            }
            "--" => flags_done = true,
            flag if flag.starts_with("--theme=") => {
                options.theme = Some(flag["--theme=".len()..].parse()?);
            }
            flag if flag.starts_with("--") => {
                return Err(DjError::Config(format!("unknown option {}", flag)));
            }
            _ => words.push(arg.clone()),
        }
    }

    if !words.is_empty() {
        options.message = Some(words.join(" "));
    }
    Ok(CliCommand::Chat(options))
}
