//! Client configuration.
//!
//! Defaults suit a backend running locally. Environment variables override
//! them:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MRDJ_API_URL` | Backend base URL | `http://localhost:8000` |
//! | `MRDJ_ACCESS_TOKEN` | Bearer token passed through to the backend | none |
//! | `MRDJ_ULTRATHINK` | `1`/`true` enables deep reasoning | off |
//! | `MRDJ_PLAYLIST_REFETCH_MS` | Delay before re-fetching an empty playlist | `2000` |

use std::time::Duration;

use crate::error::{DjError, DjResult};
use crate::session::ClientSession;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PLAYLIST_REFETCH_MS: u64 = 2000;

/// Connection and behavior settings for a chat client.
///
/// ```ignore
/// use mrdj::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_url("https://dj.example.com")
///     .with_ultrathink(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: String,
    /// Bearer token, sent as-is
    pub access_token: Option<String>,
    /// Request the deep-reasoning model
    pub ultrathink: bool,
    /// Wait before the single re-fetch of a playlist that arrived without tracks
    pub playlist_refetch_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            ultrathink: false,
            playlist_refetch_delay: Duration::from_millis(DEFAULT_PLAYLIST_REFETCH_MS),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_ultrathink(mut self, enabled: bool) -> Self {
        self.ultrathink = enabled;
        self
    }

    pub fn with_playlist_refetch_delay(mut self, delay: Duration) -> Self {
        self.playlist_refetch_delay = delay;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> DjResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read configuration through a lookup function.
    pub fn from_vars<F>(lookup: F) -> DjResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("MRDJ_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(token) = lookup("MRDJ_ACCESS_TOKEN").filter(|v| !v.trim().is_empty()) {
            config.access_token = Some(token.trim().to_string());
        }
        if let Some(flag) = lookup("MRDJ_ULTRATHINK") {
            config.ultrathink = parse_flag(&flag);
        }
        if let Some(ms) = lookup("MRDJ_PLAYLIST_REFETCH_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                DjError::Config(format!("MRDJ_PLAYLIST_REFETCH_MS is not a number: {}", ms))
            })?;
            config.playlist_refetch_delay = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DjResult<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(DjError::Config(format!(
                "API URL must start with http:// or https://, got {}",
                self.api_url
            )));
        }
        Ok(())
    }

    /// Build the session the client starts with.
    pub fn into_session(self) -> ClientSession {
        let session = ClientSession::new(self.api_url).with_ultrathink(self.ultrathink);
        match self.access_token {
            Some(token) => session.with_token(token),
            None => session,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.playlist_refetch_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_vars(vars(&[
            ("MRDJ_API_URL", "https://dj.example.com"),
            ("MRDJ_ACCESS_TOKEN", "secret"),
            ("MRDJ_ULTRATHINK", "TRUE"),
            ("MRDJ_PLAYLIST_REFETCH_MS", "50"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://dj.example.com");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert!(config.ultrathink);
        assert_eq!(config.playlist_refetch_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ClientConfig::from_vars(vars(&[("MRDJ_PLAYLIST_REFETCH_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, DjError::Config(_)));

        let err = ClientConfig::from_vars(vars(&[("MRDJ_API_URL", "localhost:8000")]))
            .unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_into_session() {
        let session = ClientConfig::new()
            .with_api_url("http://dj.local/")
            .with_access_token("tok")
            .with_ultrathink(true)
            .into_session();
        assert_eq!(session.base_url(), "http://dj.local");
        assert_eq!(session.access_token(), Some("tok"));
        assert!(session.ultrathink());
        assert_eq!(session.thread_id(), None);
    }
}
