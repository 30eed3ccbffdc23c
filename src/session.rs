//! Per-client conversation context.

use crate::traits::Headers;

/// State that spans turns: where the backend lives, which thread the
/// conversation continues, and how requests are flagged and authorized.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSession {
    base_url: String,
    thread_id: Option<String>,
    ultrathink: bool,
    access_token: Option<String>,
}

impl ClientSession {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            thread_id: None,
            ultrathink: false,
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_ultrathink(mut self, enabled: bool) -> Self {
        self.ultrathink = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Thread the next request continues, if any.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn set_thread_id(&mut self, thread_id: impl Into<String>) {
        self.thread_id = Some(thread_id.into());
    }

    pub fn ultrathink(&self) -> bool {
        self.ultrathink
    }

    pub fn set_ultrathink(&mut self, enabled: bool) {
        self.ultrathink = enabled;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Forget the current thread so the next message starts a new one.
    ///
    /// Connection settings and the feature flag are kept.
    pub fn reset(&mut self) {
        self.thread_id = None;
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Authorization header when a token is configured.
    pub fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = &self.access_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }
}
