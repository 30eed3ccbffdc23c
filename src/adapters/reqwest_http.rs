//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`].

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use mrdj::adapters::ReqwestHttpClient;
/// use mrdj::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.get("http://localhost:8000/health", &Headers::new()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wrap a preconfigured `reqwest::Client` (custom TLS, proxies, pools).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = Self::apply_headers(self.client.get(url), headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let builder = Self::apply_headers(self.client.post(url).body(body.to_string()), headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_http_client_with_custom_client() {
        let custom = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let client = ReqwestHttpClient::with_client(custom);
        let _ = client.inner();
    }

    #[test]
    fn test_apply_headers() {
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer token".to_string());

        let client = reqwest::Client::new();
        let builder = ReqwestHttpClient::apply_headers(client.get("http://localhost/"), &headers);
        let request = builder.build().unwrap();

        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer token"
        );
    }

    #[tokio::test]
    async fn test_get_unreachable_server_is_connection_error() {
        let client = ReqwestHttpClient::new();
        let result = client.get("http://127.0.0.1:1/health", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::ConnectionFailed(_))));
    }
}
