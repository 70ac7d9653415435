//! The HTTP boundary.
//!
//! All network I/O goes through the [`HttpTransport`] trait so that every
//! component above it can be exercised with scripted fakes. Status codes are
//! converted into the structured [`FetchError`] taxonomy in exactly one
//! place ([`HttpResponse::into_body`]); nothing above this boundary parses
//! status codes or error text.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::FetchError;

/// Browser user agent sent with every request. Both upstream sources answer
/// differently (or not at all) to default library agents.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A plain GET transport returning status and body.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a GET request. Transport-level failures (connect, timeout)
    /// surface as [`FetchError::Network`]; any received response, including
    /// error statuses, is returned as an [`HttpResponse`].
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// A received HTTP response, before status classification.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Classify the status and yield the body on success.
    ///
    /// * 2xx - body
    /// * 404 - [`FetchError::NotFound`] (terminal per URL)
    /// * 429 - [`FetchError::RateLimited`]
    /// * anything else - [`FetchError::Status`]
    pub fn into_body(self, url: &str, provider: &str) -> Result<String, FetchError> {
        match self.status {
            200..=299 => Ok(self.body),
            404 => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
            429 => Err(FetchError::RateLimited {
                provider: provider.to_string(),
            }),
            code => Err(FetchError::Status {
                provider: provider.to_string(),
                code,
            }),
        }
    }
}

/// Production transport backed by a shared [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
