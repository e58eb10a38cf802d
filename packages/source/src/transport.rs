//! HTTP transport abstraction.
//!
//! The failover fetcher talks to endpoints through the [`Transport`] trait
//! rather than `reqwest` directly, so its ordering and short-circuit
//! behavior can be verified against a scripted stub without a live network.

use std::time::Duration;

use async_trait::async_trait;

use crate::SourceError;

/// Browser-like User-Agent; some static-dataset CDNs block default clients.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; GridMap/1.0; +https://github.com)";

/// A single JSON request against one endpoint, bounded by a timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues one request and decodes the body as JSON.
    ///
    /// `form` switches the call from a plain GET to a form-encoded POST
    /// (the tag-query service expects its query in a `data` field).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the call fails, times out, answers with a
    /// non-success status, or the body is not valid JSON.
    async fn fetch_json(
        &self,
        url: &str,
        form: Option<&[(String, String)]>,
        timeout: Duration,
    ) -> Result<serde_json::Value, SourceError>;
}

/// `reqwest`-backed transport used by the real pipeline.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the transport with the shared client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the client cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(
        &self,
        url: &str,
        form: Option<&[(String, String)]>,
        timeout: Duration,
    ) -> Result<serde_json::Value, SourceError> {
        let request = match form {
            Some(params) => self.client.post(url).form(params),
            None => self.client.get(url),
        };

        let response = request.timeout(timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { status });
        }

        // Read the raw body as text first, then parse, so decode failures
        // are distinguishable from connection failures.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
