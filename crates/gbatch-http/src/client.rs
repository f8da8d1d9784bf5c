//! HTTP transport backed by `reqwest`.
//!
//! Non-2xx responses are not transport errors: Google reports API failures
//! as JSON bodies, which the resolver and the batch error policy inspect.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use gbatch_core::error::BatchError;
use gbatch_core::multipart;
use gbatch_core::transport::{BatchTransport, RequestOptions};

/// Configuration for `HttpTransport`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("gbatch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// `BatchTransport` over HTTPS.
pub struct HttpTransport {
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: HttpClientConfig) -> Result<Self, BatchError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| BatchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_client() -> Result<Self, BatchError> {
        Self::new(HttpClientConfig::default())
    }
}

#[async_trait]
impl BatchTransport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        options: RequestOptions,
        body: Option<String>,
    ) -> Result<String, BatchError> {
        let method = Method::from_bytes(options.method.as_bytes())
            .map_err(|_| BatchError::InvalidInput(format!("invalid HTTP method: {}", options.method)))?;

        let mut req = self.http.request(method, url);
        for (name, value) in &options.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!(error = %e, %url, transport = self.name(), "request failed");
            if e.is_timeout() {
                BatchError::Transport(format!(
                    "request timed out after {}ms",
                    self.request_timeout.as_millis()
                ))
            } else {
                BatchError::Transport(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "non-success HTTP status");
        }
        if let Some(boundary) = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(multipart::response_boundary)
        {
            tracing::debug!(boundary, %url, "multipart response");
        }

        resp.text()
            .await
            .map_err(|e| BatchError::Transport(format!("failed to read response body: {e}")))
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
