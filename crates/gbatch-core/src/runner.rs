//! Chunked batch submission with abort-on-error policy.
//!
//! ```text
//! validate → resolve batch path → for each chunk: encode → POST → decode
//! ```
//!
//! Chunks are submitted strictly one after another, so the concatenated
//! output is in sub-request order without extra bookkeeping.

use std::sync::Arc;

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};
use crate::multipart;
use crate::request::{ApiSpec, BatchSpec};
use crate::resolver::BatchPathResolver;
use crate::response::{BatchResult, ResultItem};
use crate::transport::{BatchTransport, RequestOptions};

/// Runs batch specs against one transport.
pub struct BatchRunner {
    transport: Arc<dyn BatchTransport>,
    resolver: BatchPathResolver,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(transport: Arc<dyn BatchTransport>, config: BatchConfig) -> Self {
        Self {
            resolver: BatchPathResolver::new(transport.clone(), config.clone()),
            transport,
            config,
        }
    }

    /// Runner with the Google defaults.
    pub fn with_defaults(transport: Arc<dyn BatchTransport>) -> Self {
        Self::new(transport, BatchConfig::default())
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub async fn resolve_batch_path(&self, api: &ApiSpec) -> Result<String> {
        self.resolver.resolve(api).await
    }

    /// Validate `spec`, discover its batch path and submit every chunk.
    pub async fn run(&self, spec: &BatchSpec) -> Result<BatchResult> {
        self.config.validate()?;
        let (_, api) = spec.validate()?;
        let batch_path = self.resolver.resolve(api).await?;
        self.run_with_path(spec, &batch_path).await
    }

    /// Like [`run`](Self::run) with an already known batch path.
    pub async fn run_with_path(&self, spec: &BatchSpec, batch_path: &str) -> Result<BatchResult> {
        self.config.validate()?;
        let (token, _) = spec.validate()?;

        let url = self.config.url_for(batch_path);
        let total = multipart::chunk_count(spec.requests.len(), self.config.chunk_limit);
        let mut items: Vec<ResultItem> = Vec::new();
        let mut raw: Vec<String> = Vec::new();

        for (index, chunk) in multipart::chunks(&spec.requests, self.config.chunk_limit).enumerate()
        {
            tracing::debug!(
                chunk = index,
                of = total,
                size = chunk.len(),
                %url,
                transport = self.transport.name(),
                "submitting chunk"
            );
            let body = multipart::encode(chunk, &self.config.boundary);
            let options = RequestOptions::post()
                .header("Content-Type", multipart::content_type(&self.config.boundary))
                .header("Authorization", format!("Bearer {token}"));
            let response = self.transport.send(&url, options, Some(body)).await?;

            let decoded = multipart::decode(&response);
            if let Some(pos) = decoded.iter().position(ResultItem::has_error) {
                if !spec.skip_error {
                    tracing::error!(chunk = index, item = pos, "batch item returned an error");
                    return Err(BatchError::BatchItem {
                        chunk: index,
                        raw: response,
                    });
                }
                tracing::warn!(chunk = index, item = pos, "skipping batch item error");
            }

            if spec.return_raw_data {
                raw.push(response);
            } else {
                items.extend(decoded);
            }
        }

        let result = if spec.return_raw_data {
            BatchResult::Raw(raw)
        } else {
            BatchResult::Items(items)
        };
        tracing::info!(chunks = total, results = result.len(), "batch completed");
        Ok(result)
    }
}

/// Resolve the batch path of `api` with the default configuration.
pub async fn get_batch_path(transport: Arc<dyn BatchTransport>, api: &ApiSpec) -> Result<String> {
    BatchRunner::with_defaults(transport).resolve_batch_path(api).await
}

/// Run `spec` with the default configuration.
pub async fn run_batch(transport: Arc<dyn BatchTransport>, spec: &BatchSpec) -> Result<BatchResult> {
    BatchRunner::with_defaults(transport).run(spec).await
}
