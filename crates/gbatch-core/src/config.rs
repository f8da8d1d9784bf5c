//! Batch runner configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};

/// Google APIs root used for discovery and batch submission.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
/// Boundary used to frame outgoing multipart bodies.
pub const DEFAULT_BOUNDARY: &str = "sampleBoundary12345";
/// Maximum number of sub-requests Google accepts in one batch call.
pub const DEFAULT_CHUNK_LIMIT: usize = 100;

/// Configuration for [`BatchRunner`](crate::BatchRunner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_boundary")]
    pub boundary: String,
    /// Sub-requests per physical request.
    #[serde(default = "default_chunk_limit")]
    pub chunk_limit: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_boundary() -> String {
    DEFAULT_BOUNDARY.into()
}

fn default_chunk_limit() -> usize {
    DEFAULT_CHUNK_LIMIT
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            boundary: default_boundary(),
            chunk_limit: DEFAULT_CHUNK_LIMIT,
        }
    }
}

impl BatchConfig {
    /// Config pointing at a different API root (mock servers, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_limit == 0 {
            return Err(BatchError::InvalidInput("chunk_limit must be > 0".into()));
        }
        if self.boundary.is_empty() {
            return Err(BatchError::InvalidInput("boundary must not be empty".into()));
        }
        if self.base_url.is_empty() {
            return Err(BatchError::InvalidInput("base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Join `path` onto the base URL with exactly one `/`.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
