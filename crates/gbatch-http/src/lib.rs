//! gbatch-http — `reqwest` transport for gbatch.
//!
//! ```rust,no_run
//! use gbatch_core::{ApiSpec, BatchSpec, SubRequest};
//!
//! # async fn demo() -> gbatch_core::Result<()> {
//! let spec = BatchSpec::new(
//!     "ya29.token",
//!     ApiSpec::versioned("drive", "v3"),
//!     vec![SubRequest::new("DELETE", "https://www.googleapis.com/drive/v3/files/abc")],
//! );
//! let result = gbatch_http::run_batch(&spec).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;

use std::sync::Arc;

use gbatch_core::{ApiSpec, BatchResult, BatchRunner, BatchSpec, Result};

pub use client::{HttpClientConfig, HttpTransport};

/// Runner over a default `HttpTransport` and the Google defaults.
pub fn default_runner() -> Result<BatchRunner> {
    Ok(BatchRunner::with_defaults(Arc::new(HttpTransport::default_client()?)))
}

/// Resolve the batch path of `api` against googleapis.com.
pub async fn get_batch_path(api: &ApiSpec) -> Result<String> {
    default_runner()?.resolve_batch_path(api).await
}

/// Run `spec` against googleapis.com.
pub async fn run_batch(spec: &BatchSpec) -> Result<BatchResult> {
    default_runner()?.run(spec).await
}
