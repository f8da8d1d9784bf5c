//! gbatch-core — batch requests for Google APIs over `multipart/mixed`.
//!
//! # Overview
//!
//! Many small REST calls are packed into one physical HTTP request per chunk
//! and the multipart response is split back into one result per call. The
//! core crate defines:
//!
//! - [`BatchSpec`] / [`SubRequest`] / [`ApiSpec`] — the batch input
//! - [`ResultItem`] / [`BatchResult`] — the decoded output
//! - [`BatchTransport`] — the async capability that moves bytes
//! - [`BatchError`] — structured error type
//! - [`multipart`] module — request encoder, response decoder, chunking
//! - [`resolver`] module — two-hop discovery of an API's batch path
//! - [`BatchRunner`] — chunked, strictly sequential submission with the
//!   abort-on-error policy

pub mod config;
pub mod error;
pub mod multipart;
pub mod request;
pub mod resolver;
pub mod response;
pub mod runner;
pub mod transport;

pub use config::BatchConfig;
pub use error::{BatchError, DiscoveryStage, Result};
pub use request::{ApiSpec, BatchSpec, SubRequest};
pub use resolver::BatchPathResolver;
pub use response::{BatchResult, ResultItem};
pub use runner::{get_batch_path, run_batch, BatchRunner};
pub use transport::{BatchTransport, RequestOptions};
