//! Batch error types.

use serde_json::Value;
use thiserror::Error;

/// Which discovery hop failed to produce a batch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStage {
    /// The `discovery/v1/apis` listing call.
    Listing,
    /// The fetch of the API's discovery document.
    Metadata,
}

impl std::fmt::Display for DiscoveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// Errors that can occur while resolving or running a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A required field of the batch spec is missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The batch path could not be resolved.
    #[error("batch path cannot be found ({stage}): {reason}")]
    NotFound {
        stage: DiscoveryStage,
        reason: String,
        /// Error document returned by the discovery service, if any.
        payload: Option<Value>,
    },

    /// The transport itself failed (connection, DNS, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// A decoded item of chunk `chunk` carries an `error` field.
    #[error("batch item error in chunk {chunk}")]
    BatchItem { chunk: usize, raw: String },

    /// Input JSON could not be deserialized.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl BatchError {
    pub(crate) fn not_found(stage: DiscoveryStage, reason: impl Into<String>) -> Self {
        Self::NotFound {
            stage,
            reason: reason.into(),
            payload: None,
        }
    }

    /// Returns `true` if the batch path could not be resolved.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the batch spec was rejected before any network call.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Raw multipart response of the chunk that aborted the run.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::BatchItem { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
