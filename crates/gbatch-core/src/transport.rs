//! The `BatchTransport` trait — the capability that moves request and
//! response bodies.

use async_trait::async_trait;

use crate::error::BatchError;

/// Method and headers of one physical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: String,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            headers: Vec::new(),
        }
    }

    pub fn get() -> Self {
        Self::new("GET")
    }

    pub fn post() -> Self {
        Self::new("POST")
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends one request and returns the full response body as text.
///
/// Implementations fail with [`BatchError::Transport`] only when the
/// exchange itself fails; API-level errors arrive as response bodies.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn BatchTransport>`.
#[async_trait]
pub trait BatchTransport: Send + Sync + 'static {
    async fn send(
        &self,
        url: &str,
        options: RequestOptions,
        body: Option<String>,
    ) -> Result<String, BatchError>;

    /// Transport identifier for logs.
    fn name(&self) -> &str {
        "transport"
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let opts = RequestOptions::post().header("Authorization", "Bearer t");
        assert_eq!(opts.method, "POST");
        assert_eq!(opts.header_value("authorization"), Some("Bearer t"));
        assert!(opts.header_value("content-type").is_none());
    }

    struct Unnamed;

    #[async_trait]
    impl BatchTransport for Unnamed {
        async fn send(&self, _: &str, _: RequestOptions, _: Option<String>) -> Result<String, BatchError> {
            Ok(String::new())
        }
    }

    #[test]
    fn transport_names() {
        assert_eq!(Unnamed.name(), "transport");
        assert_eq!(mock::MockTransport::new().name(), "mock");
    }
}
