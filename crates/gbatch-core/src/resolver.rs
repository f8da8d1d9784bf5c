//! Batch path discovery through the Google API Discovery Service.
//!
//! Two hops, no caching:
//! ```text
//! GET <base>/discovery/v1/apis?preferred=..&name=..  →  discoveryRestUrl
//! GET <discoveryRestUrl>                              →  batchPath
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::BatchConfig;
use crate::error::{BatchError, DiscoveryStage, Result};
use crate::request::ApiSpec;
use crate::transport::{BatchTransport, RequestOptions};

/// One entry of the discovery directory listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryItem {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    discovery_rest_url: Option<String>,
}

/// Resolves the batch path of an API, e.g. `batch/drive/v3`.
pub struct BatchPathResolver {
    transport: Arc<dyn BatchTransport>,
    config: BatchConfig,
}

impl BatchPathResolver {
    pub fn new(transport: Arc<dyn BatchTransport>, config: BatchConfig) -> Self {
        Self { transport, config }
    }

    /// Directory listing URL for `api`. Without a version only the preferred
    /// variant is listed.
    pub fn listing_url(&self, api: &ApiSpec) -> String {
        let preferred = api.version.is_none();
        let name = urlencoding::encode(&api.name.to_lowercase()).into_owned();
        self.config
            .url_for(&format!("discovery/v1/apis?preferred={preferred}&name={name}"))
    }

    pub async fn resolve(&self, api: &ApiSpec) -> Result<String> {
        if api.name.trim().is_empty() {
            return Err(BatchError::InvalidInput(
                "API name is required to search for a batch path".into(),
            ));
        }

        let url = self.listing_url(api);
        tracing::debug!(%url, api = %api.name, transport = self.transport.name(), "listing discovery directory");
        let listing = self.fetch_json(&url, DiscoveryStage::Listing).await?;
        let rest_url = select_rest_url(listing, api)?;

        tracing::debug!(url = %rest_url, transport = self.transport.name(), "fetching discovery document");
        let document = self.fetch_json(&rest_url, DiscoveryStage::Metadata).await?;
        let batch_path = document
            .get("batchPath")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                BatchError::not_found(DiscoveryStage::Metadata, "discovery document has no batchPath")
            })?;

        tracing::debug!(api = %api.name, batch_path, "resolved batch path");
        Ok(batch_path.to_string())
    }

    /// GET `url` and parse the body, turning an API error document into
    /// `NotFound` with the document attached.
    async fn fetch_json(&self, url: &str, stage: DiscoveryStage) -> Result<Value> {
        let body = self.transport.send(url, RequestOptions::get(), None).await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            BatchError::not_found(stage, format!("invalid discovery response: {e}"))
        })?;
        if let Some(err) = value.get("error") {
            let reason = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("discovery service returned an error")
                .to_string();
            return Err(BatchError::NotFound {
                stage,
                reason,
                payload: Some(value),
            });
        }
        Ok(value)
    }
}

fn select_rest_url(listing: Value, api: &ApiSpec) -> Result<String> {
    let items: Vec<DirectoryItem> = match listing.get("items") {
        Some(items) => serde_json::from_value(items.clone()).map_err(|e| {
            BatchError::not_found(DiscoveryStage::Listing, format!("invalid directory items: {e}"))
        })?,
        None => Vec::new(),
    };

    let item = match &api.version {
        None => items.into_iter().next(),
        Some(version) => items
            .into_iter()
            .find(|i| i.version.as_deref() == Some(version.as_str())),
    };

    item.and_then(|i| i.discovery_rest_url).ok_or_else(|| {
        let wanted = match &api.version {
            Some(v) => format!("{} {v}", api.name),
            None => api.name.clone(),
        };
        BatchError::not_found(DiscoveryStage::Listing, format!("no discovery entry for {wanted}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    const DRIVE_REST: &str = "https://www.googleapis.com/discovery/v1/apis/drive/v3/rest";

    fn listing() -> String {
        json!({
            "kind": "discovery#directoryList",
            "items": [
                { "name": "drive", "version": "v2", "discoveryRestUrl": "https://www.googleapis.com/discovery/v1/apis/drive/v2/rest" },
                { "name": "drive", "version": "v3", "discoveryRestUrl": DRIVE_REST }
            ]
        })
        .to_string()
    }

    fn resolver(mock: &Arc<MockTransport>) -> BatchPathResolver {
        BatchPathResolver::new(mock.clone(), BatchConfig::default())
    }

    #[test]
    fn listing_url_preferred_and_versioned() {
        let r = BatchPathResolver::new(Arc::new(MockTransport::new()), BatchConfig::default());
        assert_eq!(
            r.listing_url(&ApiSpec::new("Drive")),
            "https://www.googleapis.com/discovery/v1/apis?preferred=true&name=drive"
        );
        assert_eq!(
            r.listing_url(&ApiSpec::versioned("my api", "v1")),
            "https://www.googleapis.com/discovery/v1/apis?preferred=false&name=my%20api"
        );
    }

    #[tokio::test]
    async fn resolves_versioned_api() {
        let mock = Arc::new(
            MockTransport::new()
                .reply(listing())
                .reply(json!({ "batchPath": "batch/drive/v3" }).to_string()),
        );
        let path = resolver(&mock)
            .resolve(&ApiSpec::versioned("drive", "v3"))
            .await
            .unwrap();
        assert_eq!(path, "batch/drive/v3");

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].url, DRIVE_REST);
        assert!(calls.iter().all(|c| c.options.method == "GET" && c.body.is_none()));
    }

    #[tokio::test]
    async fn preferred_uses_first_item() {
        let mock = Arc::new(
            MockTransport::new()
                .reply(listing())
                .reply(json!({ "batchPath": "batch/drive/v2" }).to_string()),
        );
        let path = resolver(&mock).resolve(&ApiSpec::new("drive")).await.unwrap();
        assert_eq!(path, "batch/drive/v2");
        assert!(mock.calls()[1].url.contains("/drive/v2/"));
    }

    #[tokio::test]
    async fn empty_name_fails_before_network() {
        let mock = Arc::new(MockTransport::new());
        let err = resolver(&mock).resolve(&ApiSpec::new("")).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_version_is_not_found() {
        let mock = Arc::new(MockTransport::new().reply(listing()));
        let err = resolver(&mock)
            .resolve(&ApiSpec::versioned("drive", "v9"))
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::NotFound { stage: DiscoveryStage::Listing, .. }));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn listing_without_items_is_not_found() {
        let mock = Arc::new(MockTransport::new().reply(r#"{"kind":"discovery#directoryList"}"#));
        let err = resolver(&mock).resolve(&ApiSpec::new("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn listing_error_payload_attached() {
        let body = json!({ "error": { "code": 400, "message": "Invalid name" } });
        let mock = Arc::new(MockTransport::new().reply(body.to_string()));
        match resolver(&mock).resolve(&ApiSpec::new("drive")).await.unwrap_err() {
            BatchError::NotFound { stage, reason, payload } => {
                assert_eq!(stage, DiscoveryStage::Listing);
                assert_eq!(reason, "Invalid name");
                assert_eq!(payload, Some(body));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn metadata_without_batch_path_is_not_found() {
        let mock = Arc::new(MockTransport::new().reply(listing()).reply(r#"{"name":"drive"}"#));
        let err = resolver(&mock)
            .resolve(&ApiSpec::versioned("drive", "v3"))
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::NotFound { stage: DiscoveryStage::Metadata, .. }));
    }

    #[tokio::test]
    async fn metadata_error_is_not_found() {
        let mock = Arc::new(
            MockTransport::new()
                .reply(listing())
                .reply(json!({ "error": { "code": 404 } }).to_string()),
        );
        let err = resolver(&mock)
            .resolve(&ApiSpec::versioned("drive", "v3"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BatchError::NotFound { stage: DiscoveryStage::Metadata, payload: Some(_), .. }
        ));
    }

    #[tokio::test]
    async fn non_json_listing_is_not_found() {
        let mock = Arc::new(MockTransport::new().reply("<html>oops</html>"));
        let err = resolver(&mock).resolve(&ApiSpec::new("drive")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let mock = Arc::new(MockTransport::new().fail("connection refused"));
        let err = resolver(&mock).resolve(&ApiSpec::new("drive")).await.unwrap_err();
        assert!(matches!(err, BatchError::Transport(_)));
    }
}
