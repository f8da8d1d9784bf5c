//! Batch input types.
//!
//! Field names on the wire follow the JSON shape used by batch spec files:
//!
//! ```json
//! {
//!   "accessToken": "ya29...",
//!   "api": { "name": "drive", "version": "v3" },
//!   "skipError": false,
//!   "returnRawData": false,
//!   "requests": [
//!     { "method": "PATCH", "endpoint": "https://www.googleapis.com/drive/v3/files/abc",
//!       "requestBody": { "name": "sample" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BatchError, Result};

/// Provider identifier: API name plus optional version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ApiSpec {
    /// The preferred version of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// An exact version of `name`.
    pub fn versioned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

/// One logical API call embedded in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRequest {
    pub method: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
}

impl SubRequest {
    pub fn new(method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            request_body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }
}

/// Input of a single batch run. Never mutated by the runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiSpec>,
    #[serde(default)]
    pub requests: Vec<SubRequest>,
    /// Keep error items in the output instead of aborting the run.
    #[serde(default, alias = "skipErrors")]
    pub skip_error: bool,
    /// Return undecoded chunk bodies instead of parsed items.
    #[serde(default, alias = "returnRaw")]
    pub return_raw_data: bool,
}

impl BatchSpec {
    pub fn new(access_token: impl Into<String>, api: ApiSpec, requests: Vec<SubRequest>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            api: Some(api),
            requests,
            skip_error: false,
            return_raw_data: false,
        }
    }

    pub fn skip_errors(mut self, skip: bool) -> Self {
        self.skip_error = skip;
        self
    }

    pub fn return_raw(mut self, raw: bool) -> Self {
        self.return_raw_data = raw;
        self
    }

    /// Check required fields; returns the token and API to use.
    pub fn validate(&self) -> Result<(&str, &ApiSpec)> {
        let token = match self.access_token.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(BatchError::InvalidInput(
                    "'accessToken' is required to request the API".into(),
                ))
            }
        };
        let api = self
            .api
            .as_ref()
            .ok_or_else(|| BatchError::InvalidInput("'api' is required".into()))?;
        if api.name.trim().is_empty() {
            return Err(BatchError::InvalidInput("'api.name' must not be empty".into()));
        }
        if self.requests.is_empty() {
            return Err(BatchError::InvalidInput(
                "'requests' must contain at least one request".into(),
            ));
        }
        Ok((token, api))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one_request() -> Vec<SubRequest> {
        vec![SubRequest::new("GET", "https://www.googleapis.com/drive/v3/files/a")]
    }

    #[test]
    fn deserialize_spec_file_shape() {
        let spec: BatchSpec = serde_json::from_value(json!({
            "accessToken": "tok",
            "api": { "name": "drive", "version": "v3" },
            "skipError": true,
            "requests": [
                { "method": "PATCH", "endpoint": "https://x/files/1", "requestBody": { "name": "a" } },
                { "method": "DELETE", "endpoint": "https://x/files/2" }
            ]
        }))
        .unwrap();
        assert_eq!(spec.access_token.as_deref(), Some("tok"));
        assert_eq!(spec.api, Some(ApiSpec::versioned("drive", "v3")));
        assert!(spec.skip_error);
        assert!(!spec.return_raw_data);
        assert_eq!(spec.requests.len(), 2);
        assert_eq!(spec.requests[0].request_body, Some(json!({ "name": "a" })));
        assert!(spec.requests[1].request_body.is_none());
    }

    #[test]
    fn aliases_accepted() {
        let spec: BatchSpec =
            serde_json::from_value(json!({ "skipErrors": true, "returnRaw": true })).unwrap();
        assert!(spec.skip_error);
        assert!(spec.return_raw_data);
    }

    #[test]
    fn missing_token_rejected() {
        let spec = BatchSpec {
            api: Some(ApiSpec::new("drive")),
            requests: one_request(),
            ..Default::default()
        };
        assert!(spec.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn empty_token_rejected() {
        let spec = BatchSpec::new("", ApiSpec::new("drive"), one_request());
        assert!(spec.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn missing_api_rejected() {
        let spec = BatchSpec {
            access_token: Some("tok".into()),
            requests: one_request(),
            ..Default::default()
        };
        assert!(spec.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn empty_api_name_rejected() {
        let spec = BatchSpec::new("tok", ApiSpec::new("  "), one_request());
        assert!(spec.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn empty_requests_rejected() {
        let spec = BatchSpec::new("tok", ApiSpec::new("drive"), vec![]);
        assert!(spec.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn valid_spec_passes() {
        let spec = BatchSpec::new("tok", ApiSpec::new("drive"), one_request());
        let (token, api) = spec.validate().unwrap();
        assert_eq!(token, "tok");
        assert_eq!(api.name, "drive");
    }
}
