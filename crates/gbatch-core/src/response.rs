//! Batch output types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one sub-request, decoded from one multipart response part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultItem {
    /// The part contained a JSON object.
    Parsed(Value),
    /// The part had no parseable JSON object; original segment text.
    Raw(String),
}

impl ResultItem {
    /// Returns `true` if the item is a JSON object whose `error` field is
    /// truthy: `null`, `false`, `0` and `""` do not count as errors.
    pub fn has_error(&self) -> bool {
        match self {
            Self::Parsed(v) => v.get("error").is_some_and(is_truthy),
            Self::Raw(_) => false,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Parsed(v) => Some(v),
            Self::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Parsed(_) => None,
            Self::Raw(s) => Some(s),
        }
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accumulated output of a batch run, in sub-request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchResult {
    /// Decoded items of every chunk, concatenated.
    Items(Vec<ResultItem>),
    /// One undecoded response body per chunk.
    Raw(Vec<String>),
}

impl BatchResult {
    pub fn len(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Raw(bodies) => bodies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Option<&[ResultItem]> {
        match self {
            Self::Items(items) => Some(items),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&[String]> {
        match self {
            Self::Items(_) => None,
            Self::Raw(bodies) => Some(bodies),
        }
    }
}
