//! `multipart/mixed` framing for batch requests and responses.
//!
//! Request envelope for two sub-requests with boundary `B`:
//!
//! ```text
//! --B
//! Content-Type: application/http
//! Content-ID: 1
//!
//! PATCH https://www.googleapis.com/drive/v3/files/abc
//! Content-Type: application/json; charset=utf-8
//!
//! {"name":"sample"}
//! --B
//! Content-Type: application/http
//! Content-ID: 2
//!
//! DELETE https://www.googleapis.com/drive/v3/files/def
//!
//! --B--
//! ```
//!
//! Responses are framed with the provider's own `--batch_...` boundary and
//! decoded leniently: a part without a parseable JSON object comes back as
//! raw text instead of failing the whole decode.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::request::SubRequest;
use crate::response::ResultItem;

const CRLF: &str = "\r\n";

/// Delimiter prefix of every response part.
pub const RESPONSE_DELIMITER: &str = "--batch";

/// Greedy outermost `{...}` with at least one character between the braces.
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]+\}").expect("valid JSON object pattern"));

/// Partition `requests` into contiguous chunks of at most `limit` items.
///
/// A `limit` of zero is treated as one.
pub fn chunks(requests: &[SubRequest], limit: usize) -> std::slice::Chunks<'_, SubRequest> {
    requests.chunks(limit.max(1))
}

/// Number of chunks `len` sub-requests are split into.
pub fn chunk_count(len: usize, limit: usize) -> usize {
    len.div_ceil(limit.max(1))
}

/// Encode one chunk as a `multipart/mixed` body framed by `boundary`.
pub fn encode(chunk: &[SubRequest], boundary: &str) -> String {
    let mut body = format!("--{boundary}{CRLF}");
    let last = chunk.len().saturating_sub(1);
    for (i, req) in chunk.iter().enumerate() {
        body.push_str("Content-Type: application/http");
        body.push_str(CRLF);
        body.push_str(&format!("Content-ID: {}{CRLF}{CRLF}", i + 1));
        body.push_str(&format!("{} {}{CRLF}", req.method, req.endpoint));
        match &req.request_body {
            Some(json) => {
                body.push_str("Content-Type: application/json; charset=utf-8");
                body.push_str(CRLF);
                body.push_str(CRLF);
                body.push_str(&json.to_string());
                body.push_str(CRLF);
            }
            None => body.push_str(CRLF),
        }
        let close = if i == last { "--" } else { "" };
        body.push_str(&format!("--{boundary}{close}{CRLF}"));
    }
    body
}

/// Decode a batch response body into one item per part, in part order.
pub fn decode(text: &str) -> Vec<ResultItem> {
    let segments: Vec<&str> = text.split(RESPONSE_DELIMITER).collect();
    if segments.len() < 3 {
        return Vec::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .map(|segment| decode_part(segment))
        .collect()
}

/// Best-effort parse of a single response part.
pub fn decode_part(segment: &str) -> ResultItem {
    JSON_OBJECT
        .find(segment)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .map(ResultItem::Parsed)
        .unwrap_or_else(|| ResultItem::Raw(segment.to_string()))
}

/// Extract the `boundary` parameter of a `multipart/*` content type.
pub fn response_boundary(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, v)| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
}

/// `Content-Type` header value for an outgoing batch body.
pub fn content_type(boundary: &str) -> String {
    format!("multipart/mixed; boundary={boundary}")
}

#[cfg(test)]
pub(crate) fn synthetic_response(parts: &[&str]) -> String {
    let mut out = String::from("\r\n");
    for part in parts {
        out.push_str("--batch_abc123\r\nContent-Type: application/http\r\n");
        out.push_str("Content-ID: <response-1>\r\n\r\nHTTP/1.1 200 OK\r\n");
        out.push_str("Content-Type: application/json; charset=UTF-8\r\n\r\n");
        out.push_str(part);
        out.push_str("\r\n");
    }
    out.push_str("--batch_abc123--\r\n");
    out
}
