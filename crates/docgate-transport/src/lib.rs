//! Docgate Transport - Outbound call port for the processing service
//!
//! A single abstraction every other component uses to reach the external
//! service:
//! - [`Transport`] trait: one outbound HTTP call per invocation
//! - [`UpstreamResponse`]: status, headers, and body as plain data
//! - [`TransportError`]: connection-level failures kept distinct from
//!   request-level ones
//! - [`HttpTransport`]: reqwest implementation against a configured base URL
//!
//! Paths handed to a transport are appended to the base URL verbatim;
//! percent-escapes in them are never re-encoded or decoded.

#![warn(unreachable_pub)]

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Transport-level errors reaching the processing service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service could not be reached at all (refused, DNS, etc.)
    #[error("cannot reach processing service: {0}")]
    Connect(String),

    /// The call was made but failed below the HTTP-status level
    #[error("request to processing service failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether this is a connection-level failure (service unreachable).
    #[inline]
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }
}

/// A complete upstream response, buffered.
///
/// Headers are carried as plain string pairs so server and client crates
/// on different `http` crate versions can both consume them.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, in arrival order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Whether the status is in the 2xx range.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Extract the `detail` field the processing service puts in error
    /// bodies, if the body parses as JSON and carries one.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        value
            .get("detail")
            .and_then(|d| d.as_str())
            .map(str::to_string)
    }

    /// Message for a non-success response: the upstream `detail` when
    /// parseable, otherwise a synthesized message naming the status code.
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.detail()
            .unwrap_or_else(|| format!("processing service responded with status: {}", self.status))
    }
}

/// One outbound HTTP call to the processing service.
///
/// Implementations hold the base URL; callers pass only the path (with any
/// query string) exactly as it should appear on the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `base_url + path`.
    async fn get(&self, path: &str) -> Result<UpstreamResponse, TransportError>;

    /// DELETE `base_url + path`.
    async fn delete(&self, path: &str) -> Result<UpstreamResponse, TransportError>;

    /// POST `base_url + path` with a raw body and optional content type.
    ///
    /// Used to forward multipart payloads without reassembling them: the
    /// original body bytes and boundary-bearing content type go through
    /// untouched.
    async fn post(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<UpstreamResponse, TransportError>;
}
