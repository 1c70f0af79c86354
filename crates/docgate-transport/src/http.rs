//! reqwest-backed transport implementation

use crate::{Transport, TransportError, UpstreamResponse};
use async_trait::async_trait;
use bytes::Bytes;

/// HTTP transport against a fixed processing-service base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the given base URL.
    ///
    /// A trailing slash on the base URL is trimmed so paths concatenate
    /// cleanly.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// The configured base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<UpstreamResponse, TransportError> {
        let response = request.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(classify)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<UpstreamResponse, TransportError> {
        tracing::debug!(path, "outbound GET");
        self.execute(self.client.get(self.url(path))).await
    }

    async fn delete(&self, path: &str) -> Result<UpstreamResponse, TransportError> {
        tracing::debug!(path, "outbound DELETE");
        self.execute(self.client.delete(self.url(path))).await
    }

    async fn post(
        &self,
        path: &str,
        content_type: Option<&str>,
        body: Bytes,
    ) -> Result<UpstreamResponse, TransportError> {
        tracing::debug!(path, bytes = body.len(), "outbound POST");
        let mut request = self.client.post(self.url(path)).body(body);
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        self.execute(request).await
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}
