//! Gateway client API
//!
//! [`GatewayApi`] is the seam between the synchronization layer and HTTP:
//! pollers and the mutation controller only ever talk through it, so
//! tests can script outcomes and count calls. [`HttpGatewayApi`] is the
//! real implementation against the gateway's inbound routes.

use crate::error::SyncError;
use async_trait::async_trait;
use bytes::Bytes;
use docgate_model::{ArtifactRoster, GenerationResult, MutationAck, SpreadsheetState};
use serde::de::DeserializeOwned;

/// Default gateway base URL for local development.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3100";

const UPLOAD: &str = "/api/spreadsheet/upload";
const STATUS: &str = "/api/spreadsheet/status";
const CLEAR: &str = "/api/spreadsheet/clear";
const ARTIFACTS: &str = "/api/artifacts";
const DOWNLOAD: &str = "/api/artifacts/download";
const DELETE: &str = "/api/artifacts/delete";

/// File part of an upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename
    pub filename: String,
    /// File content
    pub content: Bytes,
}

/// Upload payload: optional spreadsheet plus the four filter parameters.
///
/// Empty filter strings mean "no filter"; the service interprets them.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Spreadsheet to upload; `None` reuses the one already held
    pub file: Option<UploadFile>,
    /// Name-letter filter
    pub filter_letter: String,
    /// Employee-id prefix filter
    pub filter_emp_id: String,
    /// Billability selector
    pub filter_billability: String,
    /// Free-form condition string
    pub custom_condition: String,
}

/// Calls the synchronization layer makes against the gateway.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Fetch spreadsheet existence/schema state.
    async fn spreadsheet_status(&self) -> Result<SpreadsheetState, SyncError>;

    /// Clear the uploaded spreadsheet.
    async fn clear_spreadsheet(&self) -> Result<MutationAck, SyncError>;

    /// Upload a spreadsheet and trigger generation.
    async fn upload(&self, request: UploadRequest) -> Result<GenerationResult, SyncError>;

    /// Fetch the artifact roster.
    async fn list_artifacts(&self) -> Result<ArtifactRoster, SyncError>;

    /// Delete one artifact by filename.
    async fn delete_artifact(&self, filename: &str) -> Result<MutationAck, SyncError>;

    /// Delete every artifact.
    async fn delete_all_artifacts(&self) -> Result<MutationAck, SyncError>;

    /// Fetch one artifact's bytes.
    async fn download_artifact(&self, filename: &str) -> Result<Bytes, SyncError>;
}

/// reqwest-backed [`GatewayApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpGatewayApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGatewayApi {
    /// Create a client for the given gateway base URL.
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

    /// Create a client from `DOCGATE_GATEWAY_URL`, with the documented
    /// local default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("DOCGATE_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
        Self::new(base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn expect_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SyncError> {
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(wire_error)?;
        if !(200..300).contains(&status) {
            return Err(SyncError::Gateway {
                status,
                message: extract_error_message(&body, status),
            });
        }
        serde_json::from_slice(&body).map_err(|err| SyncError::InvalidResponse(err.to_string()))
    }
}

#[async_trait]
impl GatewayApi for HttpGatewayApi {
    async fn spreadsheet_status(&self) -> Result<SpreadsheetState, SyncError> {
        let response = self
            .client
            .get(self.url(STATUS))
            .send()
            .await
            .map_err(wire_error)?;
        Self::expect_json(response).await
    }

    async fn clear_spreadsheet(&self) -> Result<MutationAck, SyncError> {
        let response = self
            .client
            .delete(self.url(CLEAR))
            .send()
            .await
            .map_err(wire_error)?;
        Self::expect_json(response).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<GenerationResult, SyncError> {
        let mut form = reqwest::multipart::Form::new()
            .text("filter_letter", request.filter_letter)
            .text("filter_emp_id", request.filter_emp_id)
            .text("filter_billability", request.filter_billability)
            .text("custom_condition", request.custom_condition);
        if let Some(file) = request.file {
            let part = reqwest::multipart::Part::bytes(file.content.to_vec())
                .file_name(file.filename);
            form = form.part("file", part);
        }

        let response = self
            .client
            .post(self.url(UPLOAD))
            .multipart(form)
            .send()
            .await
            .map_err(wire_error)?;
        Self::expect_json(response).await
    }

    async fn list_artifacts(&self) -> Result<ArtifactRoster, SyncError> {
        let response = self
            .client
            .get(self.url(ARTIFACTS))
            .send()
            .await
            .map_err(wire_error)?;
        Self::expect_json(response).await
    }

    async fn delete_artifact(&self, filename: &str) -> Result<MutationAck, SyncError> {
        let response = self
            .client
            .delete(self.url(DELETE))
            .query(&[("filename", filename)])
            .send()
            .await
            .map_err(wire_error)?;
        Self::expect_json(response).await
    }

    async fn delete_all_artifacts(&self) -> Result<MutationAck, SyncError> {
        let response = self
            .client
            .delete(self.url(ARTIFACTS))
            .send()
            .await
            .map_err(wire_error)?;
        Self::expect_json(response).await
    }

    async fn download_artifact(&self, filename: &str) -> Result<Bytes, SyncError> {
        let response = self
            .client
            .get(self.url(DOWNLOAD))
            .query(&[("filename", filename)])
            .send()
            .await
            .map_err(wire_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(wire_error)?;
        if !(200..300).contains(&status) {
            return Err(SyncError::Gateway {
                status,
                message: extract_error_message(&body, status),
            });
        }
        Ok(body)
    }
}

fn wire_error(err: reqwest::Error) -> SyncError {
    if err.is_connect() {
        SyncError::Connectivity(err.to_string())
    } else {
        SyncError::Http(err.to_string())
    }
}

/// The gateway envelopes errors as `{"error": ...}`; the service itself
/// uses `{"detail": ...}` and some failure bodies carry both shapes.
fn extract_error_message(body: &[u8], status: u16) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("gateway responded with status: {status}"))
}
