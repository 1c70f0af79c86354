//! Route handlers
//!
//! Each handler makes exactly one outbound call through the transport and
//! normalizes the result. Failure policies differ by route family:
//! - download: transparent passthrough of upstream failures
//! - upload: upstream status preserved, 503 on connectivity failure
//! - all other JSON routes: `{"error": ...}` at status 500

use crate::error::{json_reply, GatewayError};
use crate::upstream;
use bytes::Bytes;
use docgate_model::ArtifactRoster;
use docgate_transport::{Transport, TransportError, UpstreamResponse};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::{HeaderName, HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::http::{Response, StatusCode};
use warp::hyper::Body;

type HandlerResult = Result<warp::reply::Response, Infallible>;

/// `?filename=` query parameter, validated before any outbound call.
#[derive(Debug, Deserialize)]
pub(crate) struct FilenameQuery {
    filename: Option<String>,
}

impl FilenameQuery {
    /// Absent and empty both count as missing.
    fn require(self) -> Result<String, GatewayError> {
        match self.filename {
            Some(filename) if !filename.is_empty() => Ok(filename),
            _ => Err(GatewayError::Validation("Missing filename".to_string())),
        }
    }
}

/// POST /api/spreadsheet/upload
///
/// The multipart body is forwarded verbatim with its boundary-bearing
/// content type; the gateway never reassembles it. This is the one route
/// where connectivity failure is reported as 503 and upstream failures
/// keep their original status.
pub(crate) async fn upload_spreadsheet(
    content_type: Option<String>,
    body: Bytes,
    transport: Arc<dyn Transport>,
) -> HandlerResult {
    match transport
        .post(upstream::UPLOAD, content_type.as_deref(), body)
        .await
    {
        Ok(resp) if resp.is_success() => Ok(forward_json(&resp)),
        Ok(resp) => {
            let err = GatewayError::upstream(resp.status, resp.failure_message());
            tracing::error!(status = resp.status, %err, "upload rejected by processing service");
            Ok(err.reply_preserving_status())
        }
        Err(err) if err.is_connect() => {
            tracing::error!(%err, "processing service unreachable during upload");
            let err = GatewayError::Connectivity(
                "Processing service is not running. Ensure it is reachable at the configured base URL."
                    .to_string(),
            );
            Ok(err.reply())
        }
        Err(err) => Ok(unknown(err, "upload failed").reply()),
    }
}

/// GET /api/spreadsheet/status
///
/// The failure body carries `exists: false` so a caller that does not
/// inspect the status still sees a usable shape.
pub(crate) async fn spreadsheet_status(transport: Arc<dyn Transport>) -> HandlerResult {
    match transport.get(upstream::STATUS).await {
        Ok(resp) if resp.is_success() => Ok(forward_json(&resp)),
        Ok(resp) => {
            let err = GatewayError::upstream(resp.status, resp.failure_message());
            tracing::error!(status = resp.status, %err, "status check failed");
            Ok(json_reply(
                err.status(),
                &json!({ "error": err.to_string(), "exists": false }),
            ))
        }
        Err(err) => {
            let err = unknown(err, "status check failed");
            Ok(json_reply(
                err.status(),
                &json!({ "error": err.to_string(), "exists": false }),
            ))
        }
    }
}

/// DELETE /api/spreadsheet/clear
pub(crate) async fn clear_spreadsheet(transport: Arc<dyn Transport>) -> HandlerResult {
    match transport.delete(upstream::CLEAR).await {
        Ok(resp) if resp.is_success() => Ok(forward_json(&resp)),
        Ok(resp) => {
            let err = GatewayError::upstream(resp.status, resp.failure_message());
            tracing::error!(status = resp.status, %err, "clear spreadsheet failed");
            Ok(err.reply())
        }
        Err(err) => Ok(unknown(err, "clear spreadsheet failed").reply()),
    }
}

/// GET /api/artifacts
///
/// A 404 from the listing endpoint means the feature is not available on
/// the service yet; the dashboard gets an empty roster, never an error
/// banner. On success the roster's `count` is recomputed locally.
pub(crate) async fn list_artifacts(transport: Arc<dyn Transport>) -> HandlerResult {
    match transport.get(upstream::LIST).await {
        Ok(resp) if resp.status == 404 => {
            tracing::warn!("listing endpoint not found upstream, returning empty roster");
            Ok(json_reply(StatusCode::OK, &ArtifactRoster::empty()))
        }
        Ok(resp) if resp.is_success() => match resp.json::<ArtifactRoster>() {
            Ok(roster) => Ok(json_reply(StatusCode::OK, &roster.normalized())),
            Err(err) => {
                tracing::error!(%err, "listing response was not a valid roster");
                Ok(GatewayError::Unknown("invalid listing response from processing service".to_string()).reply())
            }
        },
        Ok(resp) => {
            let err = GatewayError::upstream(resp.status, resp.failure_message());
            tracing::error!(status = resp.status, %err, "listing failed");
            Ok(err.reply())
        }
        Err(err) => Ok(unknown(err, "listing failed").reply()),
    }
}

/// GET /api/artifacts/download/<filename>
pub(crate) async fn download_by_path(
    filename: String,
    transport: Arc<dyn Transport>,
) -> HandlerResult {
    Ok(proxy_download(&filename, transport).await)
}

/// GET /api/artifacts/download?filename=
pub(crate) async fn download_by_query(
    query: FilenameQuery,
    transport: Arc<dyn Transport>,
) -> HandlerResult {
    match query.require() {
        Ok(filename) => Ok(proxy_download(&filename, transport).await),
        Err(err) => Ok(err.reply()),
    }
}

/// DELETE /api/artifacts/delete/<filename>
pub(crate) async fn delete_by_path(
    filename: String,
    transport: Arc<dyn Transport>,
) -> HandlerResult {
    Ok(proxy_delete(&filename, transport).await)
}

/// DELETE /api/artifacts/delete?filename=
pub(crate) async fn delete_by_query(
    query: FilenameQuery,
    transport: Arc<dyn Transport>,
) -> HandlerResult {
    match query.require() {
        Ok(filename) => Ok(proxy_delete(&filename, transport).await),
        Err(err) => Ok(err.reply()),
    }
}

/// DELETE /api/artifacts
pub(crate) async fn delete_all_artifacts(transport: Arc<dyn Transport>) -> HandlerResult {
    match transport.delete(upstream::DELETE_ALL).await {
        Ok(resp) if resp.is_success() => Ok(forward_json(&resp)),
        Ok(resp) => {
            let err = GatewayError::upstream(resp.status, resp.failure_message());
            tracing::error!(status = resp.status, %err, "delete-all failed");
            Ok(err.reply())
        }
        Err(err) => Ok(unknown(err, "delete-all failed").reply()),
    }
}

async fn proxy_download(filename: &str, transport: Arc<dyn Transport>) -> warp::reply::Response {
    match transport.get(&upstream::download_path(filename)).await {
        Ok(resp) if resp.is_success() => attachment_reply(filename, resp),
        // Binary route: upstream failures go through verbatim
        Ok(resp) => passthrough_reply(resp),
        Err(err) => unknown(err, "download failed").reply(),
    }
}

async fn proxy_delete(filename: &str, transport: Arc<dyn Transport>) -> warp::reply::Response {
    match transport.delete(&upstream::delete_path(filename)).await {
        Ok(resp) if resp.is_success() => forward_json(&resp),
        Ok(resp) => {
            let err = GatewayError::upstream(resp.status, resp.failure_message());
            tracing::error!(status = resp.status, filename, %err, "delete failed");
            err.reply()
        }
        Err(err) => unknown(err, "delete failed").reply(),
    }
}

fn unknown(err: TransportError, context: &'static str) -> GatewayError {
    tracing::error!(%err, context, "transport failure");
    GatewayError::Unknown(err.to_string())
}

/// Forward a successful upstream JSON body, re-serialized.
///
/// Parsing also validates: a success status with a garbage body becomes a
/// normalized 500 instead of leaking the garbage downstream.
fn forward_json(resp: &UpstreamResponse) -> warp::reply::Response {
    match resp.json::<serde_json::Value>() {
        Ok(value) => json_reply(StatusCode::OK, &value),
        Err(err) => {
            tracing::error!(%err, "processing service returned unparseable JSON");
            GatewayError::Unknown("invalid JSON from processing service".to_string()).reply()
        }
    }
}

// Recomputed by hyper, or connection-scoped; never copied through.
fn is_hop_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("content-length")
        || name.eq_ignore_ascii_case("transfer-encoding")
        || name.eq_ignore_ascii_case("connection")
}

fn copy_headers(response: &mut Response<Body>, upstream: &UpstreamResponse) {
    let headers = response.headers_mut();
    for (name, value) in &upstream.headers {
        if is_hop_header(name) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.append(name, value);
        }
    }
}

/// Success reply for a download: upstream headers copied, disposition
/// forced to an attachment with the exact filename, content type defaulted
/// to PDF when upstream omitted it.
fn attachment_reply(filename: &str, upstream: UpstreamResponse) -> warp::reply::Response {
    let mut response = Response::new(Body::from(upstream.body.clone()));
    *response.status_mut() = StatusCode::OK;
    copy_headers(&mut response, &upstream);

    let headers = response.headers_mut();
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    }
    // The filename goes into the header byte-identical to the request
    // segment; re-encoding here would desync it from the upstream path.
    let disposition = format!("attachment; filename=\"{filename}\"");
    match HeaderValue::from_str(&disposition) {
        Ok(value) => {
            headers.insert(CONTENT_DISPOSITION, value);
            response
        }
        Err(_) => {
            GatewayError::Unknown("filename not representable in a header".to_string()).reply()
        }
    }
}

/// Verbatim passthrough of an upstream failure on a binary route.
fn passthrough_reply(upstream: UpstreamResponse) -> warp::reply::Response {
    let mut response = Response::new(Body::from(upstream.body.clone()));
    *response.status_mut() =
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    copy_headers(&mut response, &upstream);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_response(status: u16, headers: Vec<(&str, &str)>, body: &'static [u8]) -> UpstreamResponse {
        UpstreamResponse {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn filename_query_requires_non_empty() {
        let missing = FilenameQuery { filename: None };
        assert!(missing.require().is_err());

        let empty = FilenameQuery {
            filename: Some(String::new()),
        };
        assert!(empty.require().is_err());

        let present = FilenameQuery {
            filename: Some("a.pdf".to_string()),
        };
        assert_eq!(present.require().unwrap(), "a.pdf");
    }

    #[test]
    fn attachment_reply_sets_exact_disposition() {
        let upstream = upstream_response(
            200,
            vec![("content-type", "application/pdf"), ("content-length", "4")],
            b"%PDF",
        );
        let reply = attachment_reply("Report%20Final.pdf", upstream);
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(
            reply.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"Report%20Final.pdf\""
        );
        // hop headers are not copied
        assert!(reply.headers().get("content-length").is_none());
    }

    #[test]
    fn attachment_reply_defaults_content_type_to_pdf() {
        let upstream = upstream_response(200, vec![], b"%PDF");
        let reply = attachment_reply("a.pdf", upstream);
        assert_eq!(reply.headers().get(CONTENT_TYPE).unwrap(), "application/pdf");
    }

    #[test]
    fn attachment_reply_keeps_upstream_content_type() {
        let upstream = upstream_response(
            200,
            vec![("content-type", "application/octet-stream")],
            b"data",
        );
        let reply = attachment_reply("a.bin", upstream);
        assert_eq!(
            reply.headers().get(CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }

    #[test]
    fn passthrough_reply_keeps_status_and_headers() {
        let upstream = upstream_response(
            404,
            vec![("content-type", "application/json"), ("x-upstream-tag", "t")],
            b"{\"detail\": \"not found\"}",
        );
        let reply = passthrough_reply(upstream);
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
        assert_eq!(reply.headers().get("x-upstream-tag").unwrap(), "t");
    }
}
