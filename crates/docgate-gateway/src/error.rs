//! Gateway error taxonomy
//!
//! - `Validation`: missing required parameter, rejected before any
//!   outbound call (400)
//! - `Upstream`: the service answered with a non-success status
//! - `Connectivity`: the service could not be reached at all (503)
//! - `Unknown`: anything else (500)
//!
//! JSON routes collapse `Upstream` to 500 regardless of the upstream
//! status; the upload route preserves the upstream status instead. That
//! asymmetry is part of the client-visible contract and is kept as-is.

use serde_json::json;
use warp::http::StatusCode;
use warp::Reply;

/// Errors a gateway route can produce.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A required parameter was absent or empty; no outbound call was made
    #[error("{0}")]
    Validation(String),

    /// The processing service answered with a non-success status
    #[error("{message}")]
    Upstream {
        /// Upstream HTTP status
        status: u16,
        /// Extracted or synthesized upstream message
        message: String,
    },

    /// The processing service could not be reached
    #[error("{0}")]
    Connectivity(String),

    /// Any other failure
    #[error("{0}")]
    Unknown(String),
}

impl GatewayError {
    /// Upstream failure with the message extracted from the response.
    #[inline]
    #[must_use]
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Status under the normalizing policy: upstream failures collapse
    /// to 500.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { .. } | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Status under the preserving policy: upstream failures keep their
    /// original status (upload route).
    #[must_use]
    pub fn preserved_status(&self) -> StatusCode {
        match self {
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => self.status(),
        }
    }

    /// JSON error envelope body.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }

    /// Reply under the normalizing policy.
    #[must_use]
    pub fn reply(&self) -> warp::reply::Response {
        json_reply(self.status(), &self.body())
    }

    /// Reply under the preserving policy.
    #[must_use]
    pub fn reply_preserving_status(&self) -> warp::reply::Response {
        json_reply(self.preserved_status(), &self.body())
    }
}

/// Build a JSON reply with an explicit status.
pub(crate) fn json_reply<T: serde::Serialize>(
    status: StatusCode,
    value: &T,
) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}
