//! Client-side error taxonomy
//!
//! Write-path failures surface to the caller with these variants; the
//! read path (pollers) absorbs them into safe defaults instead. Timeout
//! and connectivity carry deliberately distinct messages so a user can
//! tell a slow run from a dead service.

/// Errors surfaced by the synchronization layer.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The gateway answered with a non-success status
    #[error("{message}")]
    Gateway {
        /// Gateway HTTP status
        status: u16,
        /// Extracted or synthesized message
        message: String,
    },

    /// The gateway could not be reached
    #[error("cannot reach gateway: {0}")]
    Connectivity(String),

    /// The operation's deadline elapsed; the in-flight call was cancelled
    #[error("request timed out after {secs}s; the file may be too large or the service is slow")]
    Timeout {
        /// Deadline that elapsed, in seconds
        secs: u64,
    },

    /// Request-level HTTP failure below the status line
    #[error("http error: {0}")]
    Http(String),

    /// The gateway returned a body that did not match the expected shape
    #[error("invalid response from gateway: {0}")]
    InvalidResponse(String),

    /// Local filesystem failure while materializing a download
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Whether this is the deadline-elapsed failure.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the gateway was unreachable.
    #[inline]
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}
