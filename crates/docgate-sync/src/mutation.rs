//! Mutation controller
//!
//! Write side of the synchronization layer. Each operation performs
//! exactly one outbound call and then flags the affected cache entries
//! stale; it never writes cache values directly and never removes items
//! optimistically. Destructive operations carry no confirmation step at
//! this level; that is the caller's concern.

use crate::api::{GatewayApi, UploadRequest};
use crate::cache::AsyncResource;
use crate::error::SyncError;
use crate::poller::{RosterPoller, StatusPoller};
use docgate_model::{ArtifactRoster, GenerationResult, MutationAck, SpreadsheetState};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Deadline for the upload-and-generate call.
pub const UPLOAD_DEADLINE: Duration = Duration::from_millis(180_000);

/// Performs upload, clear, delete, and download operations, invalidating
/// the relevant cache entries on success.
pub struct MutationController {
    api: Arc<dyn GatewayApi>,
    status: AsyncResource<SpreadsheetState>,
    roster: AsyncResource<ArtifactRoster>,
}

impl MutationController {
    /// Build the controller sharing the pollers' cache entries.
    #[must_use]
    pub fn new(api: Arc<dyn GatewayApi>, status: &StatusPoller, roster: &RosterPoller) -> Self {
        Self {
            api,
            status: status.resource().clone(),
            roster: roster.resource().clone(),
        }
    }

    /// Upload a spreadsheet and trigger generation, under a fixed
    /// deadline.
    ///
    /// When the deadline elapses the in-flight call and its timer are
    /// both dropped, and the caller gets a timeout-specific message. On
    /// success both cache entries are invalidated: the response shape is
    /// not assumed to reflect final state, the next reads are.
    pub async fn upload(&self, request: UploadRequest) -> Result<GenerationResult, SyncError> {
        let result = tokio::time::timeout(UPLOAD_DEADLINE, self.api.upload(request))
            .await
            .map_err(|_| SyncError::Timeout {
                secs: UPLOAD_DEADLINE.as_secs(),
            })??;

        self.status.invalidate();
        self.roster.invalidate();
        tracing::info!(generated = result.total_resources, "upload completed");
        Ok(result)
    }

    /// Clear the uploaded spreadsheet. Invalidates spreadsheet state.
    pub async fn clear_spreadsheet(&self) -> Result<MutationAck, SyncError> {
        let ack = self.api.clear_spreadsheet().await?;
        self.status.invalidate();
        tracing::info!("spreadsheet cleared");
        Ok(ack)
    }

    /// Delete one artifact. Invalidates the roster; no optimistic local
    /// removal, the next authoritative read decides.
    pub async fn delete_artifact(&self, filename: &str) -> Result<MutationAck, SyncError> {
        let ack = self.api.delete_artifact(filename).await?;
        self.roster.invalidate();
        tracing::info!(filename, "artifact deleted");
        Ok(ack)
    }

    /// Delete every artifact. Invalidates the roster.
    pub async fn delete_all_artifacts(&self) -> Result<MutationAck, SyncError> {
        let ack = self.api.delete_all_artifacts().await?;
        self.roster.invalidate();
        tracing::info!("all artifacts deleted");
        Ok(ack)
    }

    /// Download one artifact into `dest_dir`, returning the final path.
    ///
    /// The body lands in a temp file first; the temp handle is released
    /// on every exit path, so a failed write never leaves a partial file
    /// behind. Not cached, and no cache entry is touched.
    pub async fn download(&self, filename: &str, dest_dir: &Path) -> Result<PathBuf, SyncError> {
        let body = self.api.download_artifact(filename).await?;

        let safe_name = Path::new(filename)
            .file_name()
            .ok_or_else(|| SyncError::InvalidResponse(format!("unusable filename: {filename}")))?;

        let mut temp = tempfile::NamedTempFile::new_in(dest_dir)?;
        temp.write_all(&body)?;
        temp.flush()?;

        let dest = dest_dir.join(safe_name);
        temp.persist(&dest).map_err(|err| SyncError::Io(err.error))?;
        tracing::info!(filename, bytes = body.len(), "artifact downloaded");
        Ok(dest)
    }
}
