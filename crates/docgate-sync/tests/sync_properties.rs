//! End-to-end properties of the synchronization layer: cache freshness,
//! post-mutation invalidation, the upload deadline, convergence after a
//! racing delete, and download materialization. All timing runs on the
//! paused tokio clock.

use async_trait::async_trait;
use bytes::Bytes;
use docgate_model::{Artifact, ArtifactRoster, GenerationResult, MutationAck, SpreadsheetState};
use docgate_sync::mutation::UPLOAD_DEADLINE;
use docgate_sync::poller::{ROSTER_POLL_INTERVAL, STATUS_STALENESS_WINDOW};
use docgate_sync::{GatewayApi, SyncError, SyncLayer, UploadFile, UploadRequest};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn artifact(filename: &str) -> Artifact {
    Artifact {
        filename: filename.to_string(),
        file_size: 2048,
        created: 1_700_000_000.0,
        file_path: format!("/out/{filename}"),
    }
}

fn roster_of(names: &[&str]) -> ArtifactRoster {
    ArtifactRoster {
        files: names.iter().map(|name| artifact(name)).collect(),
        count: names.len(),
        output_directory: "/out".to_string(),
        format: Some("pdf".to_string()),
    }
}

/// Gateway double holding an authoritative roster, with scriptable
/// upload latency and download failure.
struct ScriptedApi {
    roster: Mutex<ArtifactRoster>,
    spreadsheet_loaded: Mutex<bool>,
    upload_delay: Mutex<Option<Duration>>,
    fail_download: Mutex<bool>,
    status_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(roster: ArtifactRoster) -> Arc<Self> {
        Arc::new(Self {
            roster: Mutex::new(roster),
            spreadsheet_loaded: Mutex::new(false),
            upload_delay: Mutex::new(None),
            fail_download: Mutex::new(false),
            status_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl GatewayApi for ScriptedApi {
    async fn spreadsheet_status(&self) -> Result<SpreadsheetState, SyncError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if *self.spreadsheet_loaded.lock() {
            Ok(SpreadsheetState {
                exists: true,
                rows: Some(42),
                columns: Some(vec!["User Name".to_string(), "Emp ID".to_string()]),
                columns_count: Some(2),
                has_user_name: Some(true),
                has_emp_id: Some(true),
                message: None,
            })
        } else {
            Ok(SpreadsheetState::absent())
        }
    }

    async fn clear_spreadsheet(&self) -> Result<MutationAck, SyncError> {
        *self.spreadsheet_loaded.lock() = false;
        Ok(MutationAck {
            success: true,
            message: "Spreadsheet cleared".to_string(),
        })
    }

    async fn upload(&self, request: UploadRequest) -> Result<GenerationResult, SyncError> {
        let delay = *self.upload_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        *self.spreadsheet_loaded.lock() = true;
        let generated = request.file.map(|file| file.filename);
        if let Some(name) = &generated {
            self.roster.lock().files.push(artifact(name));
        }
        Ok(GenerationResult {
            success: true,
            message: "Generation complete".to_string(),
            total_employees: 1,
            successful_generations: 1,
            total_resources: 1,
            ..GenerationResult::default()
        })
    }

    async fn list_artifacts(&self) -> Result<ArtifactRoster, SyncError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.roster.lock().clone())
    }

    async fn delete_artifact(&self, filename: &str) -> Result<MutationAck, SyncError> {
        let mut roster = self.roster.lock();
        roster.files.retain(|file| file.filename != filename);
        Ok(MutationAck {
            success: true,
            message: format!("Deleted {filename}"),
        })
    }

    async fn delete_all_artifacts(&self) -> Result<MutationAck, SyncError> {
        let mut roster = self.roster.lock();
        roster.files.clear();
        roster.count = 0;
        Ok(MutationAck {
            success: true,
            message: "All documents deleted".to_string(),
        })
    }

    async fn download_artifact(&self, filename: &str) -> Result<Bytes, SyncError> {
        if *self.fail_download.lock() {
            return Err(SyncError::Gateway {
                status: 404,
                message: format!("File not found: {filename}"),
            });
        }
        Ok(Bytes::from_static(b"%PDF-1.7 payload"))
    }
}

#[tokio::test(start_paused = true)]
async fn repeated_reads_within_window_issue_one_fetch() {
    let api = ScriptedApi::new(roster_of(&["a.pdf", "b.pdf"]));
    let layer = SyncLayer::new(api.clone());

    for _ in 0..5 {
        let roster = layer.roster.current().await;
        assert_eq!(roster.count, 2);
    }

    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn delete_invalidates_roster_within_staleness_window() {
    let api = ScriptedApi::new(roster_of(&["a.pdf", "b.pdf"]));
    let layer = SyncLayer::new(api.clone());

    assert_eq!(layer.roster.current().await.count, 2);

    // Well inside the staleness window; only the stale flag can force
    // the next read back to the gateway.
    layer.mutations.delete_artifact("a.pdf").await.unwrap();
    let roster = layer.roster.current().await;

    assert_eq!(roster.count, 1);
    assert_eq!(roster.files[0].filename, "b.pdf");
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn upload_invalidates_both_resources() {
    let api = ScriptedApi::new(roster_of(&[]));
    let layer = SyncLayer::new(api.clone());

    assert!(!layer.status.current().await.exists);
    assert_eq!(layer.roster.current().await.count, 0);

    let result = layer
        .mutations
        .upload(UploadRequest {
            file: Some(UploadFile {
                filename: "roster.xlsx".to_string(),
                content: Bytes::from_static(b"xlsx bytes"),
            }),
            ..UploadRequest::default()
        })
        .await
        .unwrap();
    assert!(result.success);

    // Both cached values were flagged stale by the upload.
    let state = layer.status.current().await;
    let roster = layer.roster.current().await;
    assert!(state.exists);
    assert_eq!(roster.count, 1);
    assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn clear_invalidates_status_only() {
    let api = ScriptedApi::new(roster_of(&["a.pdf"]));
    *api.spreadsheet_loaded.lock() = true;
    let layer = SyncLayer::new(api.clone());

    assert!(layer.status.current().await.exists);
    layer.roster.current().await;

    layer.mutations.clear_spreadsheet().await.unwrap();

    assert!(!layer.status.current().await.exists);
    // The roster entry was untouched: still one list fetch total.
    layer.roster.current().await;
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_upload_times_out_with_timeout_message() {
    let api = ScriptedApi::new(roster_of(&[]));
    *api.upload_delay.lock() = Some(UPLOAD_DEADLINE + Duration::from_secs(1));
    let layer = SyncLayer::new(api.clone());

    let err = layer
        .mutations
        .upload(UploadRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(!err.is_connectivity());
    assert!(err.to_string().contains("timed out after 180s"));
    assert_ne!(
        err.to_string(),
        SyncError::Connectivity("connection refused".to_string()).to_string()
    );
}

#[tokio::test(start_paused = true)]
async fn roster_converges_after_delete_all_within_one_interval() {
    let api = ScriptedApi::new(roster_of(&["a.pdf", "b.pdf", "c.pdf"]));
    let layer = SyncLayer::new(api.clone());
    let (_status_task, _roster_task) = layer.start();
    tokio::task::yield_now().await;

    assert_eq!(layer.roster.current().await.count, 3);

    // A second client wipes everything behind this layer's back: no
    // invalidation reaches our cache entry.
    api.delete_all_artifacts().await.unwrap();

    // The background poller picks up the truth within one interval.
    tokio::time::advance(ROSTER_POLL_INTERVAL).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let roster = layer.roster.current().await;
    assert!(roster.is_empty());
}

#[tokio::test(start_paused = true)]
async fn status_refetches_after_staleness_window() {
    let api = ScriptedApi::new(roster_of(&[]));
    let layer = SyncLayer::new(api.clone());

    layer.status.current().await;
    tokio::time::advance(STATUS_STALENESS_WINDOW + Duration::from_millis(1)).await;
    layer.status.current().await;

    assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn download_materializes_file_atomically() {
    let api = ScriptedApi::new(roster_of(&["report.pdf"]));
    let layer = SyncLayer::new(api);
    let dir = tempfile::tempdir().unwrap();

    let path = layer
        .mutations
        .download("report.pdf", dir.path())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("report.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 payload");
    // Nothing but the finished file remains.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_download_leaves_no_partial_file() {
    let api = ScriptedApi::new(roster_of(&[]));
    *api.fail_download.lock() = true;
    let layer = SyncLayer::new(api);
    let dir = tempfile::tempdir().unwrap();

    let err = layer
        .mutations
        .download("missing.pdf", dir.path())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("File not found"));
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty(), "download failure left files behind");
}

#[tokio::test(start_paused = true)]
async fn download_rejects_path_traversal_names() {
    let api = ScriptedApi::new(roster_of(&[]));
    let layer = SyncLayer::new(api);
    let dir = tempfile::tempdir().unwrap();

    let err = layer.mutations.download("..", dir.path()).await.unwrap_err();

    assert!(matches!(err, SyncError::InvalidResponse(_)));
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(entries.is_empty());
}
