//! Docgate Sync - client synchronization layer
//!
//! Keeps two logical resources consistent with the gateway despite
//! polling, races, and partial failures:
//! - `spreadsheet-state`: existence/schema of the uploaded spreadsheet
//! - `artifact-roster`: the list of generated documents
//!
//! Reads flow through the [`cache::AsyncResource`] abstraction (staleness
//! window + poll interval + explicit invalidation); writes go through the
//! [`mutation::MutationController`], which never touches cache values
//! directly: it only flags them stale and lets the next read re-derive
//! truth from the service. Consistency is eventual, bounded by the roster
//! poll interval.

#![warn(unreachable_pub)]

pub mod api;
pub mod cache;
pub mod error;
pub mod mutation;
pub mod poller;

pub use api::{GatewayApi, HttpGatewayApi, UploadFile, UploadRequest};
pub use cache::{AsyncResource, CacheEntry};
pub use error::SyncError;
pub use mutation::MutationController;
pub use poller::{RosterPoller, StatusPoller};

use std::sync::Arc;
use tokio::task::JoinHandle;

/// The assembled synchronization layer: both pollers plus the mutation
/// controller, sharing one gateway client.
pub struct SyncLayer {
    /// Spreadsheet-state poller
    pub status: StatusPoller,
    /// Artifact-roster poller
    pub roster: RosterPoller,
    /// Write-side controller
    pub mutations: MutationController,
}

impl SyncLayer {
    /// Build the layer around a gateway client.
    #[must_use]
    pub fn new(api: Arc<dyn GatewayApi>) -> Self {
        let status = StatusPoller::new(api.clone());
        let roster = RosterPoller::new(api.clone());
        let mutations = MutationController::new(api, &status, &roster);
        Self {
            status,
            roster,
            mutations,
        }
    }

    /// Start both background pollers.
    pub fn start(&self) -> (JoinHandle<()>, JoinHandle<()>) {
        (self.status.start(), self.roster.start())
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
