//! Status and roster pollers
//!
//! Thin consumers of [`AsyncResource`], one logical key each. Both absorb
//! fetch failures into safe defaults: the dashboard must never fault
//! because a background refresh failed transiently. The status resource
//! is refreshed aggressively since generation availability is gated on
//! it; the roster is less time-sensitive.

use crate::api::GatewayApi;
use crate::cache::AsyncResource;
use docgate_model::{ArtifactRoster, SpreadsheetState};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Poll interval for spreadsheet state.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(5_000);
/// Staleness window for spreadsheet state.
pub const STATUS_STALENESS_WINDOW: Duration = Duration::from_millis(3_000);

/// Poll interval for the artifact roster.
pub const ROSTER_POLL_INTERVAL: Duration = Duration::from_millis(10_000);
/// Staleness window for the artifact roster.
pub const ROSTER_STALENESS_WINDOW: Duration = Duration::from_millis(5_000);

/// Poller for the `spreadsheet-state` resource.
pub struct StatusPoller {
    resource: AsyncResource<SpreadsheetState>,
}

impl StatusPoller {
    /// Build the poller around a gateway client.
    #[must_use]
    pub fn new(api: Arc<dyn GatewayApi>) -> Self {
        let resource = AsyncResource::new(
            "spreadsheet-state",
            STATUS_POLL_INTERVAL,
            STATUS_STALENESS_WINDOW,
            move || {
                let api = api.clone();
                async move {
                    match api.spreadsheet_status().await {
                        Ok(state) => state,
                        Err(err) => {
                            tracing::warn!(%err, "status refresh failed, holding safe default");
                            SpreadsheetState::absent()
                        }
                    }
                }
            },
        );
        Self { resource }
    }

    /// Current spreadsheet state, via the cache.
    pub async fn current(&self) -> SpreadsheetState {
        self.resource.read().await
    }

    /// Start the background poll loop.
    pub fn start(&self) -> JoinHandle<()> {
        self.resource.start_polling()
    }

    /// The underlying cache resource.
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &AsyncResource<SpreadsheetState> {
        &self.resource
    }
}

/// Poller for the `artifact-roster` resource.
pub struct RosterPoller {
    resource: AsyncResource<ArtifactRoster>,
}

impl RosterPoller {
    /// Build the poller around a gateway client.
    #[must_use]
    pub fn new(api: Arc<dyn GatewayApi>) -> Self {
        let resource = AsyncResource::new(
            "artifact-roster",
            ROSTER_POLL_INTERVAL,
            ROSTER_STALENESS_WINDOW,
            move || {
                let api = api.clone();
                async move {
                    match api.list_artifacts().await {
                        // Count is never trusted, even through the gateway
                        Ok(roster) => roster.normalized(),
                        Err(err) => {
                            tracing::warn!(%err, "roster refresh failed, holding safe default");
                            ArtifactRoster::empty()
                        }
                    }
                }
            },
        );
        Self { resource }
    }

    /// Current roster, via the cache.
    pub async fn current(&self) -> ArtifactRoster {
        self.resource.read().await
    }

    /// Start the background poll loop.
    pub fn start(&self) -> JoinHandle<()> {
        self.resource.start_polling()
    }

    /// The underlying cache resource.
    #[inline]
    #[must_use]
    pub fn resource(&self) -> &AsyncResource<ArtifactRoster> {
        &self.resource
    }
}
