//! Process-wide tracing setup
//!
//! One subscriber for the whole process, level-gated by deployment mode:
//! production emits `warn`/`error` only, development emits everything.
//! `RUST_LOG` overrides the mode default when set.

use crate::config::DeployMode;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init(mode: DeployMode) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(mode.default_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
