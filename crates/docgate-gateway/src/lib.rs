//! Docgate Gateway - request-forwarding boundary for the dashboard
//!
//! Each inbound route translates into exactly one outbound call to the
//! processing service, with the cross-cutting rules:
//! - Filename path segments are forwarded byte-identical, never re-encoded
//! - Query-form filename routes validate before any outbound call
//! - Download routes are a transparent proxy on upstream failure and force
//!   an attachment disposition on success
//! - JSON routes normalize upstream failures into a `{"error": ...}`
//!   envelope (status 500 for all routes except upload, which keeps the
//!   upstream status)
//! - A 404 from the listing endpoint means "not available yet", not an error
//!
//! The gateway holds no state between requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use docgate_gateway::{routes, GatewayConfig};
//! use docgate_transport::HttpTransport;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GatewayConfig::from_env()?;
//! let transport = Arc::new(HttpTransport::new(config.backend_url.clone()));
//! warp::serve(routes::routes(transport)).run(config.bind).await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod telemetry;
pub mod upstream;

pub use config::{DeployMode, GatewayConfig};
pub use error::GatewayError;
pub use routes::routes;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
