//! Gateway configuration
//!
//! Everything is read once from process environment at startup:
//! - `DOCGATE_BACKEND_URL`: processing service base URL
//! - `DOCGATE_BIND`: listen address
//! - `DOCGATE_ENV`: `production` or `development`

use std::net::SocketAddr;

/// Default processing-service base URL for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default gateway listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3100";

/// Deployment mode, gating log verbosity.
///
/// Production emits only `warn` and `error`; development emits everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployMode {
    /// Local/dev deployment: full logging
    #[default]
    Development,
    /// Production deployment: warnings and errors only
    Production,
}

impl DeployMode {
    /// Read the mode from `DOCGATE_ENV`. Anything other than
    /// `production` is treated as development.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("DOCGATE_ENV") {
            Ok(value) if value.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Default tracing directive for this mode.
    #[inline]
    #[must_use]
    pub fn default_directive(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production => "warn",
        }
    }
}

/// Configuration errors at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `DOCGATE_BIND` did not parse as a socket address
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),
}

/// Gateway process configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the processing service, shared by all routes
    pub backend_url: String,
    /// Address the gateway listens on
    pub bind: SocketAddr,
    /// Deployment mode
    pub mode: DeployMode,
}

impl GatewayConfig {
    /// Load configuration from the environment, with documented local
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url =
            std::env::var("DOCGATE_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let bind_raw = std::env::var("DOCGATE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw))?;

        Ok(Self {
            backend_url,
            bind,
            mode: DeployMode::from_env(),
        })
    }
}
