use anyhow::Context;
use docgate_gateway::{routes, telemetry, GatewayConfig};
use docgate_transport::{HttpTransport, Transport};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env().context("loading gateway configuration")?;
    telemetry::init(config.mode);

    tracing::info!(
        backend = %config.backend_url,
        bind = %config.bind,
        mode = ?config.mode,
        "starting docgate gateway"
    );

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.backend_url.clone()));
    warp::serve(routes(transport)).run(config.bind).await;

    Ok(())
}
