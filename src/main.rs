mod config;

use clap::Parser as _;
use conduit::{
    AppState, backend::Backend, build_metrics_layer_and_handle, build_metrics_router,
    build_router, client::PoolConfig,
};
use config::Config;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

#[tokio::main]
#[instrument]
pub async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse().validate()?;
    info!("Starting inference relay with config: {:?}", config);

    let backend = Backend::builder()
        .url(config.backend.clone())
        .invocation_path(config.invocation_path.clone())
        .build();

    let pool = PoolConfig {
        idle_timeout: Duration::from_secs(config.pool_idle_timeout_secs),
        max_idle_per_host: config.pool_max_idle_per_host,
    };

    let app_state = AppState::with_pool(backend, pool);
    let mut router = build_router(app_state);

    if config.metrics {
        let (prometheus_layer, handle) =
            build_metrics_layer_and_handle(config.metrics_prefix.clone());
        router = router.layer(prometheus_layer);

        let metrics_router = build_metrics_router(handle);
        let metrics_addr = format!("0.0.0.0:{}", config.metrics_port);
        let metrics_listener = TcpListener::bind(&metrics_addr).await?;
        info!("Metrics server listening on {}", metrics_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_router).await {
                error!("Metrics server error: {}", e);
            }
        });
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Inference relay listening on {}", bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
