use anyhow::Context;
use std::sync::Arc;
use stockcast::config::Config;
use stockcast::infrastructure::ServiceFactory;
use stockcast::infrastructure::observability::{LogTarget, init_tracing};
use stockcast::interfaces::http;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogTarget::Stdout);

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Starting stock predictor API (mode={:?}, period={}, trees={})",
        config.mode, config.default_period, config.model.n_trees
    );

    let service = Arc::new(ServiceFactory::create_prediction_service(&config));
    let app = http::router(service, &config.server.static_dir);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}
