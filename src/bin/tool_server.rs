use anyhow::Context;
use std::sync::Arc;
use stockcast::config::Config;
use stockcast::infrastructure::ServiceFactory;
use stockcast::infrastructure::observability::{LogTarget, init_tracing};
use stockcast::interfaces::tool_server::ToolServer;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout carries protocol frames only
    init_tracing(LogTarget::Stderr);

    let config = Config::from_env().context("Failed to load configuration")?;
    let service = Arc::new(ServiceFactory::create_prediction_service(&config));
    info!("Tool server ready on stdio (mode={:?})", config.mode);

    ToolServer::new(service)
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Tool server I/O failed")?;
    Ok(())
}
