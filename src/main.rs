use std::sync::Arc;

use anyhow::Context;
use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;
use webhook_relay::config::RelayConfig;
use webhook_relay::context::RelayContext;
use webhook_relay::logging;
use webhook_relay::mcp::RelayServer;
use webhook_relay::tools::ToolRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RelayConfig::from_env()?;
    config.validate()?;

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = logging::init_logging(&config)?;

    tracing::info!("=== Webhook Relay Starting ===");
    tracing::info!("Webhook base URL: {}", config.base_url);
    tracing::debug!("Configuration: {:?}", config);

    let context = Arc::new(RelayContext::new(config)?);
    let registry = ToolRegistry::standard(context.clone());
    tracing::info!("Registered {} tools", registry.len());

    let cancel = CancellationToken::new();
    let reaper = context.reaper().spawn(cancel.clone());

    let service = RelayServer::new(Arc::new(registry))
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server on stdio")?;

    tokio::select! {
        result = service.waiting() => {
            result.context("MCP server stopped with an error")?;
            tracing::info!("MCP client disconnected");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C");
        }
    }

    cancel.cancel();
    if let Err(e) = reaper.await {
        tracing::warn!("Session reaper task ended abnormally: {}", e);
    }

    tracing::info!("=== Webhook Relay Shutting Down ===");

    Ok(())
}
