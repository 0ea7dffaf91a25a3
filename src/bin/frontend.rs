use anyhow::Context;
use chaoschain::api::create_frontend_server;
use chaoschain::config::FrontendArgs;
use chaoschain::metrics::{install_exporter, Recorder, TIER_FRONTEND};
use chaoschain::proxy::BackendClient;
use chaoschain::telemetry::init_tracing;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = FrontendArgs::parse();
    init_tracing(&args.log);

    // A missing backend URL stops the process here, before anything binds
    let config = args.into_config().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    tracing::info!("Backend URL successfully loaded: {}", config.proxy.base_url);

    install_exporter()?;
    let client = BackendClient::new(config.proxy)?;
    let app = create_frontend_server(client, Recorder::facade(TIER_FRONTEND));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_addr))?;

    tracing::info!("chaoschain frontend listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
