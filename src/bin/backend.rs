use anyhow::Context;
use chaoschain::api::create_backend_server;
use chaoschain::config::BackendArgs;
use chaoschain::metrics::{install_exporter, Recorder, TIER_BACKEND};
use chaoschain::simulator::Simulator;
use chaoschain::telemetry::init_tracing;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = BackendArgs::parse();
    init_tracing(&args.log);

    let config = args.into_config()?;
    install_exporter()?;

    tracing::info!(
        "Simulator: {}ms slow analysis, {} x {}MB memory blocks, {}s CPU burn",
        config.simulator.slow_delay.as_millis(),
        config.simulator.memory_blocks,
        config.simulator.block_size / (1024 * 1024),
        config.simulator.cpu_burn.as_secs()
    );

    let simulator = Simulator::new(config.simulator, Recorder::facade(TIER_BACKEND));
    let app = create_backend_server(simulator);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_addr))?;

    tracing::info!("chaoschain backend listening on http://{}", config.listen_addr);

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
