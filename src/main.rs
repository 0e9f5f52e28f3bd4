use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ocr_engine::TesseractEngine;
use ocr_gateway::common::init_logger;
use ocr_gateway::config::ServerConfig;
use ocr_gateway::server::{router, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(env!("CARGO_PKG_NAME"));
    let config = ServerConfig::parse();

    log::info!("Starting server...");

    let engine = Arc::new(TesseractEngine::new(config.ocr_config()));
    let state = AppState::new(&config, engine)?;
    let app = router(state);

    let addr = config.socket_addr();
    log::info!("Attempting to bind to {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    log::info!("OCR server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Error setting Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    log::warn!("Ctrl-C received, stopping...");
}
