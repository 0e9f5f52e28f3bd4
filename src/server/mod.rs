mod fetch;
mod handler;
pub mod service;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use ocr_engine::OcrEngine;
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::ServerConfig;

pub use fetch::{FetchError, ImageFetcher};
pub use handler::handle_ocr;

/// Shared, read-only request context. Nothing in here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn OcrEngine>,
    pub fetcher: ImageFetcher,
    pub redact_errors: bool,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig, engine: Arc<dyn OcrEngine>) -> anyhow::Result<Self> {
        Ok(Self {
            engine,
            fetcher: ImageFetcher::new(&config.fetch_config())?,
            redact_errors: config.redact_errors,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "healthy" }))
        .route("/ocr", any(handle_ocr))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(service::panic_response))
        .with_state(state)
}
