// OCR module structure
mod ocr_tesseract;
mod types;

pub use ocr_tesseract::TesseractEngine;
pub use types::OcrConfig;

use anyhow::Result;
use thiserror::Error;

/// A single-use OCR session over one image.
///
/// Anything the client holds is released when it is dropped, so callers get
/// cleanup on every exit path simply by letting the client go out of scope.
pub trait OcrClient {
    fn set_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    fn text(&mut self) -> Result<String>;
}

/// Hands out fresh clients. Engines are shared between requests and must not
/// carry per-image state.
pub trait OcrEngine: Send + Sync {
    fn new_client(&self) -> Result<Box<dyn OcrClient>>;
}

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("Failed to initialize OCR client: {0:#}")]
    Init(anyhow::Error),

    #[error("Failed to set image: {0:#}")]
    SetImage(anyhow::Error),

    #[error("OCR error: {0:#}")]
    Extract(anyhow::Error),
}

/// Runs `bytes` through a freshly created client and returns the recognized
/// text verbatim. The client is dropped before this returns, whatever the outcome.
pub fn recognize(engine: &dyn OcrEngine, bytes: &[u8]) -> Result<String, RecognizeError> {
    let mut client = engine.new_client().map_err(RecognizeError::Init)?;
    log::debug!("OCR client created for {} bytes", bytes.len());

    client
        .set_image_from_bytes(bytes)
        .map_err(RecognizeError::SetImage)?;

    client.text().map_err(RecognizeError::Extract)
}
