use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use ocr_engine::OcrConfig;

const MIB: usize = 1024 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "HTTP service that extracts text from images", long_about = None)]
pub struct ServerConfig {
    #[arg(long, env = "OCR_HOST", default_value = "0.0.0.0", help = "Address to listen on")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 8003, help = "Port to listen on")]
    pub port: u16,

    #[arg(
        long,
        env = "OCR_FETCH_TIMEOUT_SECS",
        default_value_t = 30,
        help = "Timeout for downloading an image from a URL, in seconds"
    )]
    pub fetch_timeout_secs: u64,

    #[arg(
        long,
        env = "OCR_MAX_IMAGE_BYTES",
        default_value_t = 20 * MIB,
        help = "Largest image accepted from a URL download"
    )]
    pub max_image_bytes: usize,

    #[arg(
        long,
        env = "OCR_MAX_UPLOAD_BYTES",
        default_value_t = 20 * MIB,
        help = "Largest request body accepted by /ocr"
    )]
    pub max_upload_bytes: usize,

    #[arg(long, env = "OCR_DPI", help = "Tesseract dpi (default 150)")]
    pub dpi: Option<u32>,

    #[arg(long, env = "OCR_PSM", help = "Tesseract page segmentation mode (default 3)")]
    pub psm: Option<u32>,

    #[arg(long, env = "OCR_OEM", help = "Tesseract OCR engine mode (default 3)")]
    pub oem: Option<u32>,

    #[arg(
        long,
        env = "OCR_REDACT_ERRORS",
        help = "Keep internal error details out of client-visible messages"
    )]
    pub redact_errors: bool,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig::new(self.dpi, self.psm, self.oem)
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_bytes: self.max_image_bytes,
        }
    }
}
