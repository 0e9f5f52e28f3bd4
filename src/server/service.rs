use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ocr_engine::RecognizeError;
use serde::Serialize;
use thiserror::Error;

use super::fetch::FetchError;

pub const SUCCESS_MESSAGE: &str = "OCR berhasil";

#[derive(Serialize, Debug)]
pub struct SuccessEnvelope {
    pub status: bool,
    pub msg: String,
    pub ocr_data: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorEnvelope {
    pub status: bool,
    pub err_msg: String,
}

impl SuccessEnvelope {
    pub fn new(ocr_data: String) -> Self {
        Self {
            status: true,
            msg: SUCCESS_MESSAGE.to_string(),
            ocr_data,
        }
    }
}

impl IntoResponse for SuccessEnvelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

impl ErrorEnvelope {
    pub fn response(status: StatusCode, err_msg: impl Into<String>) -> Response {
        let envelope = Self {
            status: false,
            err_msg: err_msg.into(),
        };
        (status, Json(envelope)).into_response()
    }
}

/// Every way a single `/ocr` request can fail. Each variant maps to one
/// status code and one client-visible message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Only POST allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Failed to read request body: {0}")]
    Body(String),

    #[error("No image source provided")]
    NoImageSource,

    // upstream detail goes to the log, never to the client
    #[error("Failed to download image from URL")]
    Download(#[source] FetchError),

    #[error("Failed to read image from URL")]
    ReadUrl(#[source] FetchError),

    #[error("Failed to get image file: {0}")]
    MissingImageFile(String),

    #[error(transparent)]
    Recognize(#[from] RecognizeError),

    #[error("OCR task failed: {0}")]
    Task(String),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        if err.is_read_failure() {
            ApiError::ReadUrl(err)
        } else {
            ApiError::Download(err)
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidJson(_)
            | ApiError::Body(_)
            | ApiError::NoImageSource
            | ApiError::Download(_)
            | ApiError::MissingImageFile(_) => StatusCode::BAD_REQUEST,
            ApiError::ReadUrl(_)
            | ApiError::Recognize(_)
            | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in `err_msg`. With `redact` set, embedded error
    /// text is dropped and only the fixed prefix remains.
    pub fn public_message(&self, redact: bool) -> String {
        if !redact {
            return self.to_string();
        }

        let prefix = match self {
            ApiError::InvalidJson(_) => "Invalid JSON",
            ApiError::Body(_) => "Failed to read request body",
            ApiError::MissingImageFile(_) => "Failed to get image file",
            ApiError::Recognize(RecognizeError::Init(_)) => "Failed to initialize OCR client",
            ApiError::Recognize(RecognizeError::SetImage(_)) => "Failed to set image",
            ApiError::Recognize(RecognizeError::Extract(_)) => "OCR error",
            ApiError::Task(_) => "OCR task failed",
            other => return other.to_string(),
        };
        prefix.to_string()
    }

    pub fn into_envelope_response(self, redact: bool) -> Response {
        ErrorEnvelope::response(self.status_code(), self.public_message(redact))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_envelope_response(false)
    }
}

pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    log::error!("Handler panicked: {}", detail);

    ErrorEnvelope::response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
