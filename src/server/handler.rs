use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
};
use ocr_engine::{recognize, OcrEngine};
use serde_json::Value;

use super::service::{ApiError, SuccessEnvelope};
use super::AppState;

const URL_FIELD: &str = "url";
const IMAGE_FIELD: &str = "image";

/// What the request body offered as an image source.
struct SourceInput {
    url: Option<String>,
    // only multipart requests carry an upload slot
    upload: Option<Result<Bytes, ApiError>>,
}

pub async fn handle_ocr(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();

    match process_ocr_request(&state, request).await {
        Ok(text) => {
            log::info!("OCR finished, {} characters extracted", text.len());
            SuccessEnvelope::new(text).into_response()
        }
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                log::error!("{} /ocr failed with {}: {:?}", method, status, err);
            } else {
                log::warn!("{} /ocr rejected with {}: {}", method, status, err);
            }
            err.into_envelope_response(state.redact_errors)
        }
    }
}

async fn process_ocr_request(state: &AppState, request: Request) -> Result<String, ApiError> {
    if request.method() != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let image = resolve_image(state, request).await?;
    run_ocr(state.engine.clone(), image).await
}

async fn resolve_image(state: &AppState, request: Request) -> Result<Bytes, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let query_url = request.uri().query().and_then(|q| form_value(q.as_bytes(), URL_FIELD));

    let input = if content_type.starts_with("application/json") {
        SourceInput {
            url: Some(read_json_url(request).await?),
            upload: None,
        }
    } else if content_type.starts_with("multipart/form-data") {
        let mut input = read_multipart(request).await;
        // body fields win over the query string
        if input.url.as_deref().map_or(true, str::is_empty) {
            input.url = query_url;
        }
        input
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| ApiError::Body(e.body_text()))?;
        SourceInput {
            url: form_value(&body, URL_FIELD).filter(|u| !u.is_empty()).or(query_url),
            upload: None,
        }
    } else {
        SourceInput {
            url: query_url,
            upload: None,
        }
    };

    if let Some(url) = input.url.filter(|u| !u.is_empty()) {
        log::info!("Downloading image from {}", url);
        let bytes = state.fetcher.fetch(&url).await?;
        return Ok(Bytes::from(bytes));
    }

    match input.upload {
        Some(upload) => {
            let bytes = upload?;
            log::info!("Received uploaded image of {} bytes", bytes.len());
            Ok(bytes)
        }
        None => Err(ApiError::NoImageSource),
    }
}

async fn read_json_url(request: Request) -> Result<String, ApiError> {
    let body = Bytes::from_request(request, &())
        .await
        .map_err(|e| ApiError::Body(e.body_text()))?;
    decode_url_payload(&body)
}

/// Pulls `url` out of the first JSON value in `body`, decoder-style: trailing
/// data is ignored, `null` means no url, and an exact key match beats a
/// case-insensitive one.
fn decode_url_payload(body: &[u8]) -> Result<String, ApiError> {
    let value = match serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
    {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(ApiError::InvalidJson(e.to_string())),
        None => return Err(ApiError::InvalidJson("EOF".to_string())),
    };

    let object = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(object) => object,
        other => {
            return Err(ApiError::InvalidJson(format!(
                "expected an object, found {}",
                other
            )))
        }
    };

    let url = object.get(URL_FIELD).or_else(|| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(URL_FIELD))
            .map(|(_, value)| value)
    });

    match url {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(url)) => Ok(url.clone()),
        Some(other) => Err(ApiError::InvalidJson(format!(
            "`url` must be a string, found {}",
            other
        ))),
    }
}

/// Walks every multipart field once, keeping the first `url` text and the
/// first `image` payload. A broken stream only matters when no url was found.
async fn read_multipart(request: Request) -> SourceInput {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return SourceInput {
                url: None,
                upload: Some(Err(ApiError::MissingImageFile(rejection.body_text()))),
            }
        }
    };

    let mut url: Option<String> = None;
    let mut upload: Option<Result<Bytes, ApiError>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                log::warn!("Malformed multipart body: {}", err);
                if upload.is_none() {
                    upload = Some(Err(ApiError::MissingImageFile(err.body_text())));
                }
                break;
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(URL_FIELD) if url.is_none() => {
                url = match field.text().await {
                    Ok(text) => Some(text),
                    Err(err) => {
                        log::warn!("Unreadable multipart `url` field: {}", err);
                        Some(String::new())
                    }
                };
            }
            Some(IMAGE_FIELD) if upload.is_none() => {
                // a truncated or over-limit field is the client's stream breaking
                let bytes = field.bytes().await.map_err(|e| {
                    log::warn!("Incomplete multipart `image` field: {}", e);
                    ApiError::MissingImageFile(e.body_text())
                });
                let broken = bytes.is_err();
                upload = Some(bytes);
                if broken {
                    break;
                }
            }
            _ => {}
        }
    }

    let upload = upload.or_else(|| {
        Some(Err(ApiError::MissingImageFile(format!(
            "no `{}` field in form",
            IMAGE_FIELD
        ))))
    });

    SourceInput { url, upload }
}

async fn run_ocr(engine: Arc<dyn OcrEngine>, image: Bytes) -> Result<String, ApiError> {
    let text = tokio::task::spawn_blocking(move || recognize(engine.as_ref(), &image))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))??;
    Ok(text)
}

fn form_value(encoded: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
