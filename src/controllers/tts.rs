use axum::{
    body::Body,
    extract::{
        multipart::MultipartError,
        rejection::JsonRejection,
        Multipart, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{DeliveryPayload, SynthesisOptions, TtsRequest, TtsService, TtsServiceApi},
    error::{AppError, AppResult},
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/tts - Convert text to a single MP3
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        request: Result<Json<TtsRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let Json(request) = request.map_err(|rejection| {
            AppError::BadRequest(format!("invalid input: {}", rejection.body_text()))
        })?;

        let payload = controller.tts_service.synthesize(request).await?;

        deliver(payload)
    }

    /// POST /api/tts-csv - Convert every row of an uploaded CSV, delivered as a ZIP of MP3s
    pub async fn synthesize_csv(
        State(controller): State<Arc<TtsController>>,
        mut multipart: Multipart,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let mut csv: Option<Vec<u8>> = None;
        let mut options = SynthesisOptions::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("invalid multipart body", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("failed to read upload", e))?;
                csv = Some(bytes.to_vec());
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| multipart_error(&format!("invalid form field '{}'", name), e))?;
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match name.as_str() {
                "engine" => options.engine = Some(value.to_string()),
                "lang" => options.lang = Some(value.to_string()),
                "voice" => options.voice = Some(value.to_string()),
                "rate" => options.rate = Some(parse_field(&name, value)?),
                "volume" => options.volume = Some(parse_field(&name, value)?),
                _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        let csv = csv.ok_or_else(|| {
            AppError::BadRequest("CSV file is required (form field 'file')".to_string())
        })?;

        let payload = controller.tts_service.synthesize_csv(&csv, options).await?;

        deliver(payload)
    }
}

/// Keep the body limit's 413; every other multipart failure is the client's malformed input
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let message = format!("{}: {}", context, e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid input: {} must be a number", name)))
}

fn deliver(payload: DeliveryPayload) -> AppResult<(StatusCode, HeaderMap, Body)> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(payload.content_type),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&payload.content_disposition())
            .map_err(|e| AppError::Internal(format!("invalid content disposition: {}", e)))?,
    );

    Ok((StatusCode::OK, headers, Body::from(payload.bytes)))
}
