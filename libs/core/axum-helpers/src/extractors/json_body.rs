//! Untyped JSON object extractor with strict Content-Type checking.

use crate::errors::{AppError, ErrorCode};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde_json::{Map, Value};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Request body parsed as a JSON object, left untyped so the domain layer
/// can apply its own field-by-field mapping rules.
///
/// Rejections:
/// - missing Content-Type, or a media type other than `application/json` → 415
/// - malformed JSON, or a JSON value that is not an object → 400
///
/// Media type parameters such as `charset=utf-8` are accepted.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_content_type(req.headers())?;

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonBody(map)),
            Ok(_) => Err(AppError::InvalidJson(
                "Request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(AppError::InvalidJson(format!("Invalid JSON: {}", e))),
        }
    }
}

fn check_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let unsupported = || {
        AppError::UnsupportedMediaType(ErrorCode::UnsupportedMediaType.default_message().to_string())
    };

    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        tracing::warn!("No Content-Type specified");
        return Err(unsupported());
    };

    let essence = value
        .to_str()
        .ok()
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or_default();

    if essence.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        Ok(())
    } else {
        tracing::warn!(content_type = ?value, "Invalid Content-Type");
        Err(unsupported())
    }
}
