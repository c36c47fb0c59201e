use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LektorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Chat upstream error: {0}")]
    Chat(String),

    #[error("TTS upstream error: {0}")]
    Tts(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for LektorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LektorError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            LektorError::Chat(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            LektorError::Tts(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            LektorError::Ocr(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            LektorError::OcrUnavailable(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            LektorError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            LektorError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            LektorError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            LektorError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LektorError>;
