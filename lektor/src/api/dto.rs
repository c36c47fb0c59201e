//! Request and response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub message: String,
    pub lang: Option<String>,
}

/// `GET /api/diag` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiagResponse {
    pub tesseract_available: bool,
    pub tesseract_cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tesseract_version: Option<String>,
}

/// Observability payload describing which segmentation mode won.
#[derive(Debug, Serialize, Deserialize)]
pub struct OcrDebug {
    /// `None` when the plain fallback path produced the text.
    pub best_psm: Option<u8>,
    pub score: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OcrResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentOcrTtsResponse {
    pub reply: String,
    pub audio_b64: String,
    pub ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_debug: Option<OcrDebug>,
}
