use axum::extract::{Multipart, State};
use axum::Json;

use super::parse_form_bool;
use crate::api::dto::OcrResponse;
use crate::api::state::AppState;
use crate::chat::prompts;
use crate::error::{LektorError, Result};
use crate::ocr;

/// `POST /api/ocr` — recognize text in an uploaded image.
///
/// Accepts the image under a `file` or `image` field. When `sendToAgent` is
/// truthy the recognized text is forwarded to the assistant and the reply is
/// included in the response.
pub async fn ocr(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut send_to_agent = false;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" | "image" => {
                let bytes = field.bytes().await.map_err(|e| {
                    LektorError::Validation(format!("Failed to read uploaded file: {e}"))
                })?;
                file_bytes = Some(bytes.to_vec());
            }
            "sendToAgent" | "send_to_agent" => {
                let raw = field.text().await.map_err(|e| {
                    LektorError::Validation(format!("Invalid sendToAgent value: {e}"))
                })?;
                send_to_agent = parse_form_bool(&raw).unwrap_or(false);
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| {
        LektorError::Validation("Missing image upload ('file' or 'image' field)".to_string())
    })?;

    let best = ocr::recognize_best(&state.ocr, &state.config.ocr, &bytes).await?;

    let reply = if send_to_agent && !best.text.trim().is_empty() {
        Some(
            state
                .chat
                .complete(&best.text, prompts::ENGLISH_TUTOR_CONCISE_PROMPT)
                .await?,
        )
    } else {
        None
    };

    Ok(Json(OcrResponse {
        text: best.text,
        reply,
    }))
}
