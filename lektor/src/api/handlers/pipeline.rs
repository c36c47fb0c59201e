use axum::extract::{Multipart, State};
use axum::Json;
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::api::dto::{AgentOcrTtsResponse, OcrDebug};
use crate::api::state::AppState;
use crate::chat::prompts;
use crate::error::{LektorError, Result};
use crate::ocr;

/// `POST /api/agent-ocr-tts` — combined OCR + chat + TTS pipeline.
///
/// Multipart form with optional `message`, `lang` and `file` (image) fields;
/// at least one of `message`/`file` is required. Recognized image text is
/// appended to the user message before the assistant is asked, and the reply
/// is returned together with base64 audio.
pub async fn agent_ocr_tts(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AgentOcrTtsResponse>> {
    let mut message: Option<String> = None;
    let mut lang: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "message" => {
                message = Some(field.text().await.map_err(|e| {
                    LektorError::Validation(format!("Invalid message field: {e}"))
                })?);
            }
            "lang" => {
                lang = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| LektorError::Validation(format!("Invalid lang field: {e}")))?,
                );
            }
            "file" => {
                let bytes = field.bytes().await.map_err(|e| {
                    LektorError::Validation(format!("Failed to read uploaded file: {e}"))
                })?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let message = message.unwrap_or_default();
    if message.trim().is_empty() && file_bytes.is_none() {
        return Err(LektorError::Validation(
            "Provide a 'message' or an image 'file'".to_string(),
        ));
    }

    let (ocr_text, ocr_debug) = match &file_bytes {
        Some(bytes) => {
            let best = ocr::recognize_best(&state.ocr, &state.config.ocr, bytes).await?;
            let debug = OcrDebug {
                best_psm: best.psm,
                score: best.score,
            };
            (Some(best.text), Some(debug))
        }
        None => (None, None),
    };

    let user_content = compose_user_content(&message, ocr_text.as_deref());

    let tts = state.tts.as_ref().ok_or_else(|| {
        LektorError::Tts("Speech synthesis is not configured (set OPENAI_API_KEY)".to_string())
    })?;

    let system_prompt = prompts::system_prompt_for_lang(lang.as_deref());
    let reply = state.chat.complete(&user_content, system_prompt).await?;
    let audio = tts.synthesize(&reply).await?;

    Ok(Json(AgentOcrTtsResponse {
        reply,
        audio_b64: STANDARD.encode(audio),
        ocr_text,
        ocr_debug,
    }))
}

/// Join a typed message with recognized image text. Either part may be
/// empty; when both are present the recognized text follows the message as
/// its own paragraph.
fn compose_user_content(message: &str, ocr_text: Option<&str>) -> String {
    let message = message.trim();
    let ocr_text = ocr_text.map(str::trim).unwrap_or_default();

    match (message.is_empty(), ocr_text.is_empty()) {
        (false, false) => format!("{message}\n\n{ocr_text}"),
        (false, true) => message.to_string(),
        (true, _) => ocr_text.to_string(),
    }
}
