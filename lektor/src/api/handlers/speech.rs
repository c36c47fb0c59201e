use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::dto::AgentRequest;
use crate::api::state::AppState;
use crate::chat::prompts;
use crate::error::{LektorError, Result};

/// `POST /api/agent-tts` — assistant reply spoken back as an audio stream.
pub async fn agent_tts(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Result<Response> {
    if request.message.trim().is_empty() {
        return Err(LektorError::Validation(
            "Missing 'message' in request body".to_string(),
        ));
    }

    let tts = state.tts.as_ref().ok_or_else(|| {
        LektorError::Tts("Speech synthesis is not configured (set OPENAI_API_KEY)".to_string())
    })?;

    let system_prompt = prompts::system_prompt_for_lang(request.lang.as_deref());
    let reply = state.chat.complete(&request.message, system_prompt).await?;
    let audio = tts.synthesize(&reply).await?;

    Ok(([(header::CONTENT_TYPE, tts.content_type())], audio).into_response())
}
