use axum::extract::State;
use axum::Json;

use crate::api::dto::{AgentRequest, ChatReply, ChatRequest};
use crate::api::state::AppState;
use crate::chat::prompts;
use crate::error::{LektorError, Result};

/// `POST /chat` — tutor reply for a single prompt.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    if request.prompt.trim().is_empty() {
        return Err(LektorError::Validation(
            "Missing 'prompt' in request body".to_string(),
        ));
    }

    let reply = state
        .chat
        .complete(&request.prompt, prompts::ENGLISH_TUTOR_PROMPT)
        .await?;

    Ok(Json(ChatReply { reply }))
}

/// `POST /api/agent` — assistant reply with a language-dependent prompt.
pub async fn agent(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Result<Json<ChatReply>> {
    if request.message.trim().is_empty() {
        return Err(LektorError::Validation(
            "Missing 'message' in request body".to_string(),
        ));
    }

    let system_prompt = prompts::system_prompt_for_lang(request.lang.as_deref());
    let reply = state.chat.complete(&request.message, system_prompt).await?;

    Ok(Json(ChatReply { reply }))
}
