use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};

use crate::config::ChatConfig;
use crate::error::{LektorError, Result};

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// Failures are surfaced to the caller immediately: there is no retry loop,
/// and the library's internal backoff is disabled so a single upstream error
/// maps to a single HTTP error response.
#[derive(Clone)]
pub struct ChatClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout_secs: u64,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.base_url.clone())
            .with_api_key(config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                LektorError::Internal(format!("Failed to create chat HTTP client: {error}"))
            })?;

        // async-openai retries 500s with exponential backoff by default.
        // Zero max_elapsed_time means the first failure is the final one.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Ask the model for a single assistant reply.
    pub async fn complete(&self, user_content: &str, system_prompt: &str) -> Result<String> {
        if user_content.trim().is_empty() {
            return Err(LektorError::Validation(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let request = self.build_request(user_content, system_prompt)?;

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => Err(self.map_openai_error(error)),
        }
    }

    fn build_request(
        &self,
        user_content: &str,
        system_prompt: &str,
    ) -> Result<CreateChatCompletionRequest> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|error| {
                    LektorError::Validation(format!("Invalid system prompt: {error}"))
                })?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_content)
                .build()
                .map_err(|error| LektorError::Validation(format!("Invalid user prompt: {error}")))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .build()
            .map_err(|error| LektorError::Validation(format!("Invalid chat request: {error}")))
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LektorError::Chat("Chat response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(LektorError::Chat(
                "Chat response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn map_openai_error(&self, error: OpenAIError) -> LektorError {
        match error {
            OpenAIError::Reqwest(reqwest_error) if reqwest_error.is_timeout() => {
                LektorError::Chat(format!(
                    "Chat request timed out after {} seconds",
                    self.timeout_secs
                ))
            }
            OpenAIError::ApiError(api_error) => {
                LektorError::Chat(format!("Chat API error: {api_error}"))
            }
            other => LektorError::Chat(format!("Chat request failed: {other}")),
        }
    }
}
