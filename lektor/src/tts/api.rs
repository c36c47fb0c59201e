use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::TtsConfig;
use crate::error::{LektorError, Result};

#[derive(Clone, Debug)]
pub struct TtsClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    voice: String,
    format: String,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

impl TtsClient {
    pub fn new(config: &TtsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LektorError::Tts("API key required for speech synthesis".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LektorError::Tts(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            voice: config.voice.clone(),
            format: config.format.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Synthesize `text` and return the raw audio bytes (mp3 by default).
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(LektorError::Validation(
                "Text for speech synthesis cannot be empty".to_string(),
            ));
        }

        let request = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: &self.format,
        };

        let url = format!("{}/audio/speech", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LektorError::Tts(format!(
                        "Speech synthesis timed out after {} seconds",
                        self.timeout_secs
                    ))
                } else {
                    LektorError::Tts(format!("Speech request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(LektorError::Tts(format!(
                "Speech API returned {status}: {detail}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LektorError::Tts(format!("Failed to read audio stream: {e}")))?;

        Ok(bytes.to_vec())
    }

    /// MIME type of the audio this client produces.
    pub fn content_type(&self) -> &'static str {
        match self.format.as_str() {
            "opus" => "audio/ogg",
            "aac" => "audio/aac",
            "flac" => "audio/flac",
            "wav" => "audio/wav",
            _ => "audio/mpeg",
        }
    }
}
