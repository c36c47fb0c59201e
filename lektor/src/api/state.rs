use std::sync::Arc;

use crate::chat::ChatClient;
use crate::config::Config;
use crate::ocr::TesseractEngine;
use crate::tts::TtsClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: ChatClient,
    /// Absent when no API key is configured; TTS endpoints report the
    /// missing key as an upstream error instead of refusing to start.
    pub tts: Option<TtsClient>,
    pub ocr: Arc<TesseractEngine>,
}

impl AppState {
    pub fn new(
        config: Config,
        chat: ChatClient,
        tts: Option<TtsClient>,
        ocr: Arc<TesseractEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            chat,
            tts,
            ocr,
        }
    }
}
