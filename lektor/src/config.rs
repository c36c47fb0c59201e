use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse `OCR_PSMS`: comma-separated segmentation mode numbers, e.g. `7,6,11,3`.
/// Unparseable entries are skipped with a warning; an empty result falls back
/// to the built-in order.
fn parse_psm_list() -> Vec<u8> {
    const DEFAULT_PSMS: [u8; 4] = [7, 6, 11, 3];

    match env::var("OCR_PSMS") {
        Ok(val) if !val.is_empty() => {
            let psms: Vec<u8> = val
                .split(',')
                .filter_map(|entry| match entry.trim().parse::<u8>() {
                    Ok(psm) if psm <= 13 => Some(psm),
                    _ => {
                        tracing::warn!("Invalid segmentation mode '{}' in OCR_PSMS, skipping", entry);
                        None
                    }
                })
                .collect();
            if psms.is_empty() {
                DEFAULT_PSMS.to_vec()
            } else {
                psms
            }
        }
        _ => DEFAULT_PSMS.to_vec(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub tts: TtsConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Chat-completion upstream configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Speech-synthesis upstream configuration. Shares the chat API key unless
/// `TTS_API_KEY` is set explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    pub model: String,
    pub voice: String,
    pub format: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract executable to invoke; resolved through PATH when relative.
    pub command: String,
    pub languages: String,
    /// Segmentation modes to try, in order.
    pub psms: Vec<u8>,
    /// Images whose larger dimension is below this are upscaled 2x.
    pub upscale_threshold: u32,
    pub contrast_factor: f32,
}

impl Default for Config {
    fn default() -> Self {
        let api_key = env::var("OPENAI_API_KEY").ok();

        Self {
            server: ServerConfig {
                host: env::var("LEKTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("LEKTOR_PORT", 5000),
            },
            chat: ChatConfig {
                model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                api_key: api_key.clone(),
                base_url: env::var("CHAT_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                timeout_secs: parse_env_or("CHAT_TIMEOUT", 30),
            },
            tts: TtsConfig {
                model: env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
                voice: env::var("TTS_VOICE").unwrap_or_else(|_| "alloy".to_string()),
                format: env::var("TTS_FORMAT").unwrap_or_else(|_| "mp3".to_string()),
                api_key: env::var("TTS_API_KEY").ok().or(api_key),
                base_url: env::var("TTS_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                timeout_secs: parse_env_or("TTS_TIMEOUT", 30),
            },
            ocr: OcrConfig {
                command: env::var("TESSERACT_CMD").unwrap_or_else(|_| "tesseract".to_string()),
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng+pol".to_string()),
                psms: parse_psm_list(),
                upscale_threshold: parse_env_or("OCR_UPSCALE_THRESHOLD", 2000),
                contrast_factor: parse_env_or("OCR_CONTRAST_FACTOR", 1.5),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
