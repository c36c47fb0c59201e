//! Text-to-speech proxy.
//!
//! Sends synthesized-speech requests to an OpenAI-compatible `/audio/speech`
//! endpoint and hands the audio bytes back untouched.

mod api;

pub use api::TtsClient;
