//! Chat-completion proxy.
//!
//! Thin client over an OpenAI-compatible `/chat/completions` endpoint. The
//! system prompt is picked per request language (English tutor for Polish
//! speakers, or a plain Polish assistant).

mod api;
pub mod prompts;

pub use api::ChatClient;
