mod chat;
mod diag;
mod ocr;
mod pipeline;
mod speech;

pub use chat::{agent, chat};
pub use diag::{diag, home};
pub use ocr::ocr;
pub use pipeline::agent_ocr_tts;
pub use speech::agent_tts;

/// Lenient boolean parsing for multipart form values.
pub(crate) fn parse_form_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
