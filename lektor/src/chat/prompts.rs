//! System prompts for the tutor assistant.

/// English-tutor prompt used for `/chat` and for requests with an `en*`
/// language tag.
pub const ENGLISH_TUTOR_PROMPT: &str = "You are an English-language tutor for Polish speakers. \
Your primary responses should be in clear, simple English suitable for a learner. \
After replying in English, if the user's input contains mistakes, provide a short correction: \
show the corrected sentence and a brief explanation in Polish. \
Offer a short follow-up question to continue the conversation. \
If the user asks about pronunciation, give a phonetic hint (IPA or simple phonetics). \
Keep answers concise (2-4 sentences) unless the user requests more.";

/// Shorter tutor prompt used when recognized image text is forwarded
/// straight to the assistant.
pub const ENGLISH_TUTOR_CONCISE_PROMPT: &str =
    "You are an English-language tutor for Polish speakers. Respond concisely.";

/// Default assistant prompt for requests without an English language tag.
pub const POLISH_ASSISTANT_PROMPT: &str =
    "Jesteś pomocnym asystentem, odpowiadaj po polsku.";

/// Select the system prompt for a request-supplied language tag.
///
/// Tags starting with `en` (e.g. `en`, `en-US`) get the tutor prompt;
/// anything else, including a missing tag, gets the Polish assistant.
pub fn system_prompt_for_lang(lang: Option<&str>) -> &'static str {
    match lang {
        Some(tag) if tag.starts_with("en") => ENGLISH_TUTOR_PROMPT,
        _ => POLISH_ASSISTANT_PROMPT,
    }
}
