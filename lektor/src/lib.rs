//! Lektor: a language-tutor backend proxying chat, text-to-speech and OCR
//! to external services.
//!
//! The only in-process algorithm is the OCR best-candidate selector in
//! [`ocr`]; everything else is request validation and pass-through to
//! upstream APIs or the local Tesseract engine.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod ocr;
pub mod tts;
