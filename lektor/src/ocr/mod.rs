//! OCR (Optical Character Recognition) Module
//!
//! Drives a local Tesseract executable against uploaded images. Recognition
//! runs once per configured page-segmentation mode and the best transcription
//! is chosen by a confidence score (see [`scorer`]).
//!
//! # Architecture
//!
//! - [`TesseractEngine`] invokes the `tesseract` binary as a subprocess,
//!   requesting TSV output to obtain word tokens with per-token confidences.
//! - [`preprocess_image`] normalizes an upload (grayscale, upscale, denoise,
//!   contrast) before recognition.
//! - [`select_best_candidate`] runs the engine under every configured
//!   segmentation mode and keeps the highest-scoring transcription.
//!
//! Engine availability is probed once at startup and recorded in a shared
//! atomic flag. Requests that carry an image re-probe when the flag is down,
//! so installing Tesseract does not require a process restart.

mod engine;
mod preprocessing;
mod scorer;

pub use engine::{OcrEngine, TesseractEngine};
pub use preprocessing::preprocess_image;
pub use scorer::{select_best_candidate, BestResult, RecognitionAttempt};

use crate::config::OcrConfig;
use crate::error::{LektorError, Result};

/// Preprocess an upload and pick the best transcription across the
/// configured segmentation modes.
///
/// Re-probes the engine first when it was last seen down, so a freshly
/// installed Tesseract is picked up without a restart. Preprocessing is
/// CPU-bound and runs on the blocking pool.
pub async fn recognize_best(
    engine: &TesseractEngine,
    config: &OcrConfig,
    image_bytes: &[u8],
) -> Result<BestResult> {
    engine.ensure_available().await?;

    let bytes = image_bytes.to_vec();
    let ocr_config = config.clone();
    let preprocessed = tokio::task::spawn_blocking(move || preprocess_image(&bytes, &ocr_config))
        .await
        .map_err(|e| LektorError::Internal(format!("Preprocessing task panicked: {e}")))??;

    select_best_candidate(engine, &preprocessed, &config.psms).await
}
