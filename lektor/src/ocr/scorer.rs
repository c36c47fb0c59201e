use tracing::debug;

use super::engine::OcrEngine;
use crate::error::Result;

/// Output of one recognition run under a single segmentation mode.
#[derive(Debug, Clone)]
pub struct RecognitionAttempt {
    pub psm: u8,
    /// Ordered word tokens.
    pub words: Vec<String>,
    /// Per-token confidences in [-1, 100]; -1 means the engine reported none.
    pub confidences: Vec<f32>,
}

impl RecognitionAttempt {
    fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// The winning transcription for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct BestResult {
    pub text: String,
    /// Segmentation mode that produced the text; `None` when the plain
    /// fallback path was taken.
    pub psm: Option<u8>,
    pub score: f32,
}

/// Confidence score of a candidate transcription.
///
/// Mean of the reported confidences (tokens with -1 excluded; 0 when none
/// are reported) plus a length bonus of one point per 100 characters. The
/// bonus deliberately favors longer transcriptions when confidence ties.
fn score_candidate(text: &str, confidences: &[f32]) -> f32 {
    let reported: Vec<f32> = confidences.iter().copied().filter(|&c| c != -1.0).collect();
    let avg = if reported.is_empty() {
        0.0
    } else {
        reported.iter().sum::<f32>() / reported.len() as f32
    };
    avg + text.chars().count() as f32 / 100.0
}

/// Run recognition under each segmentation mode in order and keep the
/// highest-scoring transcription.
///
/// Per-mode engine failures are skipped, not fatal. When no mode yields a
/// non-empty transcription, one plain recognition call is made with the
/// engine default and its result is accepted as-is, even if empty.
pub async fn select_best_candidate(
    engine: &dyn OcrEngine,
    image: &[u8],
    psms: &[u8],
) -> Result<BestResult> {
    let mut best: Option<BestResult> = None;

    for &psm in psms {
        let attempt = match engine.recognize_with_data(image, psm).await {
            Ok(attempt) => attempt,
            Err(e) => {
                debug!(psm, error = %e, "Recognition attempt failed, skipping mode");
                continue;
            }
        };

        let text = attempt.text();
        let score = score_candidate(&text, &attempt.confidences);
        debug!(psm, score, chars = text.chars().count(), "Scored candidate");

        let is_better = best.as_ref().map_or(true, |b| score > b.score);
        if is_better {
            best = Some(BestResult {
                text,
                psm: Some(psm),
                score,
            });
        }
    }

    match best {
        Some(result) if !result.text.trim().is_empty() => Ok(result),
        _ => {
            debug!("No segmentation mode produced text, falling back to plain recognition");
            let text = engine.recognize_plain(image).await?;
            let score = score_candidate(&text, &[]);
            Ok(BestResult {
                text,
                psm: None,
                score,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::LektorError;

    /// Scripted engine: fixed attempt per mode, counted plain fallback.
    struct ScriptedEngine {
        attempts: HashMap<u8, (Vec<&'static str>, Vec<f32>)>,
        failing_psms: Vec<u8>,
        plain_text: &'static str,
        plain_calls: AtomicUsize,
    }

    impl ScriptedEngine {
        fn new() -> Self {
            Self {
                attempts: HashMap::new(),
                failing_psms: Vec::new(),
                plain_text: "",
                plain_calls: AtomicUsize::new(0),
            }
        }

        fn with_attempt(mut self, psm: u8, words: Vec<&'static str>, confs: Vec<f32>) -> Self {
            self.attempts.insert(psm, (words, confs));
            self
        }

        fn with_failure(mut self, psm: u8) -> Self {
            self.failing_psms.push(psm);
            self
        }

        fn with_plain(mut self, text: &'static str) -> Self {
            self.plain_text = text;
            self
        }
    }

    #[async_trait]
    impl OcrEngine for ScriptedEngine {
        async fn recognize_with_data(&self, _image: &[u8], psm: u8) -> Result<RecognitionAttempt> {
            if self.failing_psms.contains(&psm) {
                return Err(LektorError::Ocr(format!("mode {psm} failed")));
            }
            let (words, confidences) = self
                .attempts
                .get(&psm)
                .cloned()
                .unwrap_or((Vec::new(), Vec::new()));
            Ok(RecognitionAttempt {
                psm,
                words: words.into_iter().map(String::from).collect(),
                confidences,
            })
        }

        async fn recognize_plain(&self, _image: &[u8]) -> Result<String> {
            self.plain_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.plain_text.to_string())
        }
    }

    #[tokio::test]
    async fn identical_text_picks_highest_confidence_mode() {
        let engine = ScriptedEngine::new()
            .with_attempt(7, vec!["CAT"], vec![90.0])
            .with_attempt(6, vec!["CAT"], vec![85.0])
            .with_attempt(11, vec!["CAT"], vec![40.0])
            .with_attempt(3, vec!["CAT"], vec![95.0]);

        let best = select_best_candidate(&engine, &[], &[7, 6, 11, 3])
            .await
            .unwrap();
        assert_eq!(best.psm, Some(3));
        assert_eq!(best.text, "CAT");
    }

    #[tokio::test]
    async fn equal_confidence_favors_longer_transcription() {
        let engine = ScriptedEngine::new()
            .with_attempt(7, vec!["short"], vec![80.0])
            .with_attempt(6, vec!["a", "longer", "transcription"], vec![80.0, 80.0, 80.0]);

        let best = select_best_candidate(&engine, &[], &[7, 6]).await.unwrap();
        assert_eq!(best.psm, Some(6));

        let short = score_candidate("short", &[80.0]);
        let long = score_candidate("a longer transcription", &[80.0, 80.0, 80.0]);
        assert!(long > short);
    }

    #[tokio::test]
    async fn failing_modes_are_skipped() {
        let engine = ScriptedEngine::new()
            .with_failure(7)
            .with_attempt(6, vec!["recovered"], vec![70.0]);

        let best = select_best_candidate(&engine, &[], &[7, 6]).await.unwrap();
        assert_eq!(best.psm, Some(6));
        assert_eq!(best.text, "recovered");
    }

    #[tokio::test]
    async fn all_modes_empty_invokes_plain_fallback_once() {
        let engine = ScriptedEngine::new()
            .with_attempt(7, vec![], vec![])
            .with_attempt(6, vec![], vec![])
            .with_plain("fallback text");

        let best = select_best_candidate(&engine, &[], &[7, 6]).await.unwrap();
        assert_eq!(best.psm, None);
        assert_eq!(best.text, "fallback text");
        assert_eq!(engine.plain_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_modes_fail_and_empty_fallback_still_succeeds() {
        let engine = ScriptedEngine::new().with_failure(7).with_failure(6);

        let best = select_best_candidate(&engine, &[], &[7, 6]).await.unwrap();
        assert_eq!(best.psm, None);
        assert_eq!(best.text, "");
        assert_eq!(engine.plain_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_maximum_wins_on_exact_tie() {
        let engine = ScriptedEngine::new()
            .with_attempt(7, vec!["same"], vec![90.0])
            .with_attempt(6, vec!["same"], vec![90.0]);

        let best = select_best_candidate(&engine, &[], &[7, 6]).await.unwrap();
        assert_eq!(best.psm, Some(7));
    }

    #[tokio::test]
    async fn selection_is_deterministic() {
        let engine = ScriptedEngine::new()
            .with_attempt(7, vec!["alpha"], vec![60.0])
            .with_attempt(6, vec!["beta", "gamma"], vec![55.0, 65.0])
            .with_attempt(3, vec!["delta"], vec![59.0]);

        let first = select_best_candidate(&engine, &[], &[7, 6, 3]).await.unwrap();
        let second = select_best_candidate(&engine, &[], &[7, 6, 3]).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreported_confidences_are_excluded_from_the_average() {
        let with_gap = score_candidate("ab cd", &[90.0, -1.0]);
        let without_gap = score_candidate("ab cd", &[90.0]);
        assert_eq!(with_gap, without_gap);
    }

    #[test]
    fn all_unreported_scores_on_length_alone() {
        let score = score_candidate("twelve chars", &[-1.0, -1.0]);
        assert!((score - 0.12).abs() < f32::EPSILON);
    }
}
