use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::scorer::RecognitionAttempt;
use crate::config::OcrConfig;
use crate::error::{LektorError, Result};

/// Recognition backend used by the candidate scorer.
///
/// Kept as a trait so the scorer can be exercised against a scripted engine
/// in tests.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize under one segmentation mode, returning word tokens and
    /// per-token confidences.
    async fn recognize_with_data(&self, image: &[u8], psm: u8) -> Result<RecognitionAttempt>;

    /// Plain text recognition with the engine's default segmentation.
    async fn recognize_plain(&self, image: &[u8]) -> Result<String>;
}

/// Tesseract driven as a subprocess.
///
/// The executable (not a linked library) is the unit of availability: the
/// diagnostic surface reports the resolved command and its version, and a
/// down engine can come back after `apt install tesseract-ocr` without a
/// process restart.
pub struct TesseractEngine {
    command: String,
    languages: String,
    available: AtomicBool,
    version: RwLock<Option<String>>,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            languages: config.languages.clone(),
            available: AtomicBool::new(false),
            version: RwLock::new(None),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// Version string captured by the most recent successful probe.
    pub fn cached_version(&self) -> Option<String> {
        self.version.read().ok().and_then(|v| v.clone())
    }

    /// Run `tesseract --version` and record the result in the availability
    /// flag. Stores are idempotent, so concurrent probes are harmless.
    pub async fn probe(&self) -> Result<String> {
        let output = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                // Older tesseract builds print the version banner to stderr.
                let combined = format!(
                    "{}{}",
                    String::from_utf8_lossy(&out.stdout),
                    String::from_utf8_lossy(&out.stderr)
                );
                let version = combined
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .unwrap_or("unknown")
                    .to_string();

                self.available.store(true, Ordering::Relaxed);
                if let Ok(mut slot) = self.version.write() {
                    *slot = Some(version.clone());
                }
                info!(command = %self.command, %version, "Tesseract probe succeeded");
                Ok(version)
            }
            Ok(out) => {
                self.available.store(false, Ordering::Relaxed);
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                warn!(command = %self.command, %stderr, "Tesseract probe failed");
                Err(LektorError::OcrUnavailable(format!(
                    "'{} --version' exited with {}: {stderr}",
                    self.command, out.status
                )))
            }
            Err(e) => {
                self.available.store(false, Ordering::Relaxed);
                warn!(command = %self.command, error = %e, "Tesseract probe failed");
                Err(LektorError::OcrUnavailable(format!(
                    "Cannot execute '{}': {e}. Install tesseract-ocr or set TESSERACT_CMD.",
                    self.command
                )))
            }
        }
    }

    /// Re-probe when the engine was last seen down.
    pub async fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            return Ok(());
        }
        self.probe().await.map(|_| ())
    }

    async fn run(&self, image: &[u8], extra_args: &[String]) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.command)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .args(extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    self.available.store(false, Ordering::Relaxed);
                    LektorError::OcrUnavailable(format!(
                        "Cannot execute '{}': {e}. Install tesseract-ocr or set TESSERACT_CMD.",
                        self.command
                    ))
                } else {
                    LektorError::Ocr(format!("Failed to spawn '{}': {e}", self.command))
                }
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LektorError::Internal("Child process stdin not captured".to_string()))?;
        stdin.write_all(image).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(LektorError::Ocr(format!(
                "tesseract exited with {}: {stderr}",
                output.status
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize_with_data(&self, image: &[u8], psm: u8) -> Result<RecognitionAttempt> {
        let args = vec!["--psm".to_string(), psm.to_string(), "tsv".to_string()];
        let stdout = self.run(image, &args).await?;
        let tsv = String::from_utf8_lossy(&stdout);
        let (words, confidences) = parse_tsv(&tsv);
        debug!(psm, words = words.len(), "Recognition attempt complete");
        Ok(RecognitionAttempt {
            psm,
            words,
            confidences,
        })
    }

    async fn recognize_plain(&self, image: &[u8]) -> Result<String> {
        let stdout = self.run(image, &[]).await?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

/// Parse tesseract TSV output into word tokens and confidences.
///
/// Word entries sit at level 5; the `conf` column is `-1` when the engine
/// reports no confidence for a token. Column layout:
/// `level page_num block_num par_num line_num word_num left top width height conf text`
fn parse_tsv(tsv: &str) -> (Vec<String>, Vec<f32>) {
    let mut words = Vec::new();
    let mut confidences = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 || fields[0] != "5" {
            continue;
        }
        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }
        let conf = fields[10].parse::<f32>().unwrap_or(-1.0);
        words.push(text.to_string());
        confidences.push(conf);
    }

    (words, confidences)
}
