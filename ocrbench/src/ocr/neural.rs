//! Local neural OCR through a PaddleOCR-json style executable.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::NeuralOcrConfig;
use crate::error::OcrError;
use crate::models::{ConfidenceScale, Recognition};

use super::engine::OcrEngine;
use super::input::ImageInput;

pub const NEURAL_ENGINE: &str = "PaddleOCR";

const CODE_OK: i64 = 100;
const CODE_NO_TEXT: i64 = 101;

#[derive(Debug, Deserialize)]
struct NeuralOutput {
    code: i64,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct Detection {
    text: String,
    score: f64,
    #[serde(rename = "box", default)]
    _bounds: Vec<[f64; 2]>,
}

pub struct NeuralOcrEngine {
    config: NeuralOcrConfig,
}

impl NeuralOcrEngine {
    pub fn new(config: &NeuralOcrConfig) -> Self {
        info!(
            executable = %config.executable.display(),
            languages = ?config.languages,
            gpu = config.gpu,
            "Initialized neural OCR engine"
        );
        Self {
            config: config.clone(),
        }
    }

    fn command(&self, image: &ImageInput) -> Command {
        let mut cmd = Command::new(&self.config.executable);
        cmd.arg(format!("--image_path={}", image.path().display()))
            .arg(format!("--lang={}", self.config.languages.join(",")))
            .arg(format!("--use_gpu={}", self.config.gpu))
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl OcrEngine for NeuralOcrEngine {
    fn name(&self) -> &str {
        NEURAL_ENGINE
    }

    async fn recognize(&self, image: &ImageInput) -> Result<Recognition, OcrError> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(timeout, self.command(image).output())
            .await
            .map_err(|_| OcrError::Timeout(self.config.timeout_secs))?
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                    "neural OCR executable not found at '{}'",
                    self.config.executable.display()
                )),
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "neural OCR exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses the executable's stdout.
///
/// The executable may print banner lines before its result, so the last line
/// that starts with `{` is taken as the JSON payload.
pub fn parse_output(stdout: &str) -> Result<Recognition, OcrError> {
    let payload = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with('{'))
        .ok_or_else(|| {
            OcrError::DecodeFailure("no JSON result in neural OCR output".to_string())
        })?;

    let output: NeuralOutput = serde_json::from_str(payload)
        .map_err(|e| OcrError::DecodeFailure(format!("malformed neural OCR JSON: {e}")))?;

    match output.code {
        CODE_OK => {
            let detections: Vec<Detection> = serde_json::from_value(output.data).map_err(|e| {
                OcrError::DecodeFailure(format!("unexpected neural OCR detections: {e}"))
            })?;
            debug!(regions = detections.len(), "Parsed neural OCR detections");

            let text = detections
                .iter()
                .map(|d| d.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let scores: Vec<f64> = detections.iter().map(|d| d.score).collect();
            Ok(Recognition::from_scores(text, &scores, ConfidenceScale::Unit))
        }
        CODE_NO_TEXT => Ok(Recognition::empty()),
        code => {
            let detail = output.data.as_str().unwrap_or_default();
            Err(OcrError::DecodeFailure(format!(
                "neural OCR returned code {code}: {detail}"
            )))
        }
    }
}
