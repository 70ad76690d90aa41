//! Classical OCR through the Tesseract command line binary.
//!
//! Tesseract is run with TSV output so every word comes back with its own
//! 0-100 confidence. The average over words is rescaled to 0-1.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::TesseractConfig;
use crate::error::OcrError;
use crate::models::{ConfidenceScale, Recognition};

use super::engine::OcrEngine;
use super::input::ImageInput;

pub const TESSERACT_ENGINE: &str = "Tesseract";

/// TSV row level for individual words.
const WORD_LEVEL: i32 = 5;

/// A single word from Tesseract's TSV output.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvWord {
    pub block_num: i32,
    pub line_num: i32,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Native 0-100 confidence.
    pub confidence: f64,
    pub text: String,
}

pub struct TesseractEngine {
    config: TesseractConfig,
}

impl TesseractEngine {
    pub fn new(config: &TesseractConfig) -> Self {
        info!(
            lang = %config.lang,
            psm = config.psm,
            "Initialized Tesseract engine"
        );
        Self {
            config: config.clone(),
        }
    }

    fn command(&self, image: &ImageInput) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.arg(image.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.lang)
            .arg("--psm")
            .arg(self.config.psm.to_string());
        if let Some(dir) = &self.config.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.arg("tsv").kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        TESSERACT_ENGINE
    }

    async fn recognize(&self, image: &ImageInput) -> Result<Recognition, OcrError> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::time::timeout(timeout, self.command(image).output())
            .await
            .map_err(|_| OcrError::Timeout(self.config.timeout_secs))?
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::EngineUnavailable(format!(
                    "Tesseract not found at '{}'. Ensure it's installed and in PATH.",
                    self.config.binary.display()
                )),
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "Tesseract failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let words = parse_tsv_words(&tsv, self.config.min_confidence);
        if words.is_empty() {
            warn!("No text detected with confidence above threshold");
            return Ok(Recognition::empty());
        }
        debug!(words = words.len(), "Parsed Tesseract TSV output");

        Ok(recognition_from_words(&words))
    }
}

/// Parses Tesseract TSV output into words.
///
/// Keeps word-level rows with non-empty text and a confidence that is both
/// valid (not -1) and at least `min_confidence`.
pub fn parse_tsv_words(tsv: &str, min_confidence: f64) -> Vec<TsvWord> {
    let mut words = Vec::new();

    // TSV fields: level, page_num, block_num, par_num, line_num, word_num,
    //             left, top, width, height, conf, text
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        if level != WORD_LEVEL {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let confidence: f64 = fields[10].trim().parse().unwrap_or(-1.0);
        if confidence < 0.0 || confidence < min_confidence {
            continue;
        }

        words.push(TsvWord {
            block_num: fields[2].parse().unwrap_or(0),
            line_num: fields[4].parse().unwrap_or(0),
            left: fields[6].parse().unwrap_or(0),
            top: fields[7].parse().unwrap_or(0),
            width: fields[8].parse().unwrap_or(0),
            height: fields[9].parse().unwrap_or(0),
            confidence,
            text: text.to_string(),
        });
    }

    words
}

pub fn recognition_from_words(words: &[TsvWord]) -> Recognition {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let scores: Vec<f64> = words.iter().map(|w| w.confidence).collect();
    Recognition::from_scores(text, &scores, ConfidenceScale::Percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t
2\t1\t1\t0\t0\t0\t36\t92\t582\t92\t-1\t
4\t1\t1\t1\t1\t0\t36\t92\t582\t30\t-1\t
5\t1\t1\t1\t1\t1\t36\t92\t60\t30\t96.5\tHello
5\t1\t1\t1\t1\t2\t104\t92\t80\t30\t91.5\tworld
5\t1\t1\t1\t2\t1\t36\t130\t20\t30\t-1\t
5\t1\t1\t1\t2\t2\t60\t130\t70\t30\t40\tsmudge
";

    fn test_config() -> TesseractConfig {
        TesseractConfig {
            binary: PathBuf::from("/nonexistent/ocrbench/tesseract"),
            lang: "eng".to_string(),
            psm: 3,
            tessdata_dir: None,
            min_confidence: 0.0,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_parse_skips_non_word_rows_and_invalid_confidence() {
        let words = parse_tsv_words(SAMPLE_TSV, 0.0);
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "world", "smudge"]);
        assert_eq!(words[0].left, 36);
        assert_eq!(words[2].line_num, 2);
    }

    #[test]
    fn test_parse_applies_min_confidence() {
        let words = parse_tsv_words(SAMPLE_TSV, 60.0);
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.confidence >= 60.0));
    }

    #[test]
    fn test_recognition_is_normalized_to_unit_scale() {
        let words = parse_tsv_words(SAMPLE_TSV, 60.0);
        let recognition = recognition_from_words(&words);
        assert_eq!(recognition.text, "Hello world");
        assert!((recognition.confidence - 0.94).abs() < 1e-9);
        assert_eq!(recognition.detections, 2);
    }

    #[test]
    fn test_header_only_output_has_no_words() {
        let header = SAMPLE_TSV.lines().next().unwrap();
        assert!(parse_tsv_words(header, 0.0).is_empty());
        assert_eq!(recognition_from_words(&[]).confidence, 0.0);
    }

    #[test]
    fn test_command_includes_language_and_psm() {
        let mut config = test_config();
        config.psm = 6;
        config.tessdata_dir = Some(PathBuf::from("/opt/tessdata"));
        let engine = TesseractEngine::new(&config);
        let image = ImageInput::from_bytes(
            std::path::Path::new("page.png"),
            {
                let mut bytes = Vec::new();
                image::DynamicImage::ImageLuma8(image::GrayImage::new(8, 8))
                    .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
                    .unwrap();
                bytes
            },
        )
        .unwrap();

        let cmd = engine.command(&image);
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["page.png", "stdout", "-l", "eng", "--psm", "6", "--tessdata-dir", "/opt/tessdata", "tsv"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let engine = TesseractEngine::new(&test_config());
        let mut bytes = Vec::new();
        image::DynamicImage::ImageLuma8(image::GrayImage::new(8, 8))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let image = ImageInput::from_bytes(std::path::Path::new("page.png"), bytes).unwrap();

        let result = engine.recognize(&image).await;
        assert!(matches!(result, Err(OcrError::EngineUnavailable(_))));
    }
}
