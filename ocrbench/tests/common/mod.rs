// Shared helpers for the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use ocrbench::error::OcrError;
use ocrbench::models::{ConfidenceScale, Recognition};
use ocrbench::ocr::{ImageInput, OcrEngine};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Writes a small striped PNG into `dir` and returns its path.
pub fn write_png(dir: &Path, name: &str) -> PathBuf {
    let img = GrayImage::from_fn(32, 16, |x, _| if x % 4 < 2 { Luma([0]) } else { Luma([255]) });
    let path = dir.join(name);
    DynamicImage::ImageLuma8(img)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap_or_else(|e| panic!("Failed to write PNG fixture '{name}': {e}"));
    path
}

/// Writes a file with an image extension but no decodable content.
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"definitely not an image").expect("Failed to write corrupt fixture");
    path
}

/// Engine that always recognizes the same text with fixed unit-scale scores.
pub struct FixedEngine {
    name: &'static str,
    text: &'static str,
    scores: Vec<f64>,
}

impl FixedEngine {
    pub fn new(name: &'static str, text: &'static str, scores: &[f64]) -> Self {
        Self {
            name,
            text,
            scores: scores.to_vec(),
        }
    }
}

#[async_trait]
impl OcrEngine for FixedEngine {
    fn name(&self) -> &str {
        self.name
    }

    async fn recognize(&self, _image: &ImageInput) -> Result<Recognition, OcrError> {
        Ok(Recognition::from_scores(
            self.text,
            &self.scores,
            ConfidenceScale::Unit,
        ))
    }
}

/// Engine whose recognition step always reports an error.
pub struct FailingEngine {
    name: &'static str,
    reason: &'static str,
}

impl FailingEngine {
    pub fn new(name: &'static str, reason: &'static str) -> Self {
        Self { name, reason }
    }
}

#[async_trait]
impl OcrEngine for FailingEngine {
    fn name(&self) -> &str {
        self.name
    }

    async fn recognize(&self, _image: &ImageInput) -> Result<Recognition, OcrError> {
        Err(OcrError::EngineUnavailable(self.reason.to_string()))
    }
}
