use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

use crate::error::OcrError;
use crate::models::{EngineResult, Recognition};

use super::input::ImageInput;

/// One OCR backend: given an image, produce text with a confidence score.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Stable identifier used as the engine column in exports.
    fn name(&self) -> &str;

    /// Engine-specific recognition. Confidence must already be normalized.
    async fn recognize(&self, image: &ImageInput) -> Result<Recognition, OcrError>;

    /// Runs the engine on an image path and always yields a result.
    ///
    /// Loading and recognition errors are recorded as a failed result with
    /// zero confidence instead of being returned.
    async fn run(&self, image_path: &Path) -> EngineResult {
        let started = Instant::now();
        match ImageInput::load(image_path).await {
            Ok(image) => self.run_on(&image).await,
            Err(e) => {
                error!(engine = self.name(), error = %e, "Failed to load image");
                EngineResult::failure(self.name(), e.to_string(), started.elapsed())
            }
        }
    }

    /// Same as [`run`](OcrEngine::run) for an image that is already loaded.
    async fn run_on(&self, image: &ImageInput) -> EngineResult {
        let started = Instant::now();
        info!(engine = self.name(), image = %image.path().display(), "Running OCR engine");

        match self.recognize(image).await {
            Ok(recognition) => {
                info!(
                    engine = self.name(),
                    confidence = recognition.confidence,
                    detections = recognition.detections,
                    "OCR engine succeeded"
                );
                EngineResult::success(self.name(), recognition, started.elapsed())
            }
            Err(e) => {
                error!(engine = self.name(), error = %e, "OCR engine failed");
                EngineResult::failure(self.name(), e.to_string(), started.elapsed())
            }
        }
    }
}

/// Stand-in for an engine that could not be constructed.
///
/// Keeps the engine in the run so its failure is reported rather than
/// silently dropped.
pub struct UnavailableEngine {
    name: String,
    reason: String,
}

impl UnavailableEngine {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for UnavailableEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn recognize(&self, _image: &ImageInput) -> Result<Recognition, OcrError> {
        Err(OcrError::EngineUnavailable(self.reason.clone()))
    }
}
