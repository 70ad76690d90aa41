use chrono::Local;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::config::OcrConfig;
use crate::models::{ComparisonRun, EngineResult};
use crate::ocr::{build_engines, ImageInput, SharedEngine};

/// Runs a fixed list of OCR engines against one image.
pub struct OcrComparator {
    engines: Vec<SharedEngine>,
}

impl OcrComparator {
    pub fn new(engines: Vec<SharedEngine>) -> Self {
        Self { engines }
    }

    /// Cloud, neural and Tesseract engines configured from `config`.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(build_engines(config))
    }

    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Invokes every engine in order on an image loaded once. An engine
    /// failing never stops the ones after it, so the run always holds one
    /// result per engine. An image that cannot be loaded fails all of them
    /// with the same reason.
    pub async fn run(&self, image_path: &Path) -> ComparisonRun {
        let mut run = ComparisonRun::new(image_path, Local::now());
        info!(
            image = %image_path.display(),
            engines = self.engines.len(),
            "Starting OCR comparison"
        );

        match ImageInput::load(image_path).await {
            Ok(image) => {
                for engine in &self.engines {
                    run.record(engine.run_on(&image).await);
                }
            }
            Err(e) => {
                error!(image = %image_path.display(), error = %e, "Failed to load image");
                let reason = e.to_string();
                for engine in &self.engines {
                    run.record(EngineResult::failure(engine.name(), &reason, Duration::ZERO));
                }
            }
        }

        info!(
            successful = run.successful().count(),
            total = run.results().len(),
            "OCR comparison finished"
        );
        run
    }
}
