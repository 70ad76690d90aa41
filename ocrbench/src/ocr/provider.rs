use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use tracing::{info, warn};

use crate::config::OcrConfig;

use super::cloud::{CloudVisionEngine, CLOUD_VISION_ENGINE};
use super::engine::{OcrEngine, UnavailableEngine};
use super::neural::{NeuralOcrEngine, NEURAL_ENGINE};
use super::tesseract::{TesseractEngine, TESSERACT_ENGINE};

pub type SharedEngine = Arc<dyn OcrEngine>;

/// The OCR backends a comparison runs, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum EngineKind {
    Cloud,
    Neural,
    Tesseract,
}

impl EngineKind {
    pub const ALL: [EngineKind; 3] = [EngineKind::Cloud, EngineKind::Neural, EngineKind::Tesseract];

    /// Name recorded in results and exports.
    pub fn engine_name(self) -> &'static str {
        match self {
            EngineKind::Cloud => CLOUD_VISION_ENGINE,
            EngineKind::Neural => NEURAL_ENGINE,
            EngineKind::Tesseract => TESSERACT_ENGINE,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine_name())
    }
}

/// Builds one engine. Construction problems such as missing credentials
/// yield an engine whose every run fails with the reason.
pub fn build_engine(kind: EngineKind, config: &OcrConfig) -> SharedEngine {
    match kind {
        EngineKind::Cloud => match CloudVisionEngine::new(&config.cloud) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                let reason = format!("Cloud Vision backend unavailable: {e}");
                warn!("{}", reason);
                Arc::new(UnavailableEngine::new(kind.engine_name(), reason))
            }
        },
        EngineKind::Neural => Arc::new(NeuralOcrEngine::new(&config.neural)),
        EngineKind::Tesseract => Arc::new(TesseractEngine::new(&config.tesseract)),
    }
}

/// Builds every engine in run order.
pub fn build_engines(config: &OcrConfig) -> Vec<SharedEngine> {
    let engines: Vec<SharedEngine> = EngineKind::ALL
        .iter()
        .map(|kind| build_engine(*kind, config))
        .collect();
    info!(count = engines.len(), "OCR engines ready");
    engines
}
