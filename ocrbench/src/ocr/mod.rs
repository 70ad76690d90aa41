//! OCR engine adapters.
//!
//! Each backend implements [`OcrEngine`]; `run` on any engine always yields
//! an [`EngineResult`](crate::models::EngineResult), recording failures
//! instead of returning them.
//!
//! - `cloud`: Vision `images:annotate` over HTTP
//! - `neural`: PaddleOCR-json style executable
//! - `tesseract`: Tesseract CLI with TSV output

mod cloud;
mod engine;
mod input;
mod neural;
mod provider;
mod tesseract;

pub use cloud::{CloudVisionEngine, CLOUD_VISION_ENGINE};
pub use engine::{OcrEngine, UnavailableEngine};
pub use input::ImageInput;
pub use neural::{parse_output as parse_neural_output, NeuralOcrEngine, NEURAL_ENGINE};
pub use provider::{build_engine, build_engines, EngineKind, SharedEngine};
pub use tesseract::{
    parse_tsv_words, recognition_from_words, TesseractEngine, TsvWord, TESSERACT_ENGINE,
};
