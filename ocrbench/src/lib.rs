//! Runs several OCR engines over the same image and compares how confident
//! each one is in its result.

pub mod api;
pub mod auth;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ocr;

pub use error::{OcrBenchError, Result};
