use chrono::{DateTime, Local};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ExportError;
use crate::models::{ComparisonRun, EngineResult};

/// Maximum characters of extracted text kept in a CSV row.
pub const PREVIEW_CHARS: usize = 100;

const FILE_STEM: &str = "ocr_comparison";

/// `ocr_comparison_YYYYMMDD_HHMMSS.<extension>` inside `output_dir`.
pub fn default_export_path(output_dir: &Path, extension: &str, now: DateTime<Local>) -> PathBuf {
    output_dir.join(format!(
        "{FILE_STEM}_{}.{extension}",
        now.format("%Y%m%d_%H%M%S")
    ))
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    image_file: &'a str,
    ocr_model: &'a str,
    confidence_score: f64,
    status: String,
    extracted_text_preview: String,
    timestamp: &'a str,
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes one CSV row per engine result and returns the path written.
pub fn export_csv(run: &ComparisonRun, path: &Path) -> Result<PathBuf, ExportError> {
    if run.is_empty() {
        return Err(ExportError::NoResults);
    }
    ensure_parent(path)?;

    let image_file = run.image_file_name();
    let timestamp = Local::now().to_rfc3339();
    let mut writer = csv::Writer::from_path(path)?;

    for result in run.results() {
        writer.serialize(CsvRow {
            image_file: &image_file,
            ocr_model: result.engine_name(),
            confidence_score: result.confidence(),
            status: result.status().to_string(),
            extracted_text_preview: preview(result.extracted_text()),
            timestamp: &timestamp,
        })?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = run.results().len(), "Exported CSV results");
    Ok(path.to_path_buf())
}

#[derive(Serialize)]
struct JsonModel<'a> {
    confidence: f64,
    full_text: &'a str,
    status: String,
}

/// Engine results keyed by engine name, in run order.
struct Models<'a>(&'a [EngineResult]);

impl Serialize for Models<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for result in self.0 {
            map.serialize_entry(
                result.engine_name(),
                &JsonModel {
                    confidence: result.confidence(),
                    full_text: result.extracted_text(),
                    status: result.status().to_string(),
                },
            )?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    image_file: String,
    timestamp: String,
    models: Models<'a>,
}

/// Writes the full results as pretty-printed JSON and returns the path written.
///
/// The `timestamp` is when the run started; CSV rows carry the export time.
pub fn export_json(run: &ComparisonRun, path: &Path) -> Result<PathBuf, ExportError> {
    if run.is_empty() {
        return Err(ExportError::NoResults);
    }
    ensure_parent(path)?;

    let report = JsonReport {
        image_file: run.image_path().display().to_string(),
        timestamp: run.started_at().to_rfc3339(),
        models: Models(run.results()),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!(path = %path.display(), "Exported JSON results");
    Ok(path.to_path_buf())
}
