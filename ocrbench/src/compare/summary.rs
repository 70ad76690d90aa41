use serde::Serialize;
use tracing::{info, warn};

use crate::models::ComparisonRun;

/// Aggregate statistics over the successful engines of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunSummary {
    NoSuccessfulEngine,
    Successful {
        average_confidence: f64,
        best_engine: String,
        best_confidence: f64,
        successful: usize,
    },
}

/// Average and best confidence over successful results only.
///
/// Ties for best go to the engine that ran first.
pub fn summarize(run: &ComparisonRun) -> RunSummary {
    let mut count = 0usize;
    let mut total = 0.0;
    let mut best: Option<(&str, f64)> = None;

    for result in run.successful() {
        count += 1;
        total += result.confidence();
        match best {
            Some((_, conf)) if result.confidence() <= conf => {}
            _ => best = Some((result.engine_name(), result.confidence())),
        }
    }

    match best {
        None => RunSummary::NoSuccessfulEngine,
        Some((name, conf)) => RunSummary::Successful {
            average_confidence: total / count as f64,
            best_engine: name.to_string(),
            best_confidence: conf,
            successful: count,
        },
    }
}

/// Logs one line per engine followed by the aggregate.
pub fn log_summary(run: &ComparisonRun, summary: &RunSummary) {
    info!(image = %run.image_path().display(), "OCR comparison summary");
    for result in run.results() {
        let preview: String = result.extracted_text().chars().take(50).collect();
        info!(
            engine = result.engine_name(),
            confidence = format_args!("{:.4}", result.confidence()),
            status = %result.status(),
            elapsed_ms = result.elapsed().as_millis() as u64,
            text = %preview,
            "Engine result"
        );
    }

    match summary {
        RunSummary::NoSuccessfulEngine => warn!("No OCR engine succeeded"),
        RunSummary::Successful {
            average_confidence,
            best_engine,
            best_confidence,
            successful,
        } => info!(
            average_confidence = format_args!("{average_confidence:.4}"),
            best_engine = %best_engine,
            best_confidence = format_args!("{best_confidence:.4}"),
            successful,
            total = run.results().len(),
            "Best performing engine: {best_engine}"
        ),
    }
}
