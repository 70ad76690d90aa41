//! Side-by-side comparison of the OCR engines on a single image.

mod comparator;
mod export;
mod summary;

pub use comparator::OcrComparator;
pub use export::{default_export_path, export_csv, export_json, PREVIEW_CHARS};
pub use summary::{log_summary, summarize, RunSummary};
