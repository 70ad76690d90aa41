use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Native scale an engine reports its confidence values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceScale {
    /// Already in `0.0..=1.0`.
    Unit,
    /// `0..=100`, as reported by Tesseract.
    Percent,
}

impl ConfidenceScale {
    /// Maps a native value onto `0.0..=1.0`.
    pub fn normalize(self, value: f64) -> f64 {
        let scaled = match self {
            ConfidenceScale::Unit => value,
            ConfidenceScale::Percent => value / 100.0,
        };
        if scaled.is_nan() {
            0.0
        } else {
            scaled.clamp(0.0, 1.0)
        }
    }
}

/// Text and aggregated confidence produced by one engine for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// Normalized to `0.0..=1.0`.
    pub confidence: f64,
    /// Number of tokens or regions averaged into `confidence`.
    pub detections: usize,
}

impl Recognition {
    /// Averages native per-token scores. No scores means no detections,
    /// which is a confidence of 0.0 rather than an error.
    pub fn from_scores(text: impl Into<String>, scores: &[f64], scale: ConfidenceScale) -> Self {
        let confidence = if scores.is_empty() {
            0.0
        } else {
            scale.normalize(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Self {
            text: text.into(),
            confidence,
            detections: scores.len(),
        }
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            detections: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Success,
    Failure(String),
}

impl EngineStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, EngineStatus::Success)
    }
}

/// Rendered as `success` or `error: <reason>` in both export formats.
impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Success => write!(f, "success"),
            EngineStatus::Failure(reason) => write!(f, "error: {reason}"),
        }
    }
}

impl FromStr for EngineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "success" {
            return Ok(EngineStatus::Success);
        }
        s.strip_prefix("error: ")
            .map(|reason| EngineStatus::Failure(reason.to_string()))
            .ok_or_else(|| format!("unknown engine status '{s}'"))
    }
}

/// Outcome of one engine on one image. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineResult {
    engine_name: String,
    confidence: f64,
    extracted_text: String,
    status: EngineStatus,
    detections: usize,
    elapsed: Duration,
}

impl EngineResult {
    pub fn success(engine_name: impl Into<String>, recognition: Recognition, elapsed: Duration) -> Self {
        Self {
            engine_name: engine_name.into(),
            confidence: ConfidenceScale::Unit.normalize(recognition.confidence),
            extracted_text: recognition.text,
            status: EngineStatus::Success,
            detections: recognition.detections,
            elapsed,
        }
    }

    pub fn failure(engine_name: impl Into<String>, reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            engine_name: engine_name.into(),
            confidence: 0.0,
            extracted_text: String::new(),
            status: EngineStatus::Failure(reason.into()),
            detections: 0,
            elapsed,
        }
    }

    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn detections(&self) -> usize {
        self.detections
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// All engine results for one image, in invocation order.
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    image_path: PathBuf,
    results: Vec<EngineResult>,
    started_at: DateTime<Local>,
}

impl ComparisonRun {
    pub fn new(image_path: impl Into<PathBuf>, started_at: DateTime<Local>) -> Self {
        Self {
            image_path: image_path.into(),
            results: Vec::new(),
            started_at,
        }
    }

    pub fn with_results(
        image_path: impl Into<PathBuf>,
        started_at: DateTime<Local>,
        results: Vec<EngineResult>,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            results,
            started_at,
        }
    }

    pub(crate) fn record(&mut self, result: EngineResult) {
        self.results.push(result);
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// File name of the input image, falling back to the full path.
    pub fn image_file_name(&self) -> String {
        self.image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_path.display().to_string())
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn results(&self) -> &[EngineResult] {
        &self.results
    }

    pub fn result(&self, engine_name: &str) -> Option<&EngineResult> {
        self.results.iter().find(|r| r.engine_name == engine_name)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successful(&self) -> impl Iterator<Item = &EngineResult> {
        self.results.iter().filter(|r| r.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_scale_is_divided_by_hundred() {
        assert_eq!(ConfidenceScale::Percent.normalize(87.5), 0.875);
        assert_eq!(ConfidenceScale::Unit.normalize(0.42), 0.42);
    }

    #[test]
    fn normalize_clamps_out_of_range_values() {
        assert_eq!(ConfidenceScale::Percent.normalize(130.0), 1.0);
        assert_eq!(ConfidenceScale::Unit.normalize(-0.3), 0.0);
        assert_eq!(ConfidenceScale::Unit.normalize(f64::NAN), 0.0);
    }

    #[test]
    fn recognition_without_scores_has_zero_confidence() {
        let recognition = Recognition::from_scores("", &[], ConfidenceScale::Percent);
        assert_eq!(recognition.confidence, 0.0);
        assert_eq!(recognition.detections, 0);
    }

    #[test]
    fn recognition_averages_scores() {
        let recognition = Recognition::from_scores("a b", &[90.0, 70.0], ConfidenceScale::Percent);
        assert!((recognition.confidence - 0.8).abs() < 1e-9);
        assert_eq!(recognition.detections, 2);
    }

    #[test]
    fn failure_has_zero_confidence_and_empty_text() {
        let result = EngineResult::failure("Tesseract", "binary missing", Duration::ZERO);
        assert_eq!(result.confidence(), 0.0);
        assert_eq!(result.extracted_text(), "");
        assert_eq!(
            result.status(),
            &EngineStatus::Failure("binary missing".to_string())
        );
    }

    #[test]
    fn status_display_and_parse_agree() {
        let failure = EngineStatus::Failure("engine unavailable: offline".to_string());
        assert_eq!(failure.to_string(), "error: engine unavailable: offline");
        assert_eq!(failure.to_string().parse::<EngineStatus>().unwrap(), failure);
        assert_eq!("success".parse::<EngineStatus>().unwrap(), EngineStatus::Success);
        assert!("pending".parse::<EngineStatus>().is_err());
    }

    #[test]
    fn image_file_name_strips_directories() {
        let run = ComparisonRun::new("images/menu/sample.jpg", Local::now());
        assert_eq!(run.image_file_name(), "sample.jpg");
    }
}
