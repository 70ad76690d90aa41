mod common;

use std::env;
use std::path::PathBuf;

use serial_test::serial;

use common::{init_test_logger, write_png};
use ocrbench::compare::{summarize, OcrComparator, RunSummary};
use ocrbench::config::Config;
use ocrbench::ocr::{CLOUD_VISION_ENGINE, NEURAL_ENGINE, TESSERACT_ENGINE};

const VARS: &[&str] = &[
    "OCRBENCH_PORT",
    "VISION_API_KEY",
    "VISION_ACCESS_TOKEN",
    "NEURAL_OCR_PATH",
    "NEURAL_OCR_LANGUAGES",
    "NEURAL_OCR_GPU",
    "TESSERACT_PATH",
    "TESSERACT_MIN_CONFIDENCE",
    "OCR_OUTPUT_DIR",
    "LOG_CONSOLE",
    "LOG_MAX_FILES",
    "AUTH_ISSUER_URL",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_without_environment() {
    clear_env();

    let config = Config::from_env();
    assert_eq!(config.server.port, 8000);
    assert!(config.ocr.cloud.api_key.is_none());
    assert_eq!(config.ocr.neural.languages, vec!["en"]);
    assert!(!config.ocr.neural.gpu);
    assert_eq!(config.ocr.tesseract.binary, PathBuf::from("tesseract"));
    assert_eq!(config.output.dir, PathBuf::from("ocr_results"));
    assert!(config.logging.console);
    assert_eq!(config.logging.max_files, 10);
    assert!(config.auth.resolved_jwks_url().is_none());
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    env::set_var("OCRBENCH_PORT", "9100");
    env::set_var("VISION_API_KEY", "abc123");
    env::set_var("NEURAL_OCR_LANGUAGES", "ch,en");
    env::set_var("NEURAL_OCR_GPU", "true");
    env::set_var("TESSERACT_MIN_CONFIDENCE", "40.5");
    env::set_var("OCR_OUTPUT_DIR", "/tmp/ocr-out");
    env::set_var("LOG_CONSOLE", "false");
    env::set_var("AUTH_ISSUER_URL", "https://abc.supabase.co");

    let config = Config::from_env();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.ocr.cloud.api_key.as_deref(), Some("abc123"));
    assert_eq!(config.ocr.neural.languages, vec!["ch", "en"]);
    assert!(config.ocr.neural.gpu);
    assert_eq!(config.ocr.tesseract.min_confidence, 40.5);
    assert_eq!(config.output.dir, PathBuf::from("/tmp/ocr-out"));
    assert!(!config.logging.console);
    assert_eq!(
        config.auth.resolved_jwks_url().as_deref(),
        Some("https://abc.supabase.co/auth/v1/.well-known/jwks.json")
    );

    clear_env();
}

#[tokio::test]
#[serial]
async fn configured_engines_fail_cleanly_when_backends_are_missing() {
    init_test_logger();
    clear_env();
    env::set_var("NEURAL_OCR_PATH", "/nonexistent/PaddleOCR-json");
    env::set_var("TESSERACT_PATH", "/nonexistent/tesseract");

    let config = Config::from_env();
    clear_env();

    let dir = tempfile::tempdir().unwrap();
    let image = write_png(dir.path(), "sample.png");

    let comparator = OcrComparator::from_config(&config.ocr);
    assert_eq!(
        comparator.engine_names(),
        vec![CLOUD_VISION_ENGINE, NEURAL_ENGINE, TESSERACT_ENGINE]
    );

    let run = comparator.run(&image).await;
    assert_eq!(run.results().len(), 3);
    for result in run.results() {
        let status = result.status().to_string();
        assert!(
            status.starts_with("error: engine unavailable"),
            "{}: {status}",
            result.engine_name()
        );
    }
    assert_eq!(summarize(&run), RunSummary::NoSuccessfulEngine);
}
