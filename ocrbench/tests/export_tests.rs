use std::fs;
use std::time::Duration;

use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;

use ocrbench::compare::{export_csv, export_json, PREVIEW_CHARS};
use ocrbench::error::ExportError;
use ocrbench::models::{ComparisonRun, ConfidenceScale, EngineResult, Recognition};

fn sample_run() -> ComparisonRun {
    let long_text = "x".repeat(250);
    ComparisonRun::with_results(
        "scans/invoice-01.png",
        Local::now(),
        vec![
            EngineResult::success(
                "Zeta",
                Recognition::from_scores(long_text, &[0.9], ConfidenceScale::Unit),
                Duration::from_millis(120),
            ),
            EngineResult::success(
                "Alpha",
                Recognition::from_scores("Grüße, 東京", &[91.0, 85.0], ConfidenceScale::Percent),
                Duration::from_millis(40),
            ),
            EngineResult::failure("Mid", "binary not found", Duration::from_millis(1)),
        ],
    )
}

#[test]
fn csv_has_expected_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("results.csv");

    let written = export_csv(&sample_run(), &path).unwrap();
    assert_eq!(written, path);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        header,
        vec![
            "image_file",
            "ocr_model",
            "confidence_score",
            "status",
            "extracted_text_preview",
            "timestamp",
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    assert_eq!(&rows[0][0], "invoice-01.png");
    assert_eq!(&rows[0][1], "Zeta");
    assert_eq!(rows[0][4].chars().count(), PREVIEW_CHARS);
    assert_eq!(&rows[0][3], "success");

    assert_eq!(&rows[1][4], "Grüße, 東京");
    let confidence: f64 = rows[1][2].parse().unwrap();
    assert!((confidence - 0.88).abs() < 1e-9);

    assert_eq!(&rows[2][3], "error: binary not found");
    assert_eq!(&rows[2][2], "0.0");
    assert_eq!(&rows[2][4], "");

    chrono::DateTime::parse_from_rfc3339(&rows[0][5]).unwrap();
}

#[test]
fn json_keeps_run_order_and_full_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");

    export_json(&sample_run(), &path).unwrap();
    let raw = fs::read_to_string(&path).unwrap();

    let zeta = raw.find("\"Zeta\"").unwrap();
    let alpha = raw.find("\"Alpha\"").unwrap();
    let mid = raw.find("\"Mid\"").unwrap();
    assert!(zeta < alpha && alpha < mid);
    assert!(raw.contains("東京"), "non-ASCII text should be written unescaped");

    let report: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(report["image_file"], "scans/invoice-01.png");
    assert_eq!(
        report["models"]["Zeta"]["full_text"].as_str().unwrap().len(),
        250
    );
    assert_eq!(report["models"]["Mid"]["status"], "error: binary not found");
    assert_eq!(report["models"]["Mid"]["confidence"], 0.0);

    for model in report["models"].as_object().unwrap().values() {
        let confidence = model["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));
    }
}

#[test]
fn json_timestamp_is_when_the_run_started() {
    let dir = tempfile::tempdir().unwrap();
    let started = Local.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    let run = ComparisonRun::with_results(
        "old.png",
        started,
        vec![EngineResult::failure("Only", "offline", Duration::ZERO)],
    );

    let json_path = export_json(&run, &dir.path().join("old.json")).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(report["timestamp"], started.to_rfc3339());

    let csv_path = export_csv(&run, &dir.path().join("old.csv")).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let row = reader.records().next().unwrap().unwrap();
    let exported_at = chrono::DateTime::parse_from_rfc3339(&row[5]).unwrap();
    assert!(exported_at > started);
}

#[test]
fn empty_run_is_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let run = ComparisonRun::new("a.png", Local::now());

    let csv_path = dir.path().join("a.csv");
    let json_path = dir.path().join("a.json");
    assert!(matches!(export_csv(&run, &csv_path), Err(ExportError::NoResults)));
    assert!(matches!(export_json(&run, &json_path), Err(ExportError::NoResults)));
    assert!(!csv_path.exists());
    assert!(!json_path.exists());
}
