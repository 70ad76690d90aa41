//! Process-wide logging.
//!
//! Console output is filtered by `RUST_LOG` (falling back to `LOG_LEVEL`).
//! Every registered component also gets its own rolling NDJSON file under
//! the log directory that only receives events whose target starts with the
//! component name.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{OcrBenchError, Result};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Components that get a dedicated log file by default.
pub const DEFAULT_COMPONENTS: &[&str] = &["ocrbench::compare", "ocrbench::ocr", "ocrbench::api"];

/// Keeps the background file writers alive. Dropping it flushes and stops
/// file logging, so hold it for the life of the process.
#[must_use]
pub struct LogContext {
    files: Vec<PathBuf>,
    _guards: Vec<WorkerGuard>,
}

impl LogContext {
    /// Base paths of the component log files. The appender adds the date
    /// before the `.log` extension.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// File stem for a component: `ocrbench::ocr` and `ocrbench.ocr` both
/// become `ocrbench_ocr`.
pub fn file_stem(component: &str) -> String {
    component.replace("::", "_").replace('.', "_")
}

pub fn log_file_path(dir: &Path, component: &str) -> PathBuf {
    dir.join(format!("{}.log", file_stem(component)))
}

/// Drops repeated names, keeping first-seen order.
fn unique_components<'a>(components: &[&'a str]) -> Vec<&'a str> {
    let mut unique: Vec<&str> = Vec::with_capacity(components.len());
    for name in components {
        let name = name.trim();
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

/// Installs the global subscriber.
///
/// Fails without opening any file when a subscriber was already installed
/// by an earlier call, and fails if another global subscriber is in place.
pub fn init(config: &LoggingConfig, components: &[&str]) -> Result<LogContext> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(OcrBenchError::Config(
            "logging is already initialized".to_string(),
        ));
    }

    let context = install(config, components);
    if context.is_err() {
        INSTALLED.store(false, Ordering::SeqCst);
    }
    context
}

fn install(config: &LoggingConfig, components: &[&str]) -> Result<LogContext> {
    std::fs::create_dir_all(&config.dir)?;

    let level: LevelFilter = config.level.parse().unwrap_or(LevelFilter::INFO);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut guards = Vec::new();
    let mut files = Vec::new();

    for component in unique_components(components) {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(file_stem(component))
            .filename_suffix("log")
            .max_log_files(config.max_files.max(1))
            .build(&config.dir)
            .map_err(|e| {
                OcrBenchError::Config(format!("Failed to open log file for {component}: {e}"))
            })?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        layers.push(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(Targets::new().with_target(component, level))
                .boxed(),
        );
        guards.push(guard);
        files.push(log_file_path(&config.dir, component));
    }

    if config.console {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
        layers.push(fmt::layer().with_filter(env_filter).boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| OcrBenchError::Config(format!("Failed to install log subscriber: {e}")))?;

    Ok(LogContext {
        files,
        _guards: guards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_replaces_separators() {
        assert_eq!(file_stem("ocr.comparator"), "ocr_comparator");
        assert_eq!(file_stem("ocrbench::ocr"), "ocrbench_ocr");
        assert_eq!(
            log_file_path(Path::new("logs"), "api.auth"),
            PathBuf::from("logs/api_auth.log")
        );
    }

    #[test]
    fn test_duplicate_components_collapse() {
        let unique = unique_components(&["ocrbench::ocr", "ocrbench::api", "ocrbench::ocr", " "]);
        assert_eq!(unique, vec!["ocrbench::ocr", "ocrbench::api"]);
    }

    #[test]
    fn test_init_creates_directory_and_one_file_per_component() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            dir: dir.path().join("nested/logs"),
            level: "debug".to_string(),
            console: false,
            max_files: 2,
        };

        let context = init(&config, &["ocrbench::ocr", "ocrbench::ocr", "ocrbench::compare"]).unwrap();
        assert!(config.dir.is_dir());
        assert_eq!(
            context.files(),
            &[
                config.dir.join("ocrbench_ocr.log"),
                config.dir.join("ocrbench_compare.log"),
            ]
        );

        let second = LoggingConfig {
            dir: dir.path().join("second"),
            ..config.clone()
        };
        assert!(matches!(
            init(&second, &["ocrbench::api"]),
            Err(OcrBenchError::Config(_))
        ));
        assert!(!second.dir.exists());
    }
}
