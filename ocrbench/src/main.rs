use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use ocrbench::api::{create_router, AppState};
use ocrbench::compare::{
    default_export_path, export_csv, export_json, log_summary, summarize, OcrComparator,
    RunSummary,
};
use ocrbench::config::Config;
use ocrbench::logging;
use ocrbench::ocr::{build_engine, EngineKind};

#[derive(Parser)]
#[command(name = "ocrbench")]
#[command(about = "Compare OCR engines on the same image")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every engine on an image and export CSV and JSON results
    Compare {
        image: PathBuf,
        /// Directory for exported results (defaults to OCR_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// CSV file name inside the output directory
        #[arg(long)]
        csv: Option<String>,
        /// JSON file name inside the output directory
        #[arg(long)]
        json: Option<String>,
    },
    /// Run a single engine and print what it recognized
    Engine {
        #[arg(value_enum)]
        kind: EngineKind,
        image: PathBuf,
    },
    /// Start the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let _log = logging::init(&config.logging, logging::DEFAULT_COMPONENTS)?;

    match args.command {
        Command::Compare {
            image,
            output_dir,
            csv,
            json,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
            compare(&config, &image, &output_dir, csv, json).await
        }
        Command::Engine { kind, image } => run_engine(&config, kind, &image).await,
        Command::Serve => serve(config).await,
    }
}

fn export_path(output_dir: &Path, name: Option<String>, extension: &str) -> PathBuf {
    match name {
        Some(name) => output_dir.join(name),
        None => default_export_path(output_dir, extension, chrono::Local::now()),
    }
}

async fn compare(
    config: &Config,
    image: &Path,
    output_dir: &Path,
    csv: Option<String>,
    json: Option<String>,
) -> anyhow::Result<()> {
    let comparator = OcrComparator::from_config(&config.ocr);
    tracing::info!("Comparing engines: {}", comparator.engine_names().join(", "));

    let run = comparator.run(image).await;
    let summary = summarize(&run);
    log_summary(&run, &summary);

    let csv_path = export_csv(&run, &export_path(output_dir, csv, "csv"))?;
    let json_path = export_json(&run, &export_path(output_dir, json, "json"))?;

    for result in run.results() {
        println!(
            "{:<20} {:>6.2}%  {}",
            result.engine_name(),
            result.confidence() * 100.0,
            result.status()
        );
    }
    match &summary {
        RunSummary::Successful {
            average_confidence,
            best_engine,
            best_confidence,
            ..
        } => {
            println!("Average confidence: {:.2}%", average_confidence * 100.0);
            println!(
                "Best engine: {best_engine} ({:.2}%)",
                best_confidence * 100.0
            );
        }
        RunSummary::NoSuccessfulEngine => println!("No engine succeeded"),
    }
    println!("CSV:  {}", csv_path.display());
    println!("JSON: {}", json_path.display());

    Ok(())
}

async fn run_engine(config: &Config, kind: EngineKind, image: &Path) -> anyhow::Result<()> {
    let engine = build_engine(kind, &config.ocr);
    let result = engine.run(image).await;

    println!("Engine:     {}", result.engine_name());
    println!("Status:     {}", result.status());
    println!("Confidence: {:.4}", result.confidence());
    println!("Elapsed:    {} ms", result.elapsed().as_millis());
    if !result.extracted_text().is_empty() {
        println!("\n{}", result.extracted_text());
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if !config.auth.can_verify_tokens() {
        tracing::warn!(
            "None of DEBUG_TOKEN, AUTH_ISSUER_URL or AUTH_JWKS_URL is set; every protected route will answer 401."
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(&config)?;
    let app = create_router(state);

    let cancel_token = CancellationToken::new();

    tracing::info!("ocrbench starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tokio::spawn(shutdown_signal(cancel_token.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(cancel_token.cancelled_owned())
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
    cancel_token.cancel();
}
