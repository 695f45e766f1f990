use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cases;
mod config;
mod engine;
mod engines;
mod error;
mod evaluation;
mod preprocessing;
mod report;
mod scoring;

use engine::EngineKind;

#[derive(Parser, Debug)]
#[command(name = "ocr-bench")]
#[command(about = "Benchmark OCR engines for accuracy and latency on sample images")]
#[command(version)]
pub struct Args {
    /// Directory holding the sample images
    #[arg(long, env = "OCR_BENCH_IMAGES_DIR", default_value = "./images")]
    pub images_dir: PathBuf,

    /// CSV report location
    #[arg(long, env = "OCR_BENCH_OUTPUT", default_value = "ocr_results_all.csv")]
    pub output: PathBuf,

    /// Where to write the report if the primary location is not writable
    /// (defaults to ocr_results.csv in the user's documents directory)
    #[arg(long, env = "OCR_BENCH_FALLBACK_OUTPUT")]
    pub fallback_output: Option<PathBuf>,

    /// Engines to benchmark, in column order
    #[arg(
        long,
        env = "OCR_BENCH_ENGINES",
        value_enum,
        value_delimiter = ',',
        default_values_t = EngineKind::BENCHMARK.to_vec()
    )]
    pub engines: Vec<EngineKind>,

    /// Tesseract executable (ignored when built with engine-leptess)
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: String,

    /// Path to tessdata directory
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Python interpreter used for the EasyOCR, PaddleOCR, docTR and TrOCR workers
    #[arg(long, env = "OCR_BENCH_PYTHON", default_value = "python3")]
    pub python: String,

    /// Skip the console results table
    #[arg(long)]
    pub no_table: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!("Starting ocr-bench v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Reading samples from {:?}", config.images_dir);

    let registry = engines::EngineRegistry::new(&config);
    for info in registry.info() {
        match &info.unavailable {
            None => tracing::info!(
                "Engine {}: {} (languages: {})",
                info.name,
                info.description,
                info.supported_languages.join(", ")
            ),
            Some(reason) => tracing::warn!("Engine {} unavailable: {}", info.name, reason),
        }
    }

    let evaluator = evaluation::Evaluator::new(&registry, &config.images_dir);
    let rows = evaluator.run(cases::SAMPLE_CASES);

    let reporter = report::Reporter::new(&config);
    let columns = registry.columns();
    match reporter.save(&columns, &rows) {
        report::ReportOutcome::Saved(path) | report::ReportOutcome::SavedToFallback(path) => {
            tracing::debug!("Report written to {:?} ({} rows)", path, rows.len())
        }
        report::ReportOutcome::NotSaved => tracing::warn!("Results were not written to disk"),
    }
    if config.show_table {
        reporter.display(&columns, &rows);
    }

    Ok(())
}
