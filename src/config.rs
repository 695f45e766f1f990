use crate::engine::EngineKind;
use crate::Args;
use std::path::PathBuf;

/// File name used in the documents directory when the primary report path fails
const FALLBACK_FILE_NAME: &str = "ocr_results.csv";

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub images_dir: PathBuf,
    pub output: PathBuf,
    pub fallback_output: PathBuf,
    pub engines: Vec<EngineKind>,
    #[cfg_attr(feature = "engine-leptess", allow(dead_code))]
    pub tesseract_cmd: String,
    pub tessdata_path: Option<String>,
    pub python: String,
    pub show_table: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut engines = Vec::with_capacity(args.engines.len());
        for kind in args.engines {
            if !engines.contains(&kind) {
                engines.push(kind);
            }
        }

        Self {
            images_dir: args.images_dir,
            output: args.output,
            fallback_output: args.fallback_output.unwrap_or_else(default_fallback_output),
            engines,
            tesseract_cmd: args.tesseract_cmd,
            tessdata_path: args.tessdata_path,
            python: args.python,
            show_table: !args.no_table,
        }
    }
}

/// `~/Documents/ocr_results.csv`, or the temp dir when no home is known
fn default_fallback_output() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(std::env::temp_dir)
        .join(FALLBACK_FILE_NAME)
}
