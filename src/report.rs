//! Result reporting: CSV file plus an optional console table

use crate::config::Config;
use crate::engine::EngineKind;
use crate::error::OcrError;
use crate::evaluation::ResultRow;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Spreadsheet applications need it to detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the report ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Saved(PathBuf),
    SavedToFallback(PathBuf),
    NotSaved,
}

pub struct Reporter {
    output: PathBuf,
    fallback_output: PathBuf,
}

impl Reporter {
    pub fn new(config: &Config) -> Self {
        Self {
            output: config.output.clone(),
            fallback_output: config.fallback_output.clone(),
        }
    }

    /// Write the CSV to the primary path, or to the fallback path if that
    /// fails. Failures are logged, never returned.
    pub fn save(&self, columns: &[EngineKind], rows: &[ResultRow]) -> ReportOutcome {
        let primary_err = match write_csv(&self.output, columns, rows) {
            Ok(()) => {
                tracing::info!("Results saved to {:?}", self.output);
                return ReportOutcome::Saved(self.output.clone());
            }
            Err(e) => e,
        };
        tracing::error!("Could not save results: {}", primary_err);

        let fallback = self.write_fallback(columns, rows);
        match fallback {
            Ok(()) => {
                tracing::info!(
                    "Results saved to alternative location: {:?}",
                    self.fallback_output
                );
                ReportOutcome::SavedToFallback(self.fallback_output.clone())
            }
            Err(e) => {
                tracing::error!("Could not save results to fallback location: {}", e);
                ReportOutcome::NotSaved
            }
        }
    }

    fn write_fallback(&self, columns: &[EngineKind], rows: &[ResultRow]) -> Result<(), OcrError> {
        if let Some(parent) = self.fallback_output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| OcrError::ReportIo {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        write_csv(&self.fallback_output, columns, rows)
    }

    /// Print the results table to stdout
    pub fn display(&self, columns: &[EngineKind], rows: &[ResultRow]) {
        println!("{}", render(columns, rows));
    }
}

/// `Image, Lang` then accuracy, seconds and output per engine
pub fn header(columns: &[EngineKind]) -> Vec<String> {
    let mut header = vec!["Image".to_string(), "Lang".to_string()];
    for kind in columns {
        header.push(format!("{}_Acc", kind.label()));
        header.push(format!("{}_Sec", kind.label()));
        header.push(format!("{}_Output", kind.label()));
    }
    header
}

fn record(row: &ResultRow) -> Vec<String> {
    let mut record = vec![row.image.clone(), row.language.code().to_string()];
    for result in &row.results {
        record.push(format!("{:.2}", result.accuracy));
        record.push(format!("{:.2}", result.elapsed_seconds));
        record.push(result.text.clone());
    }
    record
}

/// Write rows as BOM-prefixed UTF-8 CSV
pub fn write_csv(path: &Path, columns: &[EngineKind], rows: &[ResultRow]) -> Result<(), OcrError> {
    let io_err = |source| OcrError::ReportIo {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(UTF8_BOM).map_err(io_err)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(header(columns))?;
    for row in rows {
        writer.write_record(record(row))?;
    }
    writer.flush().map_err(io_err)?;

    Ok(())
}

/// Grid table of the results
#[cfg(feature = "pretty-table")]
pub fn render(columns: &[EngineKind], rows: &[ResultRow]) -> String {
    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_FULL)
        .set_header(header(columns));
    for row in rows {
        table.add_row(record(row));
    }
    table.to_string()
}

/// Plain dump of the results; the grid table needs the pretty-table feature
#[cfg(not(feature = "pretty-table"))]
pub fn render(_columns: &[EngineKind], rows: &[ResultRow]) -> String {
    tracing::warn!(
        "Table output unavailable (built without the pretty-table feature), showing raw results"
    );
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| format!("{:#?}", rows))
}
