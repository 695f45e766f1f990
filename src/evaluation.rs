//! Evaluation driver
//!
//! Walks the sample cases in order, preprocesses each image once, runs every
//! configured engine on it and scores the output against the ground truth.
//! A sample whose image cannot be loaded is skipped; an engine that fails on
//! a sample leaves a degraded result in its column.

use crate::cases::{Language, SampleCase};
use crate::engine::{EngineKind, OcrInput, Recognition};
use crate::engines::EngineRegistry;
use crate::error::OcrError;
use crate::preprocessing::Pipeline;
use crate::scoring;
use image::GrayImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Text recorded for an engine that failed on a sample
pub const ERROR_PREFIX: &str = "[error]";

/// One engine's outcome on one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineResult {
    pub engine: &'static str,
    pub text: String,
    pub elapsed_seconds: f64,
    pub accuracy: f64,
    pub failed: bool,
}

impl EngineResult {
    /// Score a recognition against the ground truth. Failures become a
    /// placeholder with zero time and zero accuracy.
    pub fn from_recognition(kind: EngineKind, recognition: Recognition, ground_truth: &str) -> Self {
        match recognition {
            Recognition::Text { text, elapsed } => Self {
                engine: kind.label(),
                accuracy: scoring::accuracy(ground_truth, &text),
                text,
                elapsed_seconds: elapsed.as_secs_f64(),
                failed: false,
            },
            Recognition::Failed { reason, elapsed } => {
                tracing::debug!("{} gave up after {:.2}s", kind.label(), elapsed.as_secs_f64());
                Self {
                    engine: kind.label(),
                    text: format!("{} {}", ERROR_PREFIX, reason),
                    elapsed_seconds: 0.0,
                    accuracy: 0.0,
                    failed: true,
                }
            }
        }
    }
}

/// All engine results for one sample, in registry column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub image: String,
    pub language: Language,
    pub results: Vec<EngineResult>,
}

pub struct Evaluator<'a> {
    registry: &'a EngineRegistry,
    images_dir: PathBuf,
    pipeline: Pipeline,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a EngineRegistry, images_dir: &Path) -> Self {
        Self {
            registry,
            images_dir: images_dir.to_path_buf(),
            pipeline: Pipeline::new(),
        }
    }

    /// Evaluate every case in order. Rows come back in case order, without
    /// the skipped cases.
    pub fn run(&self, cases: &[SampleCase]) -> Vec<ResultRow> {
        let mut rows = Vec::with_capacity(cases.len());

        for case in cases {
            tracing::info!("Processing: {} | Language: {}", case.image, case.language);
            match self.evaluate(case) {
                Ok(row) => rows.push(row),
                Err(e) => tracing::warn!("Skipping {}: {}", case.image, e),
            }
        }

        tracing::info!(
            "Evaluated {} of {} samples",
            rows.len(),
            cases.len()
        );
        rows
    }

    fn evaluate(&self, case: &SampleCase) -> Result<ResultRow, OcrError> {
        let path = self.images_dir.join(case.image);
        let image = image::open(&path).map_err(|source| OcrError::ImageLoad {
            path: path.clone(),
            source,
        })?;

        let preprocessed = self.pipeline.process(&image)?;
        let steps: Vec<String> = preprocessed
            .steps
            .iter()
            .map(|step| format!("{} {}ms", step.name, step.time_ms))
            .collect();
        tracing::debug!(
            "Preprocessed {} in {}ms ({})",
            case.image,
            preprocessed.total_time_ms,
            steps.join(", ")
        );

        let temp_path = match write_temp_png(&preprocessed.image) {
            Ok(temp_path) => Some(temp_path),
            Err(e) => {
                tracing::warn!("File-based engines will fail on {}: {}", case.image, e);
                None
            }
        };

        let input = OcrInput {
            image: &preprocessed.image,
            path: temp_path.as_deref(),
            language: case.language,
            style: case.style,
        };

        let results = self
            .registry
            .slots()
            .iter()
            .map(|slot| {
                let kind = slot.kind();
                let result =
                    EngineResult::from_recognition(kind, slot.run(&input), case.ground_truth);
                if result.failed {
                    tracing::warn!("{} failed on {}: {}", kind.label(), case.image, result.text);
                }
                tracing::info!(
                    "{}: Acc {:.2}%, Time {:.2}s",
                    kind.label(),
                    result.accuracy,
                    result.elapsed_seconds
                );
                result
            })
            .collect();

        Ok(ResultRow {
            image: case.image.to_string(),
            language: case.language,
            results,
        })
    }
}

/// Write the binary image to a temporary PNG, removed when the path drops
fn write_temp_png(image: &GrayImage) -> Result<TempPath, OcrError> {
    let temp_path = tempfile::Builder::new()
        .prefix("ocr-bench-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| OcrError::ProcessingError(format!("Failed to create temp file: {}", e)))?
        .into_temp_path();

    image
        .save_with_format(&temp_path, image::ImageFormat::Png)
        .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

    Ok(temp_path)
}
