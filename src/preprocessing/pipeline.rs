use crate::error::OcrError;
use image::{DynamicImage, GrayImage};
use std::time::Instant;

use super::steps;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Binary image
    pub image: GrayImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Grayscale followed by Otsu thresholding. No parameters; the same pixels
/// always give the same binary image.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, image: &DynamicImage) -> Result<PreprocessingResult, OcrError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let gray = run_step("grayscale", &mut steps_timing, || {
            steps::grayscale::apply(image)
        })?;
        let binary = run_step("threshold", &mut steps_timing, || {
            steps::threshold::apply(gray)
        })?;

        Ok(PreprocessingResult {
            image: binary,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }
}

fn run_step<T, F>(name: &str, timings: &mut Vec<StepTiming>, step_fn: F) -> Result<T, OcrError>
where
    F: FnOnce() -> Result<T, OcrError>,
{
    let step_start = Instant::now();
    let result = step_fn()?;
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    Ok(result)
}
