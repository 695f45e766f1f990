//! ocrs engine: pure Rust detection and recognition models, Latin script
//! only, so Korean and Vietnamese samples are reported as unsupported.

use super::models::ModelCache;
use crate::cases::Language;
use crate::config::Config;
use crate::engine::{EngineKind, OcrEngine, OcrInput};
use crate::error::OcrError;
use image::{DynamicImage, GrayImage, RgbImage};
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsPipeline, OcrEngineParams};
use rten::Model;
use std::path::Path;

const MODEL_BASE_URL: &str = "https://ocrs-models.s3-accelerate.amazonaws.com";
const DETECTION_MODEL: &str = "text-detection.rten";
const RECOGNITION_MODEL: &str = "text-recognition.rten";

pub struct OcrsEngine {
    pipeline: OcrsPipeline,
}

impl OcrsEngine {
    pub fn new(_config: &Config) -> Result<Self, OcrError> {
        let cache = ModelCache::user("ocrs");
        let detection = load_model(&cache, DETECTION_MODEL)?;
        let recognition = load_model(&cache, RECOGNITION_MODEL)?;

        let pipeline = OcrsPipeline::new(OcrEngineParams {
            detection_model: Some(detection),
            recognition_model: Some(recognition),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| OcrError::InitializationError(format!("Failed to create ocrs engine: {}", e)))?;

        tracing::info!("ocrs engine initialized (models in {:?})", cache.dir());
        Ok(Self { pipeline })
    }
}

fn load_model(cache: &ModelCache, filename: &str) -> Result<Model, OcrError> {
    let path = cache.fetch(&format!("{}/{}", MODEL_BASE_URL, filename), filename)?;
    load_model_file(&path)
}

fn load_model_file(path: &Path) -> Result<Model, OcrError> {
    Model::load_file(path).map_err(|e| {
        OcrError::InitializationError(format!("Failed to load model {:?}: {}", path, e))
    })
}

/// ocrs reads 8-bit RGB in row-major order
fn to_rgb(image: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(image.clone()).into_rgb8()
}

impl OcrEngine for OcrsEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Ocrs
    }

    fn description(&self) -> &'static str {
        "ocrs neural OCR, pure Rust (Latin script)"
    }

    fn recognize(&self, input: &OcrInput<'_>) -> Result<String, OcrError> {
        let rgb = to_rgb(input.image);
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|e| OcrError::ProcessingError(format!("Invalid image for ocrs: {}", e)))?;

        let prepared = self
            .pipeline
            .prepare_input(source)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to prepare input: {}", e)))?;

        // One line of text per detected line, in reading order
        self.pipeline
            .get_text(&prepared)
            .map_err(|e| OcrError::ProcessingError(format!("ocrs recognition failed: {}", e)))
    }

    fn supported_languages(&self) -> Vec<Language> {
        vec![Language::Eng]
    }
}
