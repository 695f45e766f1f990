use crate::cases::{Language, Style};
use crate::error::OcrError;
use image::GrayImage;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Engines the benchmark knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EngineKind {
    #[value(name = "tesseract")]
    Tesseract,
    #[value(name = "easyocr")]
    EasyOcr,
    #[value(name = "paddleocr")]
    PaddleOcr,
    #[value(name = "doctr")]
    Doctr,
    #[value(name = "trocr")]
    TrOcr,
    #[value(name = "ocrs")]
    Ocrs,
}

impl EngineKind {
    /// Default benchmark line-up, in column order
    pub const BENCHMARK: [EngineKind; 5] = [
        Self::Tesseract,
        Self::EasyOcr,
        Self::PaddleOcr,
        Self::Doctr,
        Self::TrOcr,
    ];

    /// Identifier used on the command line and in logs
    pub fn id(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::EasyOcr => "easyocr",
            Self::PaddleOcr => "paddleocr",
            Self::Doctr => "doctr",
            Self::TrOcr => "trocr",
            Self::Ocrs => "ocrs",
        }
    }

    /// Column prefix in the report
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tesseract => "Tesseract",
            Self::EasyOcr => "EasyOCR",
            Self::PaddleOcr => "PaddleOCR",
            Self::Doctr => "Doctr",
            Self::TrOcr => "TrOCR",
            Self::Ocrs => "Ocrs",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Everything an engine gets for one sample. The binary image is shared by
/// all engines and never modified.
pub struct OcrInput<'a> {
    pub image: &'a GrayImage,
    /// The same binary image as a PNG on disk, for engines that read files
    pub path: Option<&'a Path>,
    pub language: Language,
    pub style: Style,
}

impl OcrInput<'_> {
    pub fn require_path(&self) -> Result<&Path, OcrError> {
        self.path.ok_or_else(|| {
            OcrError::ProcessingError("Preprocessed image was not written to disk".to_string())
        })
    }
}

/// Outcome of one engine call
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    Text { text: String, elapsed: Duration },
    Failed { reason: String, elapsed: Duration },
}

/// Trait that all OCR engines must implement
pub trait OcrEngine: Send + Sync {
    /// Which engine this is
    fn kind(&self) -> EngineKind;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text of one preprocessed sample
    fn recognize(&self, input: &OcrInput<'_>) -> Result<String, OcrError>;

    /// Get supported languages
    fn supported_languages(&self) -> Vec<Language>;
}
