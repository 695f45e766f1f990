//! Tesseract engine implementation
//!
//! Runs with `--oem 3 --psm 6` (default engine mode, single uniform block of
//! text). Without the `engine-leptess` feature the `tesseract` executable is
//! invoked on the preprocessed image file. With it, Tesseract is linked
//! statically through tesseract-static and tessdata is downloaded
//! automatically on first use.

use crate::cases::Language;
use crate::config::Config;
use crate::engine::{EngineKind, OcrEngine, OcrInput};
use crate::error::OcrError;

/// Page segmentation mode: assume a single uniform block of text
const PAGE_SEG_MODE: &str = "6";
/// OCR engine mode: whatever the traineddata supports
#[cfg_attr(feature = "engine-leptess", allow(dead_code))]
const ENGINE_MODE: &str = "3";

const LANGUAGES: [Language; 3] = [Language::Eng, Language::Kor, Language::Vie];

#[cfg(not(feature = "engine-leptess"))]
pub use self::cli::TesseractEngine;
#[cfg(feature = "engine-leptess")]
pub use self::linked::TesseractEngine;

#[cfg(not(feature = "engine-leptess"))]
mod cli {
    use super::*;
    use std::process::Command;

    /// Tesseract driven through its command line interface
    pub struct TesseractEngine {
        command: String,
        tessdata_path: Option<String>,
    }

    impl TesseractEngine {
        pub fn new(config: &Config) -> Result<Self, OcrError> {
            let engine = Self {
                command: config.tesseract_cmd.clone(),
                tessdata_path: config.tessdata_path.clone(),
            };

            let output = engine.command().arg("--version").output().map_err(|e| {
                OcrError::InitializationError(format!(
                    "Failed to run '{}' (is Tesseract installed?): {}",
                    engine.command, e
                ))
            })?;
            if !output.status.success() {
                return Err(OcrError::InitializationError(format!(
                    "'{} --version' failed: {}",
                    engine.command,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }

            let installed = engine.list_languages()?;
            for language in LANGUAGES {
                if !installed.iter().any(|l| l == language.tesseract_code()) {
                    tracing::warn!(
                        "Tesseract has no '{}' traineddata; {} samples will fail",
                        language.tesseract_code(),
                        language
                    );
                }
            }

            tracing::info!(
                "Tesseract engine initialized (command: {}, languages: {})",
                engine.command,
                installed.join(", ")
            );

            Ok(engine)
        }

        fn command(&self) -> Command {
            let mut command = Command::new(&self.command);
            if let Some(tessdata) = &self.tessdata_path {
                command.arg("--tessdata-dir").arg(tessdata);
            }
            command
        }

        fn list_languages(&self) -> Result<Vec<String>, OcrError> {
            let output = self.command().arg("--list-langs").output().map_err(|e| {
                OcrError::InitializationError(format!("Failed to list languages: {}", e))
            })?;

            // First line is a banner: List of available languages in "..." (N):
            Ok(String::from_utf8_lossy(&output.stdout)
                .lines()
                .skip(1)
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect())
        }
    }

    impl OcrEngine for TesseractEngine {
        fn kind(&self) -> EngineKind {
            EngineKind::Tesseract
        }

        fn description(&self) -> &'static str {
            "Tesseract OCR via the tesseract executable"
        }

        fn recognize(&self, input: &OcrInput<'_>) -> Result<String, OcrError> {
            let path = input.require_path()?;

            let output = self
                .command()
                .arg(path)
                .arg("stdout")
                .args(["--oem", ENGINE_MODE, "--psm", PAGE_SEG_MODE])
                .args(["-l", input.language.tesseract_code()])
                .output()
                .map_err(|e| {
                    OcrError::ProcessingError(format!("Failed to run tesseract: {}", e))
                })?;

            if !output.status.success() {
                return Err(OcrError::ProcessingError(format!(
                    "tesseract failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }

            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }

        fn supported_languages(&self) -> Vec<Language> {
            LANGUAGES.to_vec()
        }
    }
}

#[cfg(feature = "engine-leptess")]
mod linked {
    use super::*;
    use crate::engines::models::ModelCache;
    use tesseract_static::tesseract::Tesseract;

    const TESSDATA_BASE_URL: &str = "https://github.com/tesseract-ocr/tessdata_fast/raw/main";

    /// Statically linked Tesseract
    pub struct TesseractEngine {
        /// Path to tessdata directory
        tessdata_path: String,
    }

    impl TesseractEngine {
        pub fn new(config: &Config) -> Result<Self, OcrError> {
            let tessdata_path = match &config.tessdata_path {
                Some(path) => path.clone(),
                None => ensure_tessdata_available(&LANGUAGES)?,
            };

            // Validate that every language loads once up front
            for language in LANGUAGES {
                Tesseract::new(Some(&tessdata_path), Some(language.tesseract_code())).map_err(
                    |e| {
                        OcrError::InitializationError(format!(
                            "Failed to initialize Tesseract for '{}': {}",
                            language, e
                        ))
                    },
                )?;
            }

            tracing::info!("Tesseract engine initialized (tessdata: {})", tessdata_path);

            Ok(Self { tessdata_path })
        }
    }

    impl OcrEngine for TesseractEngine {
        fn kind(&self) -> EngineKind {
            EngineKind::Tesseract
        }

        fn description(&self) -> &'static str {
            "Tesseract OCR, statically linked"
        }

        fn recognize(&self, input: &OcrInput<'_>) -> Result<String, OcrError> {
            let (width, height) = input.image.dimensions();

            // BMP is always supported by leptonica
            let mut bmp_data = Vec::new();
            input
                .image
                .write_to(
                    &mut std::io::Cursor::new(&mut bmp_data),
                    image::ImageFormat::Bmp,
                )
                .map_err(|e| {
                    OcrError::ProcessingError(format!("Failed to convert to BMP: {}", e))
                })?;

            tracing::debug!(
                "Tesseract input: {}x{}, BMP size: {} bytes",
                width,
                height,
                bmp_data.len()
            );

            let mut tess = Tesseract::new(
                Some(&self.tessdata_path),
                Some(input.language.tesseract_code()),
            )
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create Tesseract: {}", e)))?;

            tess = tess
                .set_variable("tessedit_pageseg_mode", PAGE_SEG_MODE)
                .map_err(|e| {
                    OcrError::ProcessingError(format!("Failed to set page mode: {}", e))
                })?;

            tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
                OcrError::ProcessingError(format!(
                    "Failed to set image ({}x{}, {} bytes): {}",
                    width,
                    height,
                    bmp_data.len(),
                    e
                ))
            })?;

            tess = tess
                .recognize()
                .map_err(|e| OcrError::ProcessingError(format!("Failed to recognize text: {}", e)))?;

            let text = tess
                .get_text()
                .map_err(|e| OcrError::ProcessingError(format!("Failed to get text: {}", e)))?;

            Ok(text.trim().to_string())
        }

        fn supported_languages(&self) -> Vec<Language> {
            LANGUAGES.to_vec()
        }
    }

    /// Cache tessdata for every language and return the directory, which is
    /// what Tesseract expects
    fn ensure_tessdata_available(languages: &[Language]) -> Result<String, OcrError> {
        let cache = ModelCache::user("tessdata");
        for language in languages {
            let filename = format!("{}.traineddata", language.tesseract_code());
            cache.fetch(&format!("{}/{}", TESSDATA_BASE_URL, filename), &filename)?;
        }

        cache
            .dir()
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| OcrError::InitializationError("Invalid tessdata path".to_string()))
    }
}

#[cfg(all(test, not(feature = "engine-leptess")))]
mod tests {
    use super::*;

    fn config_with_command(command: &str) -> Config {
        Config {
            images_dir: "images".into(),
            output: "out.csv".into(),
            fallback_output: "fallback.csv".into(),
            engines: vec![EngineKind::Tesseract],
            tesseract_cmd: command.to_string(),
            tessdata_path: None,
            python: "python3".to_string(),
            show_table: false,
        }
    }

    #[test]
    fn test_missing_executable_fails_initialization() {
        let err = TesseractEngine::new(&config_with_command("/nonexistent/tesseract-bin"))
            .err()
            .expect("initialization should fail");
        assert!(matches!(err, OcrError::InitializationError(_)));
    }
}
