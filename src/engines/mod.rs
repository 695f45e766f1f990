//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait for the
//! benchmarked backends. Tesseract runs in-process when built with
//! `engine-leptess` and through its executable otherwise; the Python
//! libraries run in long-lived worker processes; ocrs is compiled in with
//! `engine-ocrs`.

pub mod bridge;
pub mod tesseract;

#[cfg(any(feature = "engine-ocrs", feature = "engine-leptess"))]
mod models;
#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

use crate::config::Config;
use crate::engine::{EngineKind, OcrEngine, OcrInput, Recognition};
use crate::error::OcrError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Information about a configured engine
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<String>,
    /// Why the engine could not be initialized
    pub unavailable: Option<String>,
}

/// A configured engine: either ready to run, or failed at startup
pub enum EngineSlot {
    Ready(Arc<dyn OcrEngine>),
    Unavailable { kind: EngineKind, reason: String },
}

impl EngineSlot {
    pub fn kind(&self) -> EngineKind {
        match self {
            Self::Ready(engine) => engine.kind(),
            Self::Unavailable { kind, .. } => *kind,
        }
    }

    /// Run the engine on one sample, timing the call. Errors never escape.
    pub fn run(&self, input: &OcrInput<'_>) -> Recognition {
        let engine = match self {
            Self::Ready(engine) => engine,
            Self::Unavailable { reason, .. } => {
                return Recognition::Failed {
                    reason: format!("engine unavailable: {}", reason),
                    elapsed: Duration::ZERO,
                };
            }
        };

        if !engine.supported_languages().contains(&input.language) {
            let err = OcrError::UnsupportedLanguage {
                engine: engine.kind().id(),
                language: input.language.code(),
            };
            return Recognition::Failed {
                reason: err.to_string(),
                elapsed: Duration::ZERO,
            };
        }

        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| engine.recognize(input)));
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(text)) => Recognition::Text { text, elapsed },
            Ok(Err(e)) => Recognition::Failed {
                reason: e.to_string(),
                elapsed,
            },
            Err(payload) => Recognition::Failed {
                reason: format!("engine panicked: {}", panic_message(payload.as_ref())),
                elapsed,
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

/// Registry of the configured OCR engines, in column order
pub struct EngineRegistry {
    slots: Vec<EngineSlot>,
}

impl EngineRegistry {
    /// Initialize every configured engine once. Engines that fail to start
    /// are kept as unavailable slots so the report layout stays fixed.
    pub fn new(config: &Config) -> Self {
        let slots = config
            .engines
            .iter()
            .map(|&kind| {
                tracing::info!("Initializing {} engine...", kind);
                match build_engine(kind, config) {
                    Ok(engine) => EngineSlot::Ready(engine),
                    Err(e) => EngineSlot::Unavailable {
                        kind,
                        reason: e.to_string(),
                    },
                }
            })
            .collect();

        Self { slots }
    }

    /// Registry over already-built slots
    #[cfg(test)]
    pub fn from_slots(slots: Vec<EngineSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[EngineSlot] {
        &self.slots
    }

    /// Engine kinds in column order
    pub fn columns(&self) -> Vec<EngineKind> {
        self.slots.iter().map(|s| s.kind()).collect()
    }

    /// Get info about all configured engines
    pub fn info(&self) -> Vec<EngineInfo> {
        self.slots
            .iter()
            .map(|slot| match slot {
                EngineSlot::Ready(e) => EngineInfo {
                    name: e.kind().id(),
                    description: e.description(),
                    supported_languages: e
                        .supported_languages()
                        .iter()
                        .map(|l| l.code().to_string())
                        .collect(),
                    unavailable: None,
                },
                EngineSlot::Unavailable { kind, reason } => EngineInfo {
                    name: kind.id(),
                    description: "",
                    supported_languages: Vec::new(),
                    unavailable: Some(reason.clone()),
                },
            })
            .collect()
    }
}

fn build_engine(kind: EngineKind, config: &Config) -> Result<Arc<dyn OcrEngine>, OcrError> {
    let engine: Arc<dyn OcrEngine> = match kind {
        EngineKind::Tesseract => Arc::new(tesseract::TesseractEngine::new(config)?),
        EngineKind::EasyOcr
        | EngineKind::PaddleOcr
        | EngineKind::Doctr
        | EngineKind::TrOcr => Arc::new(bridge::BridgeEngine::spawn(kind, config)?),
        #[cfg(feature = "engine-ocrs")]
        EngineKind::Ocrs => Arc::new(ocrs::OcrsEngine::new(config)?),
        #[cfg(not(feature = "engine-ocrs"))]
        EngineKind::Ocrs => {
            return Err(OcrError::InitializationError(
                "ocrs is not available. Build with --features engine-ocrs".to_string(),
            ))
        }
    };
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{Language, Style};
    use image::GrayImage;

    struct EnglishOnly;

    impl OcrEngine for EnglishOnly {
        fn kind(&self) -> EngineKind {
            EngineKind::Ocrs
        }

        fn description(&self) -> &'static str {
            "test engine"
        }

        fn recognize(&self, _input: &OcrInput<'_>) -> Result<String, OcrError> {
            Ok("hello".to_string())
        }

        fn supported_languages(&self) -> Vec<Language> {
            vec![Language::Eng]
        }
    }

    struct Panicking;

    impl OcrEngine for Panicking {
        fn kind(&self) -> EngineKind {
            EngineKind::Ocrs
        }

        fn description(&self) -> &'static str {
            "panics on every call"
        }

        fn recognize(&self, _input: &OcrInput<'_>) -> Result<String, OcrError> {
            let empty: Vec<u8> = Vec::new();
            let index = 3;
            Ok(empty[index].to_string())
        }

        fn supported_languages(&self) -> Vec<Language> {
            vec![Language::Eng]
        }
    }

    fn input(image: &GrayImage, language: Language) -> OcrInput<'_> {
        OcrInput {
            image,
            path: None,
            language,
            style: Style::Printed,
        }
    }

    #[test]
    fn test_ready_slot_returns_text() {
        let image = GrayImage::new(4, 4);
        let slot = EngineSlot::Ready(Arc::new(EnglishOnly));
        match slot.run(&input(&image, Language::Eng)) {
            Recognition::Text { text, .. } => assert_eq!(text, "hello"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_language_is_degraded_without_calling_engine() {
        let image = GrayImage::new(4, 4);
        let slot = EngineSlot::Ready(Arc::new(EnglishOnly));
        match slot.run(&input(&image, Language::Kor)) {
            Recognition::Failed { reason, elapsed } => {
                assert!(reason.contains("kor"), "{}", reason);
                assert_eq!(elapsed, Duration::ZERO);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_slot_keeps_its_column() {
        let registry = EngineRegistry::from_slots(vec![
            EngineSlot::Unavailable {
                kind: EngineKind::Doctr,
                reason: "no python".to_string(),
            },
            EngineSlot::Ready(Arc::new(EnglishOnly)),
        ]);

        assert_eq!(registry.columns(), vec![EngineKind::Doctr, EngineKind::Ocrs]);
        let info = registry.info();
        assert_eq!(info[0].unavailable.as_deref(), Some("no python"));
        assert!(info[1].unavailable.is_none());

        let image = GrayImage::new(4, 4);
        match registry.slots()[0].run(&input(&image, Language::Eng)) {
            Recognition::Failed { reason, .. } => assert!(reason.contains("no python")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_engine_panic_becomes_failed_recognition() {
        let image = GrayImage::new(4, 4);
        let slot = EngineSlot::Ready(Arc::new(Panicking));
        match slot.run(&input(&image, Language::Eng)) {
            Recognition::Failed { reason, .. } => {
                assert!(reason.starts_with("engine panicked:"), "{}", reason);
                assert!(reason.contains("index out of bounds"), "{}", reason);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_panic_message_falls_back_for_unknown_payload() {
        assert_eq!(panic_message(&42u32), "unknown panic");
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("owned boom")), "owned boom");
    }
}
