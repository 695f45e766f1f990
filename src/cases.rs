//! Benchmark sample definitions
//!
//! The sample set is fixed: one typed and one handwritten image per language,
//! each with a hand-authored ground truth.

use serde::Serialize;
use std::fmt;

/// Language of a sample image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Eng,
    Kor,
    Vie,
}

impl Language {
    /// Three-letter code used in the report
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eng => "eng",
            Self::Kor => "kor",
            Self::Vie => "vie",
        }
    }

    /// Tesseract traineddata name
    pub fn tesseract_code(&self) -> &'static str {
        self.code()
    }

    /// EasyOCR reader languages (Korean needs English alongside)
    pub fn easyocr_codes(&self) -> &'static [&'static str] {
        match self {
            Self::Eng => &["en"],
            Self::Kor => &["ko", "en"],
            Self::Vie => &["vi"],
        }
    }

    /// PaddleOCR model language
    pub fn paddle_code(&self) -> &'static str {
        match self {
            Self::Eng => "en",
            Self::Kor => "korean",
            Self::Vie => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How the text in a sample was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Printed,
    Handwritten,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Printed => "printed",
            Self::Handwritten => "handwritten",
        }
    }
}

/// One benchmark sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCase {
    /// File name inside the images directory
    pub image: &'static str,
    pub language: Language,
    pub style: Style,
    pub ground_truth: &'static str,
}

const ENGLISH_TEXT: &str = "The quick brown fox jumps over the lazy dog.";
const KOREAN_TEXT: &str = "빠른 갈색 여우가 게으른 개를 뛰어넘습니다.";
const VIETNAMESE_TEXT: &str = "Con cáo nâu nhanh nhẹn nhảy qua con chó lười biếng.";

/// Samples in evaluation order
pub const SAMPLE_CASES: &[SampleCase] = &[
    SampleCase {
        image: "english_typed.png",
        language: Language::Eng,
        style: Style::Printed,
        ground_truth: ENGLISH_TEXT,
    },
    SampleCase {
        image: "korean_typed.png",
        language: Language::Kor,
        style: Style::Printed,
        ground_truth: KOREAN_TEXT,
    },
    SampleCase {
        image: "vietnamese_typed.png",
        language: Language::Vie,
        style: Style::Printed,
        ground_truth: VIETNAMESE_TEXT,
    },
    SampleCase {
        image: "english_handwritten.png",
        language: Language::Eng,
        style: Style::Handwritten,
        ground_truth: ENGLISH_TEXT,
    },
    SampleCase {
        image: "korean_handwritten.png",
        language: Language::Kor,
        style: Style::Handwritten,
        ground_truth: KOREAN_TEXT,
    },
    SampleCase {
        image: "vietnamese_handwritten.png",
        language: Language::Vie,
        style: Style::Handwritten,
        ground_truth: VIETNAMESE_TEXT,
    },
];
