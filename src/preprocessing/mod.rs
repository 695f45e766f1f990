//! Image preprocessing before OCR
//!
//! Every sample is binarized once (grayscale, then a global Otsu threshold)
//! and the result is shared by all engines.

pub mod pipeline;
pub mod steps;

pub use pipeline::Pipeline;
