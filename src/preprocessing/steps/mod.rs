//! Individual preprocessing steps

pub mod grayscale;
pub mod threshold;
