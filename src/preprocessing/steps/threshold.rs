use crate::error::OcrError;
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Binarize with a single global threshold chosen by Otsu's method.
/// Pixels strictly above the level become white, the rest black.
pub fn apply(image: GrayImage) -> Result<GrayImage, OcrError> {
    let level = otsu_level(&image);
    tracing::debug!("Otsu threshold level: {}", level);
    Ok(binarize(image, level))
}

fn binarize(mut image: GrayImage, level: u8) -> GrayImage {
    for pixel in image.pixels_mut() {
        *pixel = if pixel.0[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        };
    }
    image
}
