use crate::error::OcrError;
use image::{DynamicImage, GrayImage};

/// Convert image to single-channel 8-bit luma
pub fn apply(image: &DynamicImage) -> Result<GrayImage, OcrError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(OcrError::PreprocessingError(format!(
            "Image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(image.to_luma8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_grayscale_converts_color() {
        let mut img = RgbImage::new(10, 10);
        img.put_pixel(0, 0, Rgb([255, 0, 0])); // Red
        img.put_pixel(1, 0, Rgb([0, 255, 0])); // Green
        img.put_pixel(2, 0, Rgb([0, 0, 255])); // Blue

        let gray = apply(&DynamicImage::ImageRgb8(img)).unwrap();

        assert!(gray.get_pixel(0, 0).0[0] > 0);
        assert!(gray.get_pixel(1, 0).0[0] > gray.get_pixel(2, 0).0[0]);
        assert_eq!(gray.get_pixel(5, 5).0[0], 0);
    }

    #[test]
    fn test_grayscale_preserves_dimensions() {
        let img = RgbImage::new(100, 50);
        let result = apply(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.dimensions(), (100, 50));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let img = RgbImage::new(0, 10);
        assert!(apply(&DynamicImage::ImageRgb8(img)).is_err());
    }
}
