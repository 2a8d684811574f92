//! Image preprocessing for OCR.
//!
//! Color scans with uneven lighting degrade recognition accuracy; a global
//! Otsu threshold normalizes contrast to pure black/white before the engine
//! sees the pixels.

use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

/// Image preprocessor for the OCR fallback path.
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Create a new preprocessor.
    pub fn new() -> Self {
        Self
    }

    /// Convert to grayscale and binarize with an automatic global threshold.
    ///
    /// Deterministic given identical input pixels.
    pub fn binarize(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        let level = otsu_level(&gray);
        debug!("Otsu threshold level: {}", level);

        let (width, height) = gray.dimensions();
        let mut result = GrayImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let value = gray.get_pixel(x, y)[0];
                let output = if value > level { 255 } else { 0 };
                result.put_pixel(x, y, Luma([output]));
            }
        }

        result
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Otsu's threshold: the level maximizing between-class variance over the
/// 256-bin intensity histogram.
fn otsu_level(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = (image.width() as u64) * (image.height() as u64);
    if total == 0 {
        return 0;
    }

    let sum_all: u64 = histogram
        .iter()
        .enumerate()
        .map(|(value, count)| value as u64 * count)
        .sum();

    let mut sum_below = 0u64;
    let mut weight_below = 0u64;
    let mut best_level = 0u8;
    let mut best_variance = 0.0f64;

    for level in 0..256usize {
        weight_below += histogram[level];
        if weight_below == 0 {
            continue;
        }
        let weight_above = total - weight_below;
        if weight_above == 0 {
            break;
        }
        sum_below += level as u64 * histogram[level];

        let mean_below = sum_below as f64 / weight_below as f64;
        let mean_above = (sum_all - sum_below) as f64 / weight_above as f64;
        let variance =
            weight_below as f64 * weight_above as f64 * (mean_below - mean_above).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half dark, right half bright.
    fn bimodal_image() -> DynamicImage {
        let mut img = GrayImage::new(64, 32);
        for y in 0..32 {
            for x in 0..64 {
                let value = if x < 32 { 10 } else { 240 };
                img.put_pixel(x, y, Luma([value]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_otsu_separates_bimodal_image() {
        let binary = ImagePreprocessor::new().binarize(&bimodal_image());

        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(63, 31)[0], 255);
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_binarize_is_deterministic() {
        let preprocessor = ImagePreprocessor::new();
        let image = bimodal_image();

        let first = preprocessor.binarize(&image);
        let second = preprocessor.binarize(&image);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_otsu_level_between_modes() {
        let gray = bimodal_image().to_luma8();
        let level = otsu_level(&gray);
        assert!(level >= 10 && level < 240, "level = {}", level);
    }
}
