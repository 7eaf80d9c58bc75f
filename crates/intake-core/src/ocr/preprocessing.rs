//! Page image normalization for OCR.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use tracing::debug;

use crate::error::OcrError;

/// Binomial approximation of a 5-tap Gaussian (sigma ~1.1), sums to 16.
const KERNEL_5: [u32; 5] = [1, 4, 6, 4, 1];

/// Turns a scanned page into a two-level image: luma conversion, 5x5
/// Gaussian smoothing, then Otsu binarization.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    /// Apply the blur before thresholding.
    denoise: bool,
}

impl ImageNormalizer {
    /// Create a new normalizer with default settings.
    pub fn new() -> Self {
        Self { denoise: true }
    }

    /// Enable or disable the smoothing pass.
    pub fn with_denoise(mut self, denoise: bool) -> Self {
        self.denoise = denoise;
        self
    }

    /// Normalize a page image. Output pixels are exactly 0 or 255.
    pub fn normalize(&self, image: &DynamicImage) -> Result<GrayImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "page image has no pixels ({}x{})",
                width, height
            )));
        }

        let gray = image.to_luma8();
        let smoothed = if self.denoise {
            gaussian_blur_5x5(&gray)
        } else {
            gray
        };

        let threshold = otsu_threshold(&smoothed);
        debug!("Normalizing {}x{} page, Otsu threshold {}", width, height, threshold);

        Ok(binarize(&smoothed, threshold))
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Separable 5x5 Gaussian blur with reflect-101 borders.
pub fn gaussian_blur_5x5(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let w = width as usize;
    let h = height as usize;
    let src = image.as_raw();

    // Horizontal pass, kept unnormalized (max 255 * 16).
    let mut horizontal = vec![0u32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0u32;
            for (k, weight) in KERNEL_5.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - 2, w);
                acc += weight * row[sx] as u32;
            }
            horizontal[y * w + x] = acc;
        }
    }

    // Vertical pass, then divide by 16 * 16 with rounding.
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u32;
            for (k, weight) in KERNEL_5.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - 2, h);
                acc += weight * horizontal[sy * w + x];
            }
            out[y * w + x] = ((acc + 128) >> 8) as u8;
        }
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| image.clone())
}

/// Otsu's method: the cut that maximizes between-class variance of the
/// image's own intensity histogram. Returns 0 when the histogram has a
/// single populated bin.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_variance = 0f64;
    let mut threshold = 0u8;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_sum - background_sum) / foreground_weight as f64;
        let diff = background_mean - foreground_mean;
        let variance = background_weight as f64 * foreground_weight as f64 * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            threshold = level as u8;
        }
    }

    threshold
}

/// Binary threshold: pixels strictly above `threshold` become 255, the rest 0.
pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        *pixel = Luma([if pixel[0] > threshold { 255 } else { 0 }]);
    }
    result
}

fn reflect_101(index: i64, len: usize) -> usize {
    let len = len as i64;
    if len == 1 {
        return 0;
    }
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn bimodal(dark: u8, light: u8) -> GrayImage {
        GrayImage::from_fn(40, 20, |x, _| Luma([if x < 20 { dark } else { light }]))
    }

    #[test]
    fn test_otsu_bimodal() {
        let threshold = otsu_threshold(&bimodal(30, 220));
        assert!(threshold >= 30 && threshold < 220, "threshold {}", threshold);
    }

    #[test]
    fn test_otsu_uniform() {
        let uniform = GrayImage::from_pixel(8, 8, Luma([200]));
        assert_eq!(otsu_threshold(&uniform), 0);
    }

    #[test]
    fn test_binarize() {
        let image = bimodal(30, 220);
        let binary = binarize(&image, 100);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(39, 0)[0], 255);
    }

    #[test]
    fn test_blur_preserves_uniform_image() {
        let uniform = GrayImage::from_pixel(7, 5, Luma([123]));
        assert_eq!(gaussian_blur_5x5(&uniform), uniform);
    }

    #[test]
    fn test_blur_smooths_isolated_speck() {
        let mut image = GrayImage::from_pixel(9, 9, Luma([255]));
        image.put_pixel(4, 4, Luma([0]));

        let blurred = gaussian_blur_5x5(&image);
        // Center weight is 36/256 of the speck.
        assert_eq!(blurred.get_pixel(4, 4)[0], 219);
        assert!(blurred.get_pixel(3, 4)[0] > 219);
        assert_eq!(blurred.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 1), 0);
        assert_eq!(reflect_101(-2, 2), 0);
    }

    #[test]
    fn test_normalize_color_page_is_two_level() {
        let page = RgbImage::from_fn(60, 30, |x, y| {
            if (10..50).contains(&x) && (12..18).contains(&y) {
                Rgb([20, 20, 40])
            } else {
                Rgb([240, 235, 230])
            }
        });

        let normalized = ImageNormalizer::new()
            .normalize(&DynamicImage::ImageRgb8(page))
            .unwrap();

        assert!(normalized.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(normalized.get_pixel(30, 15)[0], 0);
        assert_eq!(normalized.get_pixel(2, 2)[0], 255);
    }

    #[test]
    fn test_normalize_rejects_empty_image() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        assert!(matches!(
            ImageNormalizer::new().normalize(&empty),
            Err(OcrError::InvalidImage(_))
        ));
    }
}
