//! HSV color masking.
//!
//! Thresholds an RGB image in hue/saturation/value space to isolate the
//! colored class blocks from the lighter grid background. Pure function
//! of its inputs; fully-black or fully-white images simply produce an
//! all-false mask.

use crate::config::HsvBand;
use image::{GrayImage, Luma, RgbImage};

/// Convert an RGB pixel to HSV.
///
/// Returns (hue in degrees 0–360, saturation 0–1, value 0–1).
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r_n = r as f32 / 255.0;
    let g_n = g as f32 / 255.0;
    let b_n = b as f32 / 255.0;

    let max = r_n.max(g_n).max(b_n);
    let min = r_n.min(g_n).min(b_n);
    let delta = max - min;

    let h = if delta < 1e-6 {
        0.0
    } else if (max - r_n).abs() < 1e-6 {
        60.0 * (((g_n - b_n) / delta) % 6.0)
    } else if (max - g_n).abs() < 1e-6 {
        60.0 * (((b_n - r_n) / delta) + 2.0)
    } else {
        60.0 * (((r_n - g_n) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max < 1e-6 { 0.0 } else { delta / max };

    (h, s, max)
}

/// Binary mask of pixels falling inside the HSV band.
///
/// Mask-true pixels are 255, everything else 0, matching the convention
/// the downstream region labeling expects.
pub fn mask_band(img: &RgbImage, band: &HsvBand) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut mask = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        if band.contains(h, s, v) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }

    mask
}
