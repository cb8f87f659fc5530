use image::RgbaImage;
use rayon::prelude::*;

use super::{StegoError, PIXEL_STRIDE};

/// Peak value of an 8-bit channel.
const MAX_SAMPLE: f64 = 255.0;

/// Distortion between two images of identical geometry, over RGB only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageComparisonResult {
    /// Mean squared error per channel sample.
    pub mse: f64,
    /// Peak signal-to-noise ratio in dB; `f64::INFINITY` for identical images.
    pub psnr: f64,
    /// Largest absolute difference seen in any single channel sample.
    pub max_difference: u8,
}

/// Compare two same-size images. Alpha is ignored.
pub fn compare_images(left: &RgbaImage, right: &RgbaImage) -> Result<ImageComparisonResult, StegoError> {
    if left.dimensions() != right.dimensions() {
        return Err(StegoError::DimensionMismatch {
            left_width: left.width(),
            left_height: left.height(),
            right_width: right.width(),
            right_height: right.height(),
        });
    }

    let (squared_sum, max_difference) = left
        .as_raw()
        .par_chunks_exact(PIXEL_STRIDE)
        .zip(right.as_raw().par_chunks_exact(PIXEL_STRIDE))
        .map(|(a, b)| {
            let mut sum = 0u64;
            let mut max = 0u8;
            for c in 0..3 {
                let diff = a[c].abs_diff(b[c]);
                sum += diff as u64 * diff as u64;
                max = max.max(diff);
            }
            (sum, max)
        })
        .reduce(|| (0, 0), |(s1, m1), (s2, m2)| (s1 + s2, m1.max(m2)));

    let samples = left.width() as u64 * left.height() as u64 * 3;
    let mse = if samples == 0 {
        0.0
    } else {
        squared_sum as f64 / samples as f64
    };

    Ok(ImageComparisonResult {
        mse,
        psnr: psnr(mse),
        max_difference,
    })
}

fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (MAX_SAMPLE / mse.sqrt()).log10()
    }
}
