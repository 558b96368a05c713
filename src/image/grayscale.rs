use crate::error::ImageError;
use crate::math::matrix::PixelMatrix;

/// Decoded 8-bit RGB pixels, row-major.
pub type RgbGrid = Vec<Vec<[u8; 3]>>;

pub const RED_WEIGHT: f64 = 0.2989;
pub const GREEN_WEIGHT: f64 = 0.5870;
pub const BLUE_WEIGHT: f64 = 0.1140;

/// Luma of one pixel. The weights sum to 0.9999, so white maps to 254.9985.
pub fn luma([r, g, b]: [u8; 3]) -> f64 {
    RED_WEIGHT * r as f64 + GREEN_WEIGHT * g as f64 + BLUE_WEIGHT * b as f64
}

/// Reduces an RGB grid to a single-channel matrix. Fails on empty or ragged
/// input.
pub fn rgb_to_gray(rgb: &[Vec<[u8; 3]>]) -> Result<PixelMatrix, ImageError> {
    PixelMatrix::from_rows(
        rgb.iter()
            .map(|row| row.iter().map(|&px| luma(px)).collect())
            .collect()
    )
}
