use crate::error::ImageError;
use crate::math::matrix::PixelMatrix;

/// Window side used when a caption asks for a blur without a level.
pub const DEFAULT_BLUR_LEVEL: usize = 16;

pub struct BoxBlur;

impl BoxBlur {
    /// Averages every `level × level` window that fits fully inside the
    /// matrix. Border cells that cannot host a whole window are dropped, so the
    /// result is `(rows - level + 1) × (cols - level + 1)`.
    ///
    /// Each output cell is `floor(window_sum / level²)`.
    pub fn apply(matrix: &PixelMatrix, level: usize) -> Result<PixelMatrix, ImageError> {
        let (height, width) = matrix.shape();
        if level == 0 || level > height || level > width {
            return Err(ImageError::InvalidParameter(format!(
                "blur level {} does not fit a {}x{} image", level, height, width
            )));
        }

        let filter_sum = (level * level) as f64;
        let data = matrix.row_slices();

        // Column sums over the current vertical band keep each step O(level).
        let mut result = Vec::with_capacity(height - level + 1);
        for i in 0..=height - level {
            let band: Vec<f64> = (0..width)
                .map(|j| data[i..i + level].iter().map(|row| row[j]).sum())
                .collect();

            let row_result = (0..=width - level)
                .map(|j| {
                    let sum: f64 = band[j..j + level].iter().sum();
                    (sum / filter_sum).floor()
                })
                .collect();
            result.push(row_result);
        }

        PixelMatrix::from_rows(result)
    }
}
