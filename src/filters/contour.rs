use crate::error::ImageError;
use crate::math::matrix::PixelMatrix;

pub struct Contour;

impl Contour {
    /// Horizontal edge response: `|row[j] - row[j-1]|` for every `j >= 1`.
    /// Height is kept, width shrinks by one.
    pub fn apply(matrix: &PixelMatrix) -> Result<PixelMatrix, ImageError> {
        if matrix.cols() < 2 {
            return Err(ImageError::InvalidParameter(format!(
                "contour needs at least 2 columns, image has {}", matrix.cols()
            )));
        }
        matrix.map_rows(|row| row.windows(2).map(|w| (w[1] - w[0]).abs()).collect())
    }
}
