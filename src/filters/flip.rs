use crate::math::matrix::PixelMatrix;

pub struct FlipHorizontal;

impl FlipHorizontal {
    /// Mirrors the image left to right.
    pub fn apply(matrix: &PixelMatrix) -> PixelMatrix {
        PixelMatrix::from_rows_unchecked(
            matrix.row_slices()
                .iter()
                .map(|row| row.iter().rev().copied().collect())
                .collect()
        )
    }
}
