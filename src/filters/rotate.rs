use crate::math::matrix::PixelMatrix;

pub struct Rotate;

impl Rotate {
    /// Quarter turn clockwise: reverse the row order, then transpose.
    /// Row `k` of the result is column `k` of the input read bottom-to-top.
    pub fn apply(matrix: &PixelMatrix) -> PixelMatrix {
        let reversed: Vec<Vec<f64>> = matrix.row_slices().iter().rev().cloned().collect();
        PixelMatrix::from_rows_unchecked(reversed).transpose()
    }
}
