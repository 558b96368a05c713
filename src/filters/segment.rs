use crate::math::matrix::PixelMatrix;

/// Cells strictly above this value turn white.
pub const SEGMENT_THRESHOLD: f64 = 100.0;

pub struct Segment;

impl Segment {
    /// Binary threshold: 255 above `SEGMENT_THRESHOLD`, 0 otherwise.
    pub fn apply(matrix: &PixelMatrix) -> PixelMatrix {
        matrix.map(|x| if x > SEGMENT_THRESHOLD { 255.0 } else { 0.0 })
    }
}
