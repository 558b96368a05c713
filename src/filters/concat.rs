use serde::{Serialize, Deserialize};

use crate::error::ImageError;
use crate::math::matrix::PixelMatrix;

/// How two images are joined.
///
/// - `Horizontal` — side by side; heights must match.
/// - `Vertical`   — stacked, `left` on top; widths must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

pub struct Concat;

impl Concat {
    pub fn apply(
        left: &PixelMatrix,
        right: &PixelMatrix,
        direction: Direction,
    ) -> Result<PixelMatrix, ImageError> {
        match direction {
            Direction::Horizontal => {
                if left.rows() != right.rows() {
                    return Err(ImageError::DimensionMismatch {
                        axis: "height",
                        left: left.rows(),
                        right: right.rows(),
                    });
                }
                Ok(PixelMatrix::from_rows_unchecked(
                    left.row_slices()
                        .iter()
                        .zip(right.row_slices())
                        .map(|(l, r)| l.iter().chain(r.iter()).copied().collect())
                        .collect()
                ))
            }
            Direction::Vertical => {
                if left.cols() != right.cols() {
                    return Err(ImageError::DimensionMismatch {
                        axis: "width",
                        left: left.cols(),
                        right: right.cols(),
                    });
                }
                Ok(PixelMatrix::from_rows_unchecked(
                    left.row_slices()
                        .iter()
                        .chain(right.row_slices())
                        .cloned()
                        .collect()
                ))
            }
        }
    }
}
