use serde::{Serialize, Deserialize};

use crate::error::ImageError;
use crate::filters::{
    blur::BoxBlur, contour::Contour, flip::FlipHorizontal, rotate::Rotate,
    salt_pepper::SaltAndPepper, segment::Segment,
};
use crate::math::matrix::PixelMatrix;

/// A single-image transformation.
///
/// - `Blur { level }`   — box blur over a `level × level` window; shrinks the image.
/// - `Contour`          — horizontal edge magnitude; one column narrower.
/// - `Rotate`           — 90° clockwise; swaps height and width.
/// - `FlipHorizontal`   — mirror left to right.
/// - `SaltAndPepper`    — random white/black noise, 20% each.
/// - `Segment`          — binary threshold at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Blur { level: usize },
    Contour,
    Rotate,
    FlipHorizontal,
    SaltAndPepper,
    Segment,
}

impl Filter {
    pub fn apply(&self, matrix: &PixelMatrix) -> Result<PixelMatrix, ImageError> {
        match self {
            Filter::Blur { level }    => BoxBlur::apply(matrix, *level),
            Filter::Contour           => Contour::apply(matrix),
            Filter::Rotate            => Ok(Rotate::apply(matrix)),
            Filter::FlipHorizontal    => Ok(FlipHorizontal::apply(matrix)),
            Filter::SaltAndPepper     => Ok(SaltAndPepper::apply(matrix)),
            Filter::Segment           => Ok(Segment::apply(matrix)),
        }
    }

    /// Short lowercase name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Blur { .. }       => "blur",
            Filter::Contour           => "contour",
            Filter::Rotate            => "rotate",
            Filter::FlipHorizontal    => "flip horizontal",
            Filter::SaltAndPepper     => "salt and pepper",
            Filter::Segment           => "segment",
        }
    }
}
