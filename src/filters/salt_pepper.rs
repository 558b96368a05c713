use rand::Rng;

use crate::math::matrix::PixelMatrix;

/// Draws below this turn the cell white.
pub const SALT_PROBABILITY: f64 = 0.2;
/// Draws above this turn the cell black.
pub const PEPPER_CUTOFF: f64 = 0.8;

pub struct SaltAndPepper;

impl SaltAndPepper {
    /// Perturbs each cell independently with one uniform draw `u` in [0, 1):
    /// `u < 0.2` sets 255, `u > 0.8` sets 0, anything else keeps the value.
    pub fn apply(matrix: &PixelMatrix) -> PixelMatrix {
        Self::apply_with(matrix, &mut rand::thread_rng())
    }

    /// Same as `apply` but draws from the caller's RNG, so a seeded source
    /// gives reproducible noise.
    pub fn apply_with<R: Rng + ?Sized>(matrix: &PixelMatrix, rng: &mut R) -> PixelMatrix {
        PixelMatrix::from_rows_unchecked(
            matrix.row_slices()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&x| {
                            let u: f64 = rng.gen();
                            if u < SALT_PROBABILITY {
                                255.0
                            } else if u > PEPPER_CUTOFF {
                                0.0
                            } else {
                                x
                            }
                        })
                        .collect()
                })
                .collect()
        )
    }
}
