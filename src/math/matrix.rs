use serde::{Serialize, Deserialize};

use crate::error::ImageError;

/// A rectangular grid of grayscale intensities.
///
/// Values live in [0, 255] but may be fractional until the grid is encoded.
/// Every constructor guarantees at least one row, at least one column, and
/// equal-length rows; every filter returns a new matrix holding the same
/// guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PixelMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl PixelMatrix {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<PixelMatrix, ImageError> {
        if rows == 0 || cols == 0 {
            return Err(ImageError::Decode(format!(
                "matrix must be at least 1x1, got {}x{}", rows, cols
            )));
        }
        Ok(PixelMatrix {
            rows,
            cols,
            data: vec![vec![value; cols]; rows],
        })
    }

    /// Builds a matrix from raw rows, rejecting empty or ragged input.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<PixelMatrix, ImageError> {
        let rows = data.len();
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(ImageError::Decode("pixel grid is empty".into()));
        }
        if let Some(i) = data.iter().position(|row| row.len() != cols) {
            return Err(ImageError::Decode(format!(
                "pixel grid is not rectangular: row {} has {} values, expected {}",
                i, data[i].len(), cols
            )));
        }
        Ok(PixelMatrix { rows, cols, data })
    }

    /// Wraps rows whose shape the caller already guarantees.
    pub(crate) fn from_rows_unchecked(data: Vec<Vec<f64>>) -> PixelMatrix {
        let rows = data.len();
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        debug_assert!(rows > 0 && cols > 0);
        debug_assert!(data.iter().all(|row| row.len() == cols));
        PixelMatrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn row_slices(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.data
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }

    pub fn transpose(&self) -> PixelMatrix {
        let mut data = vec![vec![0.0; self.rows]; self.cols];

        for i in 0..self.cols {
            for j in 0..self.rows {
                data[i][j] = self.data[j][i];
            }
        }

        PixelMatrix { rows: self.cols, cols: self.rows, data }
    }

    /// Applies `functor` to every cell, keeping the shape.
    pub fn map<F>(&self, functor: F) -> PixelMatrix
    where
        F: Fn(f64) -> f64,
    {
        PixelMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Replaces every row with `functor(row)`. The caller must return rows of
    /// one common, non-zero length.
    pub(crate) fn map_rows<F>(&self, functor: F) -> Result<PixelMatrix, ImageError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        PixelMatrix::from_rows(self.data.iter().map(|row| functor(row)).collect())
    }
}

impl TryFrom<Vec<Vec<f64>>> for PixelMatrix {
    type Error = ImageError;

    fn try_from(data: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        PixelMatrix::from_rows(data)
    }
}

impl From<PixelMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PixelMatrix) -> Self {
        matrix.data
    }
}
