use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::ImageError;
use crate::filters::{
    Concat, Direction, Filter, FlipHorizontal, Rotate, SaltAndPepper, Segment, DEFAULT_BLUR_LEVEL,
};
use crate::image::grayscale::rgb_to_gray;
use crate::math::matrix::PixelMatrix;

/// A grayscale image together with the path it was loaded from.
///
/// Transformations consume the image and hand back a new one, so a chain of
/// filters reads as `img.rotate().rotate()` and a failed step leaves nothing
/// half-modified behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    source: PathBuf,
    matrix: PixelMatrix,
}

impl Image {
    /// Builds an image from decoded RGB pixels. This is the only place color
    /// is read; everything downstream is single-channel.
    pub fn from_rgb(source: impl Into<PathBuf>, rgb: &[Vec<[u8; 3]>]) -> Result<Image, ImageError> {
        Ok(Image {
            source: source.into(),
            matrix: rgb_to_gray(rgb)?,
        })
    }

    pub fn from_matrix(source: impl Into<PathBuf>, matrix: PixelMatrix) -> Image {
        Image { source: source.into(), matrix }
    }

    pub fn apply(self, filter: Filter) -> Result<Image, ImageError> {
        let matrix = filter.apply(&self.matrix)?;
        log::debug!(
            "{}: {:?} -> {:?}", filter.name(), self.matrix.shape(), matrix.shape()
        );
        Ok(self.with_matrix(matrix))
    }

    /// Applies `filters` in order, stopping at the first failure.
    pub fn apply_all(self, filters: &[Filter]) -> Result<Image, ImageError> {
        filters.iter().try_fold(self, |img, filter| img.apply(*filter))
    }

    pub fn blur(self, level: usize) -> Result<Image, ImageError> {
        self.apply(Filter::Blur { level })
    }

    pub fn blur_default(self) -> Result<Image, ImageError> {
        self.blur(DEFAULT_BLUR_LEVEL)
    }

    pub fn contour(self) -> Result<Image, ImageError> {
        self.apply(Filter::Contour)
    }

    pub fn rotate(self) -> Image {
        let matrix = Rotate::apply(&self.matrix);
        self.with_matrix(matrix)
    }

    pub fn flip_horizontal(self) -> Image {
        let matrix = FlipHorizontal::apply(&self.matrix);
        self.with_matrix(matrix)
    }

    pub fn salt_and_pepper(self) -> Image {
        self.salt_and_pepper_with(&mut rand::thread_rng())
    }

    pub fn salt_and_pepper_with<R: Rng + ?Sized>(self, rng: &mut R) -> Image {
        let matrix = SaltAndPepper::apply_with(&self.matrix, rng);
        self.with_matrix(matrix)
    }

    pub fn segment(self) -> Image {
        let matrix = Segment::apply(&self.matrix);
        self.with_matrix(matrix)
    }

    /// Joins `other` after this image (to the right, or below for
    /// `Direction::Vertical`). The result keeps this image's source path.
    pub fn concat(self, other: &Image, direction: Direction) -> Result<Image, ImageError> {
        let matrix = Concat::apply(&self.matrix, &other.matrix, direction)?;
        Ok(self.with_matrix(matrix))
    }

    fn with_matrix(self, matrix: PixelMatrix) -> Image {
        Image { source: self.source, matrix }
    }

    /// Current pixels, for encoding. Reading never changes the image.
    pub fn matrix(&self) -> &PixelMatrix {
        &self.matrix
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// `<dir>/<stem>_filtered.<ext>` next to the source file.
    pub fn filtered_path(&self) -> PathBuf {
        let stem = self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.source.extension() {
            Some(ext) => format!("{}_filtered.{}", stem, ext.to_string_lossy()),
            None => format!("{}_filtered", stem),
        };
        self.source.with_file_name(name)
    }
}
