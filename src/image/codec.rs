/// Codec adapter between encoded image bytes and the grayscale engine.
///
/// Decoding accepts whatever the enabled `image` features read
/// (PNG/JPEG/BMP/GIF) and always yields 8-bit RGB. Encoding writes a single
/// channel 8-bit image.
use std::io::Cursor;
use std::path::Path;

use ::image::{GrayImage, ImageFormat, ImageOutputFormat, Luma};
use serde::{Serialize, Deserialize};

use crate::error::ImageError;
use crate::image::grayscale::RgbGrid;
use crate::math::matrix::PixelMatrix;

/// How fractional intensities become 8-bit pixels.
///
/// - `Stretch` — map the current min..max linearly onto 0..255, the way a
///   gray colormap auto-scales. Contour maps, whose values sit near zero,
///   stay visible. A flat image has no range to stretch and falls back to
///   `Clamp`.
/// - `Clamp`   — round to the nearest integer and clamp to [0, 255], keeping
///   absolute intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantize {
    Clamp,
    #[default]
    Stretch,
}

pub fn decode_rgb(bytes: &[u8]) -> Result<RgbGrid, ImageError> {
    let img = ::image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::Decode("image has no pixels".into()));
    }
    Ok(rgb.rows()
        .map(|row| row.map(|p| p.0).collect())
        .collect())
}

/// Quantizes the matrix to an 8-bit grayscale buffer.
pub fn to_gray_image(matrix: &PixelMatrix, quantize: Quantize) -> GrayImage {
    let (lo, hi) = matrix.values().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    let stretch = quantize == Quantize::Stretch && hi > lo;

    let (height, width) = matrix.shape();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        let v = matrix.get(y as usize, x as usize);
        let v = if stretch { (v - lo) * 255.0 / (hi - lo) } else { v };
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// Output format for a destination path: PNG, JPEG and BMP follow the
/// extension, anything else is written as PNG.
pub fn format_for_path(path: &Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp)) => format,
        _ => ImageFormat::Png,
    }
}

pub fn encode(matrix: &PixelMatrix, quantize: Quantize, format: ImageFormat) -> Result<Vec<u8>, ImageError> {
    let gray = to_gray_image(matrix, quantize);
    let mut out = Cursor::new(Vec::new());
    ::image::DynamicImage::ImageLuma8(gray)
        .write_to(&mut out, ImageOutputFormat::from(format))
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

pub fn encode_png(matrix: &PixelMatrix, quantize: Quantize) -> Result<Vec<u8>, ImageError> {
    encode(matrix, quantize, ImageFormat::Png)
}
