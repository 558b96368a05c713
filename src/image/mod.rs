pub mod codec;
pub mod grayscale;
pub mod img;

pub use codec::{decode_rgb, encode, encode_png, Quantize};
pub use grayscale::{rgb_to_gray, RgbGrid};
pub use img::Image;
