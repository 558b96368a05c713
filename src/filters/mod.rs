pub mod blur;
pub mod concat;
pub mod contour;
pub mod filter;
pub mod flip;
pub mod rotate;
pub mod salt_pepper;
pub mod segment;

pub use blur::{BoxBlur, DEFAULT_BLUR_LEVEL};
pub use concat::{Concat, Direction};
pub use contour::Contour;
pub use filter::Filter;
pub use flip::FlipHorizontal;
pub use rotate::Rotate;
pub use salt_pepper::SaltAndPepper;
pub use segment::Segment;
