pub mod math;
pub mod error;
pub mod filters;
pub mod image;
pub mod dispatch;
pub mod config;

// Convenience re-exports
pub use math::matrix::PixelMatrix;
pub use error::{DispatchError, ImageError};
pub use filters::{Direction, Filter};
pub use self::image::img::Image;
pub use self::image::codec::Quantize;
pub use dispatch::{BotMode, Dispatcher, Message, Outcome, Transport};
pub use config::BotConfig;
