use thiserror::Error;

/// Failures raised by the transformation engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Malformed, empty or non-rectangular pixel input.
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    /// A filter parameter does not fit the current matrix dimensions.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("dimension mismatch: {axis} differs ({left} vs {right})")]
    DimensionMismatch {
        axis: &'static str,
        left: usize,
        right: usize,
    },
}

/// Failures raised while handling one inbound message.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}
