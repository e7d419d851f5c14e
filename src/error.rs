//! Error types for gifpress.

use thiserror::Error;

/// Errors that can occur while decoding, compressing or encoding an animation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A compression option is outside its documented range.
    #[error("invalid {name}: {value} (expected {min}..={max})")]
    InvalidOptions {
        /// Option name.
        name: &'static str,
        /// The rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// Image or buffer dimensions are zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// The invalid width.
        width: u32,
        /// The invalid height.
        height: u32,
    },

    /// Image dimensions exceed the supported maximum.
    #[error("image too large: {width}x{height} (max {max})")]
    ImageTooLarge {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
        /// Maximum supported dimension.
        max: u32,
    },

    /// A pixel buffer does not match its declared dimensions.
    #[error("invalid data length: expected {expected}, got {actual}")]
    InvalidDataLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// A frame breaks an invariant of the animation data model.
    #[error("invalid frame {index}: {reason}")]
    InvalidFrame {
        /// Index of the offending frame.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// The animation has no frames.
    #[error("animation has no frames")]
    NoFrames,

    /// The GIF container could not be parsed.
    #[error("failed to decode GIF: {0}")]
    Decode(#[from] gif::DecodingError),

    /// The GIF parsed, but its content cannot be represented.
    #[error("invalid GIF: {0}")]
    InvalidDecode(String),

    /// Writing the GIF container failed.
    #[error("failed to encode GIF: {0}")]
    Encode(#[from] gif::EncodingError),

    /// The animation holds a value GIF cannot store.
    #[error("cannot encode GIF: {0}")]
    InvalidEncode(String),
}

/// Result type alias using the crate's error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
