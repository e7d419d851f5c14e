//! GIF container boundary.
//!
//! Conversion between GIF bytes and [`AnimatedImage`](crate::AnimatedImage),
//! built on the `gif` crate. The pipeline itself never sees bytes.

mod decode;
mod encode;

pub use decode::{decode, decode_from};
pub use encode::{encode, encode_into};

/// Returns true if `data` starts with a GIF87a or GIF89a signature.
pub fn is_gif(data: &[u8]) -> bool {
    data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a")
}
