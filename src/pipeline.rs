//! The compression pipeline.
//!
//! Stages run in a fixed order, each taking the animation by value and
//! returning a new one:
//!
//! 1. frame skip (only when `frame_skip > 0` and there is more than one frame)
//! 2. resize (only when `resize_percent < 100`)
//! 3. palette quantization (always)
//! 4. delta optimization (only when `optimize_frames` and there is more than
//!    one frame)

use std::time::Instant;

use log::debug;

use crate::codec;
use crate::error::Result;
use crate::frame::AnimatedImage;
use crate::optimize::optimize_frames;
use crate::options::{CompressionOptions, MAX_RESIZE_PERCENT};
use crate::quantize::quantize_animation;
use crate::resize::resize_animation;
use crate::skip::skip_frames;

/// Compress an animation.
///
/// # Errors
///
/// Returns [`Error::InvalidOptions`](crate::Error::InvalidOptions) when an
/// option is out of range and [`Error::InvalidFrame`](crate::Error::InvalidFrame),
/// [`Error::NoFrames`](crate::Error::NoFrames) or a dimension error when the
/// input animation is malformed. The stages themselves cannot fail.
///
/// # Example
///
/// ```rust
/// use gifpress::{compress, AnimatedImage, CompressionOptions, Frame, Rect};
///
/// let frame = Frame::new(Rect::new(0, 0, 2, 2), vec![[255, 0, 0, 255]], vec![0; 4]);
/// let image = AnimatedImage::new(2, 2)
///     .with_frame(frame.clone().with_delay(10))
///     .with_frame(frame.with_delay(10));
///
/// let options = CompressionOptions::builder().optimize_frames(true).build();
/// let out = compress(image, &options).unwrap();
/// assert_eq!(out.frames[1].rect, Rect::new(0, 0, 1, 1));
/// ```
pub fn compress(image: AnimatedImage, options: &CompressionOptions) -> Result<AnimatedImage> {
    options.validate()?;
    image.validate()?;

    let start = Instant::now();
    let input_frames = image.frame_count();
    debug!(
        "compress {}x{}, {input_frames} frames, {options:?}",
        image.width, image.height
    );

    let mut image = image;
    if options.frame_skip > 0 && image.frame_count() > 1 {
        image = skip_frames(image, options.frame_skip);
    }
    if options.resize_percent < MAX_RESIZE_PERCENT {
        image = resize_animation(image, options.resize_percent, options.resize_algorithm)?;
    }
    image = quantize_animation(image, options.color_count, options.lossy_level);
    if options.optimize_frames && image.frame_count() > 1 {
        image = optimize_frames(image);
    }

    debug!(
        "compressed to {}x{}, {} frames in {:.2?}",
        image.width,
        image.height,
        image.frame_count(),
        start.elapsed()
    );
    Ok(image)
}

/// Decode GIF bytes, compress, and encode the result.
///
/// # Errors
///
/// Any decode, option, or encode error.
pub fn compress_gif(data: &[u8], options: &CompressionOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_gif_into(&mut output, data, options)?;
    Ok(output)
}

/// Decode GIF bytes, compress, and encode into a caller-provided buffer.
///
/// The `output` buffer will be cleared and reused.
pub fn compress_gif_into(
    output: &mut Vec<u8>,
    data: &[u8],
    options: &CompressionOptions,
) -> Result<()> {
    // Fail on bad options before spending time decoding.
    options.validate()?;
    let image = codec::decode(data)?;
    let image = compress(image, options)?;
    codec::encode_into(output, &image)
}
