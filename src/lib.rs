//! # gifpress
//!
//! Animated GIF recompression. A decoded animation runs through four stages,
//! always in this order:
//!
//! - **Frame skip**: drop frames, folding their delays into the kept ones so
//!   the total playback time is unchanged.
//! - **Resize**: scale the canvas and every frame (Catmull-Rom by default),
//!   then dither back onto each frame's palette.
//! - **Palette quantization**: rebuild each frame's palette from its most
//!   frequent colors and re-render with or without Floyd–Steinberg dithering.
//! - **Delta optimization**: crop each frame to the region that actually
//!   changes the displayed image.
//!
//! The [`codec`] module converts between GIF bytes and [`AnimatedImage`].
//!
//! ## Quickstart
//!
//! ```rust
//! use gifpress::{codec, compress, AnimatedImage, CompressionOptions, Frame, Preset, Rect};
//!
//! # fn main() -> gifpress::Result<()> {
//! // Two 8x8 frames: a red square, then the same square with one blue pixel.
//! let palette = vec![[255, 0, 0, 255], [0, 0, 255, 255]];
//! let first = Frame::new(Rect::new(0, 0, 8, 8), palette.clone(), vec![0; 64]).with_delay(10);
//! let mut second = first.clone();
//! second.pixels[9] = 1;
//!
//! let image = AnimatedImage::new(8, 8).with_frame(first).with_frame(second);
//! let options = CompressionOptions::builder()
//!     .preset(Preset::Light)
//!     .resize_percent(100)
//!     .build();
//!
//! let small = compress(image, &options)?;
//! assert_eq!(small.frames[1].rect, Rect::new(1, 1, 1, 1));
//!
//! let bytes = codec::encode(&small)?;
//! assert!(codec::is_gif(&bytes));
//! # Ok(())
//! # }
//! ```
//!
//! ### Bytes in, bytes out
//!
//! ```rust
//! use gifpress::{codec, compress_gif, AnimatedImage, CompressionOptions, Frame, Rect};
//!
//! # fn main() -> gifpress::Result<()> {
//! let frame = Frame::new(Rect::new(0, 0, 4, 4), vec![[0, 0, 0, 255]], vec![0; 16]);
//! let input = codec::encode(&AnimatedImage::new(4, 4).with_frame(frame))?;
//!
//! let options = CompressionOptions::builder().color_count(16).build();
//! let output = compress_gif(&input, &options)?;
//! assert_eq!(codec::decode(&output)?.frames.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//! - `cli`: the `gifpress` command-line tool.
//! - `parallel`: let the command-line tool process several files concurrently
//!   via rayon. The library itself is always single-threaded per call.
//!
//! ## Logging
//! The library logs through the [`log`](https://docs.rs/log) facade (`debug`
//! per stage, `trace` per frame) and never installs a logger.

#![forbid(unsafe_code)]

pub mod canvas;
pub mod codec;
pub mod color;
pub mod dither;
pub mod error;
pub mod frame;
pub mod optimize;
pub mod options;
pub mod pipeline;
pub mod quantize;
pub mod resize;
pub mod skip;

pub use canvas::Canvas;
pub use color::Rgba;
pub use error::{Error, Result};
pub use frame::{AnimatedImage, DisposalMethod, Frame, LoopCount, Rect};
pub use options::{CompressionOptions, CompressionOptionsBuilder, Preset};
pub use pipeline::{compress, compress_gif, compress_gif_into};
pub use resize::ResizeAlgorithm;
