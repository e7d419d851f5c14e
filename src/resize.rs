//! Image resizing.
//!
//! [`resize_animation`] scales a whole [`AnimatedImage`] uniformly. The
//! canvas and every frame rectangle are scaled, each frame is expanded to
//! truecolor, pushed through [`resize_into`] with one shared scratch buffer,
//! and mapped back onto its own palette with Floyd–Steinberg dithering.
//!
//! Available algorithms:
//! - **Nearest neighbor**: fastest, pixelated results (good for pixel art)
//! - **Bilinear**: triangle filter, smooth results
//! - **Catmull-Rom**: bicubic filter, sharp and smooth (the default)
//! - **Lanczos3**: windowed sinc, sharpest, slowest
//!
//! Filtering is done on premultiplied alpha so the color of fully
//! transparent pixels never bleeds into visible ones.
//!
//! # Example
//!
//! ```rust
//! use gifpress::resize::{resize, ResizeAlgorithm};
//!
//! // One 100x100 RGBA frame down to 50x50 with Catmull-Rom.
//! let pixels = vec![128u8; 100 * 100 * 4];
//! let resized = resize(&pixels, 100, 100, 50, 50, ResizeAlgorithm::CatmullRom).unwrap();
//! assert_eq!(resized.len(), 50 * 50 * 4);
//! ```

use std::f32::consts::PI;

use log::{debug, trace};

use crate::dither::{self, Dither};
use crate::error::{Error, Result};
use crate::frame::{AnimatedImage, Frame, Rect, MAX_DIMENSION};

const BYTES_PER_PIXEL: usize = 4;

/// Resizing algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeAlgorithm {
    /// Nearest neighbor: fastest, pixelated results.
    /// Best for pixel art or when speed is critical.
    Nearest,
    /// Bilinear interpolation: fast with smooth results.
    Bilinear,
    /// Catmull-Rom bicubic interpolation: smooth gradients with crisp edges.
    /// Good balance between quality and speed.
    #[default]
    CatmullRom,
    /// Lanczos3 resampling: highest quality, slowest.
    /// Best for photographic content.
    Lanczos3,
}

/// Resample one RGBA8 frame buffer to `dst_width` x `dst_height`.
///
/// # Errors
///
/// See [`resize_into`].
pub fn resize(
    data: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
    algorithm: ResizeAlgorithm,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    resize_into(&mut output, data, src_width, src_height, dst_width, dst_height, algorithm)?;
    Ok(output)
}

/// Resample one RGBA8 frame buffer into `output`, which is cleared first and
/// keeps its allocation between calls.
///
/// # Errors
///
/// - [`Error::InvalidDimensions`] if either size has a zero side.
/// - [`Error::ImageTooLarge`] if a side exceeds the GIF limit of 65535.
/// - [`Error::InvalidDataLength`] if `data` is not `src_width * src_height * 4` bytes.
pub fn resize_into(
    output: &mut Vec<u8>,
    data: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
    algorithm: ResizeAlgorithm,
) -> Result<()> {
    let expected = rgba_len(src_width, src_height)?;
    if data.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }
    let len = rgba_len(dst_width, dst_height)?;

    output.clear();
    output.resize(len, 0);
    resample(
        output,
        data,
        src_width as usize,
        src_height as usize,
        dst_width as usize,
        dst_height as usize,
        algorithm,
    );
    Ok(())
}

/// Byte length of a `width` x `height` RGBA8 buffer.
fn rgba_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let too_large = Error::ImageTooLarge {
        width,
        height,
        max: MAX_DIMENSION,
    };
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(too_large);
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(too_large)
}

/// Scale every frame of `image` to `percent` of its size.
///
/// The canvas becomes `round(width * percent / 100)` by
/// `round(height * percent / 100)`, never smaller than 1x1. Frame offsets
/// and sizes are scaled the same way and clamped so every frame stays on the
/// canvas. Palettes are left untouched: resampled pixels are dithered back
/// onto each frame's own palette.
///
/// `percent == 0` and `percent >= 100` return the image unchanged.
///
/// # Errors
///
/// Fails like [`resize_into`] when a frame's pixel data does not match its
/// rectangle.
pub fn resize_animation(
    image: AnimatedImage,
    percent: u8,
    algorithm: ResizeAlgorithm,
) -> Result<AnimatedImage> {
    if percent == 0 || percent >= 100 {
        return Ok(image);
    }

    let scale = f64::from(percent) / 100.0;
    let width = scale_length(image.width, scale);
    let height = scale_length(image.height, scale);
    debug!(
        "resize {percent}%: {}x{} -> {width}x{height} ({algorithm:?})",
        image.width, image.height
    );

    let mut scratch = Vec::new();
    let frames = image
        .frames
        .into_iter()
        .map(|frame| resize_frame(frame, scale, (width, height), algorithm, &mut scratch))
        .collect::<Result<Vec<_>>>()?;

    Ok(AnimatedImage {
        width,
        height,
        frames,
        ..image
    })
}

fn resize_frame(
    frame: Frame,
    scale: f64,
    (canvas_width, canvas_height): (u32, u32),
    algorithm: ResizeAlgorithm,
    scratch: &mut Vec<u8>,
) -> Result<Frame> {
    let src = frame.rect;
    let rect = scale_rect(src, scale, canvas_width, canvas_height);
    trace!(
        "frame {}x{}@({},{}) -> {}x{}@({},{})",
        src.width,
        src.height,
        src.x,
        src.y,
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );

    resize_into(
        scratch,
        &frame.to_rgba(),
        src.width,
        src.height,
        rect.width,
        rect.height,
        algorithm,
    )?;
    let pixels = dither::remap(
        scratch.as_slice(),
        rect.width,
        rect.height,
        &frame.palette,
        Dither::FloydSteinberg,
    );

    Ok(Frame {
        rect,
        pixels,
        ..frame
    })
}

#[inline]
fn scale_length(value: u32, scale: f64) -> u32 {
    ((f64::from(value) * scale).round() as u32).max(1)
}

/// Scale a frame rectangle and pull it back inside the scaled canvas.
fn scale_rect(rect: Rect, scale: f64, canvas_width: u32, canvas_height: u32) -> Rect {
    let width = scale_length(rect.width, scale).min(canvas_width);
    let height = scale_length(rect.height, scale).min(canvas_height);
    let x = ((f64::from(rect.x) * scale).round() as u32).min(canvas_width - width);
    let y = ((f64::from(rect.y) * scale).round() as u32).min(canvas_height - height);
    Rect::new(x, y, width, height)
}

/// Resample RGBA8 `data` into `output`. Dimensions must be non-zero and
/// `output` must hold `dst_width * dst_height * 4` bytes.
fn resample(
    output: &mut [u8],
    data: &[u8],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    algorithm: ResizeAlgorithm,
) {
    if src_width == dst_width && src_height == dst_height {
        output.copy_from_slice(data);
        return;
    }

    let (kernel, support): (fn(f32) -> f32, f32) = match algorithm {
        ResizeAlgorithm::Nearest => {
            resize_nearest(output, data, src_width, src_height, dst_width, dst_height);
            return;
        }
        ResizeAlgorithm::Bilinear => (triangle_kernel, 1.0),
        ResizeAlgorithm::CatmullRom => (catmull_rom_kernel, 2.0),
        ResizeAlgorithm::Lanczos3 => (lanczos3_kernel, 3.0),
    };

    let premultiplied = premultiply(data);
    let columns = contributions(src_width, dst_width, kernel, support);
    let rows = contributions(src_height, dst_height, kernel, support);

    // Horizontal pass: src_width x src_height -> dst_width x src_height.
    let mut horizontal = vec![0f32; dst_width * src_height * BYTES_PER_PIXEL];
    for y in 0..src_height {
        let src_row = &premultiplied[y * src_width * BYTES_PER_PIXEL..];
        let dst_row = &mut horizontal[y * dst_width * BYTES_PER_PIXEL..];
        for (x, contrib) in columns.iter().enumerate() {
            let mut acc = [0f32; 4];
            for (k, &w) in contrib.weights.iter().enumerate() {
                let s = (contrib.start + k) * BYTES_PER_PIXEL;
                for c in 0..4 {
                    acc[c] += src_row[s + c] * w;
                }
            }
            dst_row[x * BYTES_PER_PIXEL..x * BYTES_PER_PIXEL + 4].copy_from_slice(&acc);
        }
    }

    // Vertical pass: dst_width x src_height -> dst_width x dst_height.
    let stride = dst_width * BYTES_PER_PIXEL;
    for (y, contrib) in rows.iter().enumerate() {
        for x in 0..dst_width {
            let mut acc = [0f32; 4];
            for (k, &w) in contrib.weights.iter().enumerate() {
                let s = (contrib.start + k) * stride + x * BYTES_PER_PIXEL;
                for c in 0..4 {
                    acc[c] += horizontal[s + c] * w;
                }
            }
            let d = y * stride + x * BYTES_PER_PIXEL;
            output[d..d + 4].copy_from_slice(&unpremultiply(acc));
        }
    }
}

/// Nearest neighbor resizing - fastest, pixelated results.
fn resize_nearest(
    output: &mut [u8],
    data: &[u8],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) {
    let x_ratio = src_width as f32 / dst_width as f32;
    let y_ratio = src_height as f32 / dst_height as f32;

    for dst_y in 0..dst_height {
        let src_y = ((dst_y as f32 + 0.5) * y_ratio - 0.5)
            .round()
            .clamp(0.0, (src_height - 1) as f32) as usize;

        for dst_x in 0..dst_width {
            let src_x = ((dst_x as f32 + 0.5) * x_ratio - 0.5)
                .round()
                .clamp(0.0, (src_width - 1) as f32) as usize;

            let src_idx = (src_y * src_width + src_x) * BYTES_PER_PIXEL;
            let dst_idx = (dst_y * dst_width + dst_x) * BYTES_PER_PIXEL;

            output[dst_idx..dst_idx + BYTES_PER_PIXEL]
                .copy_from_slice(&data[src_idx..src_idx + BYTES_PER_PIXEL]);
        }
    }
}

/// Source taps and normalized weights for one destination pixel.
struct Contribution {
    start: usize,
    weights: Vec<f32>,
}

/// Precompute the filter taps for one axis.
///
/// When downscaling the kernel is stretched by the scale factor so every
/// source pixel contributes.
fn contributions(
    src_len: usize,
    dst_len: usize,
    kernel: fn(f32) -> f32,
    support: f32,
) -> Vec<Contribution> {
    let scale = src_len as f32 / dst_len as f32;
    let filter_scale = scale.max(1.0);
    let radius = support * filter_scale;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let start = ((center - radius).floor() as isize).max(0) as usize;
            let end = (((center + radius).ceil() as isize) + 1).clamp(0, src_len as isize) as usize;

            let mut weights: Vec<f32> = (start..end)
                .map(|s| kernel((s as f32 - center) / filter_scale))
                .collect();
            let sum: f32 = weights.iter().sum();

            if sum.abs() > f32::EPSILON {
                for w in &mut weights {
                    *w /= sum;
                }
                Contribution { start, weights }
            } else {
                // Fallback to nearest neighbor if weights sum to zero
                let nearest = (center.round().max(0.0) as usize).min(src_len - 1);
                Contribution {
                    start: nearest,
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

#[inline]
fn triangle_kernel(x: f32) -> f32 {
    (1.0 - x.abs()).max(0.0)
}

/// Catmull-Rom spline (cubic convolution with a = -0.5).
#[inline]
fn catmull_rom_kernel(x: f32) -> f32 {
    let x = x.abs();
    if x < 1.0 {
        1.5 * x * x * x - 2.5 * x * x + 1.0
    } else if x < 2.0 {
        -0.5 * x * x * x + 2.5 * x * x - 4.0 * x + 2.0
    } else {
        0.0
    }
}

/// Lanczos kernel function.
#[inline]
fn lanczos_kernel(x: f32, a: f32) -> f32 {
    if x.abs() < f32::EPSILON {
        1.0
    } else if x.abs() >= a {
        0.0
    } else {
        let pi_x = PI * x;
        let pi_x_a = PI * x / a;
        (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x_a)
    }
}

#[inline]
fn lanczos3_kernel(x: f32) -> f32 {
    lanczos_kernel(x, 3.0)
}

fn premultiply(data: &[u8]) -> Vec<f32> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(BYTES_PER_PIXEL) {
        let a = px[3] as f32;
        let k = a / 255.0;
        out.extend_from_slice(&[px[0] as f32 * k, px[1] as f32 * k, px[2] as f32 * k, a]);
    }
    out
}

#[inline]
fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let a = px[3].clamp(0.0, 255.0);
    if a.round() == 0.0 {
        return [0, 0, 0, 0];
    }
    let k = 255.0 / a;
    [
        (px[0] * k).round().clamp(0.0, 255.0) as u8,
        (px[1] * k).round().clamp(0.0, 255.0) as u8,
        (px[2] * k).round().clamp(0.0, 255.0) as u8,
        a.round() as u8,
    ]
}
