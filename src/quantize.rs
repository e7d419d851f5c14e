//! Per-frame palette quantization.
//!
//! Every frame gets a fresh palette built from its own pixel histogram: the
//! most frequent colors win, most frequent first. Pixels are then re-rendered
//! into that palette, with Floyd–Steinberg dithering unless the lossy level
//! asks for speed over smoothness.

use std::collections::HashMap;

use log::{debug, trace};

use crate::color::{self, Rgba};
use crate::dither::{self, Dither};
use crate::frame::{AnimatedImage, Frame, MAX_PALETTE_SIZE};

/// Lossy levels above this skip error diffusion.
pub const DITHER_LOSSY_THRESHOLD: u8 = 50;

/// A distinct color and how often it appears in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    /// The color, transparent colors normalized.
    pub color: Rgba,
    /// Number of pixels with this color.
    pub count: u32,
    /// Position of the first pixel with this color.
    pub first_seen: usize,
}

/// Distinct colors of `frame`, sorted by count descending then first
/// appearance ascending.
///
/// Palette entries that differ only in the RGB of a fully transparent color
/// count as one color, as do duplicate palette entries.
pub fn histogram(frame: &Frame) -> Vec<ColorCount> {
    // Count indices first; palettes are small, pixel buffers are not.
    let mut per_index = [0u32; MAX_PALETTE_SIZE];
    let mut first_index = [usize::MAX; MAX_PALETTE_SIZE];
    for (pos, &idx) in frame.pixels.iter().enumerate() {
        let i = idx as usize;
        if per_index[i] == 0 {
            first_index[i] = pos;
        }
        per_index[i] += 1;
    }

    let mut slots: HashMap<u32, usize> = HashMap::new();
    let mut counts: Vec<ColorCount> = Vec::new();
    for (i, &count) in per_index.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let color = frame
            .palette
            .get(i)
            .copied()
            .map_or(color::TRANSPARENT, color::normalize);
        let slot = *slots.entry(color::pack(color)).or_insert_with(|| {
            counts.push(ColorCount {
                color,
                count: 0,
                first_seen: usize::MAX,
            });
            counts.len() - 1
        });
        let entry = &mut counts[slot];
        entry.count += count;
        entry.first_seen = entry.first_seen.min(first_index[i]);
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
    counts
}

/// Choose a palette of at most `color_count` entries for `frame`.
///
/// Takes the `color_count` most frequent colors. When the frame's current
/// palette has a fully transparent entry, the new one has none and there is
/// room left, a transparent entry is appended so transparency survives.
pub fn build_palette(frame: &Frame, color_count: u16) -> Vec<Rgba> {
    let limit = usize::from(color_count).min(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = histogram(frame)
        .into_iter()
        .take(limit)
        .map(|c| c.color)
        .collect();

    let had_transparent = frame.palette.iter().any(|&c| color::is_transparent(c));
    let has_transparent = palette.iter().any(|&c| color::is_transparent(c));
    if had_transparent && !has_transparent && palette.len() < limit {
        palette.push(color::TRANSPARENT);
    }
    palette
}

/// Rebuild one frame's palette and re-render its pixels into it.
pub fn quantize_frame(frame: Frame, color_count: u16, lossy_level: u8) -> Frame {
    let palette = build_palette(&frame, color_count);
    if palette.is_empty() {
        // Only reachable for a frame with no pixels.
        return frame;
    }

    let dither = if lossy_level > DITHER_LOSSY_THRESHOLD {
        Dither::None
    } else {
        Dither::FloydSteinberg
    };
    trace!(
        "frame {}x{}: palette {} -> {} ({dither:?})",
        frame.rect.width,
        frame.rect.height,
        frame.palette.len(),
        palette.len()
    );

    let rgba = frame.to_rgba();
    let pixels = dither::remap(&rgba, frame.rect.width, frame.rect.height, &palette, dither);

    Frame {
        palette,
        pixels,
        ..frame
    }
}

/// Quantize every frame of `image` independently.
pub fn quantize_animation(image: AnimatedImage, color_count: u16, lossy_level: u8) -> AnimatedImage {
    debug!(
        "quantize {} frames to {color_count} colors (lossy {lossy_level})",
        image.frames.len()
    );
    let frames = image
        .frames
        .into_iter()
        .map(|frame| quantize_frame(frame, color_count, lossy_level))
        .collect();
    AnimatedImage { frames, ..image }
}
