//! In-memory animation model.
//!
//! An [`AnimatedImage`] is a logical canvas plus an ordered list of
//! palette-indexed [`Frame`]s. Frames may be smaller than the canvas and are
//! positioned by the offset in their [`Rect`].

use crate::canvas;
use crate::color::{self, Rgba};
use crate::error::{Error, Result};

/// Largest canvas or frame dimension (GIF stores dimensions as `u16`).
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Largest palette a frame may carry.
pub const MAX_PALETTE_SIZE: usize = 256;

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// One past the right-most column.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom row.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the rectangle is non-empty and lies inside a
    /// `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// What happens to a frame's area once the frame has been displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisposalMethod {
    /// No disposal specified; the frame is left in place.
    #[default]
    None,
    /// Do not dispose; the frame is left in place.
    Keep,
    /// Restore the frame's area to the (transparent) background.
    Background,
    /// Restore the canvas to what it was before the frame was drawn.
    Previous,
}

/// How many times the animation plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopCount {
    /// Loop forever.
    #[default]
    Infinite,
    /// Repeat the given number of times after the first play
    /// (`Finite(0)` plays once).
    Finite(u16),
}

/// A palette-indexed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position and size within the canvas.
    pub rect: Rect,
    /// Color table, at most 256 entries. Entries need not be unique.
    pub palette: Vec<Rgba>,
    /// Row-major palette indices, `rect.width * rect.height` long.
    pub pixels: Vec<u8>,
    /// Display time in centiseconds.
    pub delay: u32,
    /// Disposal applied after the frame is displayed.
    pub disposal: DisposalMethod,
}

impl Frame {
    /// Create a frame with no delay and no disposal.
    pub fn new(rect: Rect, palette: Vec<Rgba>, pixels: Vec<u8>) -> Self {
        Self {
            rect,
            palette,
            pixels,
            delay: 0,
            disposal: DisposalMethod::None,
        }
    }

    /// Set the delay in centiseconds.
    #[must_use]
    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    /// Set the disposal method.
    #[must_use]
    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = disposal;
        self
    }

    /// Color of the pixel at frame-local `(x, y)`, transparent colors normalized.
    ///
    /// Indices past the end of the palette read as transparent.
    #[inline]
    pub fn color_at(&self, x: u32, y: u32) -> Rgba {
        let idx = self.pixels[y as usize * self.rect.width as usize + x as usize];
        self.palette
            .get(idx as usize)
            .copied()
            .map_or(color::TRANSPARENT, color::normalize)
    }

    /// Expand the frame into an RGBA buffer of `rect.width * rect.height * 4` bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let lut: Vec<Rgba> = self.palette.iter().map(|&c| color::normalize(c)).collect();
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &idx in &self.pixels {
            out.extend_from_slice(&lut.get(idx as usize).copied().unwrap_or(color::TRANSPARENT));
        }
        out
    }

    /// First palette index whose color is fully transparent.
    pub fn transparent_index(&self) -> Option<u8> {
        self.palette
            .iter()
            .position(|&c| color::is_transparent(c))
            .map(|i| i as u8)
    }

    /// Copy the part of this frame covered by `rect` (canvas coordinates)
    /// into a new frame with the same palette, delay and disposal.
    ///
    /// `rect` must lie inside `self.rect`.
    pub fn crop(&self, rect: Rect) -> Frame {
        debug_assert!(self.rect.contains_rect(&rect));
        let stride = self.rect.width as usize;
        let left = (rect.x - self.rect.x) as usize;
        let top = (rect.y - self.rect.y) as usize;

        let mut pixels = Vec::with_capacity(rect.area());
        for row in top..top + rect.height as usize {
            let start = row * stride + left;
            pixels.extend_from_slice(&self.pixels[start..start + rect.width as usize]);
        }

        Frame {
            rect,
            palette: self.palette.clone(),
            pixels,
            delay: self.delay,
            disposal: self.disposal,
        }
    }

    /// Check the data-model invariants against a canvas size.
    pub fn validate(&self, index: usize, canvas_width: u32, canvas_height: u32) -> Result<()> {
        let invalid = |reason: String| Error::InvalidFrame { index, reason };

        if !self.rect.fits_within(canvas_width, canvas_height) {
            let r = self.rect;
            return Err(invalid(format!(
                "rectangle {}x{} at ({}, {}) does not fit canvas {canvas_width}x{canvas_height}",
                r.width, r.height, r.x, r.y
            )));
        }
        if self.palette.is_empty() || self.palette.len() > MAX_PALETTE_SIZE {
            return Err(invalid(format!(
                "palette has {} entries (expected 1..={MAX_PALETTE_SIZE})",
                self.palette.len()
            )));
        }
        if self.pixels.len() != self.rect.area() {
            return Err(invalid(format!(
                "pixel buffer has {} entries, rectangle needs {}",
                self.pixels.len(),
                self.rect.area()
            )));
        }
        if let Some(&bad) = self.pixels.iter().find(|&&p| p as usize >= self.palette.len()) {
            return Err(invalid(format!(
                "pixel index {bad} outside palette of {}",
                self.palette.len()
            )));
        }
        Ok(())
    }
}

/// A multi-frame palette-indexed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedImage {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Frames in display order.
    pub frames: Vec<Frame>,
    /// Loop behaviour.
    pub loop_count: LoopCount,
    /// Background color index from the container header.
    pub background_index: u8,
}

impl AnimatedImage {
    /// Create an empty animation with the given canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
            loop_count: LoopCount::Infinite,
            background_index: 0,
        }
    }

    /// Append a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Sum of all frame delays in centiseconds.
    pub fn total_delay(&self) -> u64 {
        self.frames.iter().map(|f| f.delay as u64).sum()
    }

    /// Check canvas size and every frame against the data-model invariants.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(Error::ImageTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_DIMENSION,
            });
        }
        if self.frames.is_empty() {
            return Err(Error::NoFrames);
        }
        for (index, frame) in self.frames.iter().enumerate() {
            frame.validate(index, self.width, self.height)?;
        }
        Ok(())
    }

    /// Play the animation and return the displayed RGBA canvas for every frame.
    ///
    /// See [`canvas::render`].
    pub fn render(&self) -> Vec<Vec<u8>> {
        canvas::render(self)
    }
}
