//! Truecolor compositing canvas.
//!
//! The canvas tracks what a viewer sees after each frame of an animation has
//! been drawn and disposed. The delta optimizer uses it as its running
//! composite and [`render`] uses it to play a whole animation.

use crate::color::{self, Rgba};
use crate::frame::{AnimatedImage, DisposalMethod, Frame, Rect};

/// An RGBA8 buffer the size of the logical screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Color at canvas position `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, value: Rgba) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&value);
    }

    /// Source-over composite `frame` at its offset.
    pub fn paint(&mut self, frame: &Frame) {
        let lut: Vec<Rgba> = frame.palette.iter().map(|&c| color::normalize(c)).collect();
        let Rect {
            x: left,
            y: top,
            width,
            ..
        } = frame.rect;
        if width == 0 {
            return;
        }

        for (row, line) in frame.pixels.chunks_exact(width as usize).enumerate() {
            let y = top + row as u32;
            for (col, &idx) in line.iter().enumerate() {
                let src = lut.get(idx as usize).copied().unwrap_or(color::TRANSPARENT);
                if color::is_transparent(src) {
                    continue;
                }
                let x = left + col as u32;
                let dst = self.pixel(x, y);
                self.set_pixel(x, y, color::over(dst, src));
            }
        }
    }

    /// Reset `rect` to transparent.
    pub fn clear(&mut self, rect: Rect) {
        let row_bytes = rect.width as usize * 4;
        for y in rect.y..rect.bottom() {
            let start = self.offset(rect.x, y);
            self.pixels[start..start + row_bytes].fill(0);
        }
    }

    /// Move the canvas to the state it is in after `frame` has been displayed
    /// and disposed.
    pub fn advance(&mut self, frame: &Frame) {
        match frame.disposal {
            DisposalMethod::None | DisposalMethod::Keep => self.paint(frame),
            DisposalMethod::Background => self.clear(frame.rect),
            DisposalMethod::Previous => {}
        }
    }

    /// Bounding box (canvas coordinates) of the pixels of `frame` that would
    /// change this canvas if painted, or `None` when painting is a no-op.
    pub fn changed_rect(&self, frame: &Frame) -> Option<Rect> {
        let Rect {
            x: left,
            y: top,
            width,
            height,
        } = frame.rect;

        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for ly in 0..height {
            for lx in 0..width {
                let src = frame.color_at(lx, ly);
                let (x, y) = (left + lx, top + ly);
                let dst = self.pixel(x, y);
                if color::over(dst, src) != dst {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        if min_x == u32::MAX {
            return None;
        }
        Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the canvas and return its RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }
}

/// Play `image` onto a transparent canvas and return the displayed RGBA
/// buffer (canvas-sized) for every frame.
///
/// Disposal is applied after each frame is shown: restore-background clears
/// the frame's rectangle to transparent, restore-previous puts back the
/// canvas as it was before the frame was drawn.
pub fn render(image: &AnimatedImage) -> Vec<Vec<u8>> {
    let mut canvas = Canvas::new(image.width, image.height);
    let mut shown = Vec::with_capacity(image.frames.len());

    for frame in &image.frames {
        match frame.disposal {
            DisposalMethod::None | DisposalMethod::Keep => {
                canvas.paint(frame);
                shown.push(canvas.as_rgba().to_vec());
            }
            DisposalMethod::Background => {
                canvas.paint(frame);
                shown.push(canvas.as_rgba().to_vec());
                canvas.clear(frame.rect);
            }
            DisposalMethod::Previous => {
                let mut scratch = canvas.clone();
                scratch.paint(frame);
                shown.push(scratch.into_rgba());
            }
        }
    }

    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];

    fn solid(rect: Rect, color: Rgba) -> Frame {
        Frame::new(rect, vec![color, color::TRANSPARENT], vec![0; rect.area()])
    }

    #[test]
    fn test_paint_respects_offset() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paint(&solid(Rect::new(1, 2, 2, 1), RED));
        assert_eq!(canvas.pixel(1, 2), RED);
        assert_eq!(canvas.pixel(2, 2), RED);
        assert_eq!(canvas.pixel(0, 2), color::TRANSPARENT);
        assert_eq!(canvas.pixel(1, 3), color::TRANSPARENT);
    }

    #[test]
    fn test_transparent_pixels_leave_canvas() {
        let mut canvas = Canvas::new(2, 1);
        canvas.paint(&solid(Rect::new(0, 0, 2, 1), RED));
        let holey = Frame::new(Rect::new(0, 0, 2, 1), vec![GREEN, [7, 7, 7, 0]], vec![1, 0]);
        canvas.paint(&holey);
        assert_eq!(canvas.pixel(0, 0), RED);
        assert_eq!(canvas.pixel(1, 0), GREEN);
    }

    #[test]
    fn test_changed_rect() {
        let mut canvas = Canvas::new(4, 4);
        let base = solid(Rect::new(0, 0, 4, 4), RED);
        canvas.paint(&base);
        assert_eq!(canvas.changed_rect(&base), None);

        let mut next = base.clone();
        next.palette = vec![RED, GREEN];
        next.pixels[4 + 1] = 1; // (1, 1)
        next.pixels[2 * 4 + 2] = 1; // (2, 2)
        assert_eq!(canvas.changed_rect(&next), Some(Rect::new(1, 1, 2, 2)));
    }

    #[test]
    fn test_changed_rect_ignores_transparent() {
        let canvas = Canvas::new(3, 3);
        let clear = Frame::new(Rect::new(0, 0, 3, 3), vec![color::TRANSPARENT], vec![0; 9]);
        assert_eq!(canvas.changed_rect(&clear), None);
    }

    #[test]
    fn test_advance_disposal() {
        let mut canvas = Canvas::new(2, 2);
        canvas.paint(&solid(Rect::new(0, 0, 2, 2), RED));

        let previous = solid(Rect::new(0, 0, 1, 1), GREEN).with_disposal(DisposalMethod::Previous);
        canvas.advance(&previous);
        assert_eq!(canvas.pixel(0, 0), RED);

        let background =
            solid(Rect::new(1, 1, 1, 1), GREEN).with_disposal(DisposalMethod::Background);
        canvas.advance(&background);
        assert_eq!(canvas.pixel(1, 1), color::TRANSPARENT);
        assert_eq!(canvas.pixel(0, 0), RED);

        canvas.advance(&solid(Rect::new(0, 1, 1, 1), GREEN));
        assert_eq!(canvas.pixel(0, 1), GREEN);
    }

    #[test]
    fn test_render_shows_frames_before_disposal() {
        let image = AnimatedImage::new(2, 1)
            .with_frame(solid(Rect::new(0, 0, 2, 1), RED).with_disposal(DisposalMethod::Background))
            .with_frame(solid(Rect::new(1, 0, 1, 1), GREEN).with_disposal(DisposalMethod::Previous))
            .with_frame(solid(Rect::new(0, 0, 1, 1), GREEN));

        let frames = render(&image);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], [RED, RED].concat());
        assert_eq!(frames[1], [color::TRANSPARENT, GREEN].concat());
        assert_eq!(frames[2], [GREEN, color::TRANSPARENT].concat());
    }
}
