//! Delta frame optimization.
//!
//! Each frame after the first is cropped to the bounding box of the pixels
//! that actually change what is on screen. Frames that change nothing shrink
//! to a single invisible pixel. The visible result of playing the animation
//! is unchanged.

use log::debug;

use crate::canvas::Canvas;
use crate::frame::{AnimatedImage, DisposalMethod, Frame, Rect};

/// Crop every frame after the first to the region it changes.
///
/// The composite canvas honours disposal methods, so the comparison is
/// always against what a viewer would see. Frames that dispose to the
/// background are kept whole, because that disposal clears exactly the
/// emitted rectangle. Such a frame is never cropped or collapsed to a 1x1
/// placeholder, even when it changes nothing on screen.
///
/// Animations with fewer than two frames are returned unchanged.
pub fn optimize_frames(image: AnimatedImage) -> AnimatedImage {
    if image.frames.len() < 2 {
        return image;
    }

    let AnimatedImage {
        width,
        height,
        frames,
        loop_count,
        background_index,
    } = image;
    let before: usize = frames.iter().map(|f| f.pixels.len()).sum();

    let (_, optimized) = frames.into_iter().enumerate().fold(
        (Canvas::new(width, height), Vec::new()),
        |(mut canvas, mut out), (i, frame)| {
            let emitted = (i > 0).then(|| delta_frame(&canvas, &frame));
            canvas.advance(&frame);
            out.push(emitted.unwrap_or(frame));
            (canvas, out)
        },
    );

    let after: usize = optimized.iter().map(|f: &Frame| f.pixels.len()).sum();
    debug!(
        "delta optimization: {} frames, {before} -> {after} pixels",
        optimized.len()
    );

    AnimatedImage {
        width,
        height,
        frames: optimized,
        loop_count,
        background_index,
    }
}

fn delta_frame(canvas: &Canvas, frame: &Frame) -> Frame {
    if frame.disposal == DisposalMethod::Background {
        return frame.clone();
    }
    match canvas.changed_rect(frame) {
        Some(rect) if rect == frame.rect => frame.clone(),
        Some(rect) => frame.crop(rect),
        None => placeholder(frame),
    }
}

/// A 1x1 frame at `frame`'s offset that leaves the canvas as it is.
fn placeholder(frame: &Frame) -> Frame {
    // Without a transparent entry, the frame's own top-left pixel is known
    // not to change the canvas at that position.
    let idx = frame
        .transparent_index()
        .unwrap_or_else(|| frame.pixels.first().copied().unwrap_or(0));
    Frame {
        rect: Rect::new(frame.rect.x, frame.rect.y, 1, 1),
        palette: frame.palette.clone(),
        pixels: vec![idx],
        delay: frame.delay,
        disposal: frame.disposal,
    }
}
