//! Frame skipping.

use log::debug;

use crate::frame::AnimatedImage;

/// Drop frames from `image`, keeping one out of every `skip + 1`.
///
/// Frame `i` is kept when `i % (skip + 1) == 0`; the last frame is always
/// kept. A kept frame's delay becomes its own delay plus the delays of the
/// frames dropped right before it, so the total playback time is unchanged.
/// Dropped frames' disposal methods are discarded.
///
/// `skip == 0` and animations with at most one frame are returned unchanged.
pub fn skip_frames(image: AnimatedImage, skip: u8) -> AnimatedImage {
    let n = image.frames.len();
    if skip == 0 || n <= 1 {
        return image;
    }

    let step = skip as usize + 1;
    let AnimatedImage {
        width,
        height,
        frames,
        loop_count,
        background_index,
    } = image;

    let mut kept = Vec::with_capacity(n / step + 1);
    let mut pending = 0u32;
    for (i, mut frame) in frames.into_iter().enumerate() {
        pending = pending.saturating_add(frame.delay);
        if i % step == 0 || i == n - 1 {
            frame.delay = pending;
            pending = 0;
            kept.push(frame);
        }
    }

    debug!("frame skip {skip}: {n} -> {} frames", kept.len());

    AnimatedImage {
        width,
        height,
        frames: kept,
        loop_count,
        background_index,
    }
}
