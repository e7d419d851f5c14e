//! Synthetic animations and proptest strategies shared by the integration tests.

use gifpress::color::TRANSPARENT;
use gifpress::{AnimatedImage, DisposalMethod, Frame, LoopCount, Rect, Rgba};
use proptest::prelude::*;
use rand::Rng;

pub const OPAQUE_COLORS: [Rgba; 6] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 255, 255],
    [0, 0, 0, 255],
    [200, 120, 40, 255],
];

/// A frame filled with one color.
pub fn solid_frame(rect: Rect, color: Rgba) -> Frame {
    Frame::new(rect, vec![color], vec![0; rect.area()])
}

/// `count` full-canvas frames, frame `i` filled with `[i, 255 - i, 0, 255]`.
pub fn numbered_animation(count: usize, width: u32, height: u32, delay: u32) -> AnimatedImage {
    let mut image = AnimatedImage::new(width, height);
    for i in 0..count {
        let color = [i as u8, 255 - i as u8, 0, 255];
        image
            .frames
            .push(solid_frame(Rect::new(0, 0, width, height), color).with_delay(delay));
    }
    image
}

/// Recover the number encoded by [`numbered_animation`].
pub fn frame_number(frame: &Frame) -> u8 {
    frame.palette[0][0]
}

/// A frame using all 256 palette slots with distinct colors, each pixel a
/// different color where the frame is large enough.
pub fn many_color_frame(width: u32, height: u32) -> Frame {
    let palette: Vec<Rgba> = (0..=255u8)
        .map(|i| [i, i.wrapping_mul(37), 255 - i, 255])
        .collect();
    let pixels = (0..width * height).map(|i| (i % 256) as u8).collect();
    Frame::new(Rect::new(0, 0, width, height), palette, pixels)
}

/// A single-frame horizontal gradient over a 64-entry gray palette.
pub fn gradient_frame(width: u32, height: u32) -> Frame {
    let palette: Vec<Rgba> = (0..64u8).map(|i| [i * 4, i * 4, i * 4, 255]).collect();
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for _ in 0..height {
        for x in 0..width {
            pixels.push((x * 63 / (width - 1).max(1)) as u8);
        }
    }
    Frame::new(Rect::new(0, 0, width, height), palette, pixels)
}

/// A seeded random animation: a full-canvas first frame followed by
/// sub-rectangle frames with random disposal.
pub fn random_animation<R: Rng>(rng: &mut R, width: u32, height: u32, frames: usize) -> AnimatedImage {
    let mut image = AnimatedImage::new(width, height);
    for i in 0..frames {
        let rect = if i == 0 {
            Rect::new(0, 0, width, height)
        } else {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let w = rng.gen_range(1..=width - x);
            let h = rng.gen_range(1..=height - y);
            Rect::new(x, y, w, h)
        };
        let colors = rng.gen_range(1..=OPAQUE_COLORS.len());
        let mut palette: Vec<Rgba> = OPAQUE_COLORS[..colors].to_vec();
        if rng.gen_bool(0.3) {
            palette.push(TRANSPARENT);
        }
        let pixels = (0..rect.area())
            .map(|_| rng.gen_range(0..palette.len()) as u8)
            .collect();
        let disposal = match rng.gen_range(0..4) {
            0 => DisposalMethod::None,
            1 => DisposalMethod::Keep,
            2 => DisposalMethod::Background,
            _ => DisposalMethod::Previous,
        };
        image.frames.push(Frame {
            rect,
            palette,
            pixels,
            delay: rng.gen_range(0..100),
            disposal,
        });
    }
    image
}

/// Force every partially transparent palette entry to opaque, as GIF stores it.
pub fn binary_alpha(mut image: AnimatedImage) -> AnimatedImage {
    for frame in &mut image.frames {
        for color in &mut frame.palette {
            if color[3] != 0 {
                color[3] = 255;
            }
        }
    }
    image
}

pub fn arb_color() -> impl Strategy<Value = Rgba> {
    prop_oneof![
        4 => proptest::sample::select(OPAQUE_COLORS.to_vec()),
        1 => Just(TRANSPARENT),
        1 => (any::<u8>(), 1u8..255).prop_map(|(v, a)| [v, v / 2, 255 - v, a]),
    ]
}

pub fn arb_disposal() -> impl Strategy<Value = DisposalMethod> {
    prop_oneof![
        Just(DisposalMethod::None),
        Just(DisposalMethod::Keep),
        Just(DisposalMethod::Background),
        Just(DisposalMethod::Previous),
    ]
}

pub fn arb_loop_count() -> impl Strategy<Value = LoopCount> {
    prop_oneof![Just(LoopCount::Infinite), (0u16..5).prop_map(LoopCount::Finite)]
}

/// A valid frame somewhere on a `canvas_width` x `canvas_height` canvas.
pub fn arb_frame(canvas_width: u32, canvas_height: u32) -> impl Strategy<Value = Frame> {
    (0..canvas_width, 0..canvas_height)
        .prop_flat_map(move |(x, y)| {
            (
                Just(x),
                Just(y),
                1..=canvas_width - x,
                1..=canvas_height - y,
            )
        })
        .prop_flat_map(|(x, y, w, h)| {
            (
                Just(Rect::new(x, y, w, h)),
                proptest::collection::vec(arb_color(), 1..=6),
                0u32..=50,
                arb_disposal(),
            )
        })
        .prop_flat_map(|(rect, palette, delay, disposal)| {
            let colors = palette.len() as u8;
            proptest::collection::vec(0..colors, rect.area()).prop_map(move |pixels| Frame {
                rect,
                palette: palette.clone(),
                pixels,
                delay,
                disposal,
            })
        })
}

/// A valid animation of 1-6 frames on a canvas up to 12x12.
pub fn arb_animation() -> impl Strategy<Value = AnimatedImage> {
    (1u32..=12, 1u32..=12)
        .prop_flat_map(|(width, height)| {
            (
                Just(width),
                Just(height),
                proptest::collection::vec(arb_frame(width, height), 1..=6),
                arb_loop_count(),
            )
        })
        .prop_map(|(width, height, frames, loop_count)| AnimatedImage {
            width,
            height,
            frames,
            loop_count,
            background_index: 0,
        })
}
