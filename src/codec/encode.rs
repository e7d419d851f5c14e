use std::borrow::Cow;

use log::{debug, trace};

use crate::color;
use crate::error::{Error, Result};
use crate::frame::{AnimatedImage, DisposalMethod, Frame, LoopCount};

/// Encode an [`AnimatedImage`] as GIF89a bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidFrame`] or [`Error::NoFrames`] when the image breaks
/// the data model, [`Error::InvalidEncode`] when a value does not fit the
/// container (dimensions or delays above 65535) and [`Error::Encode`] when
/// the writer fails.
pub fn encode(image: &AnimatedImage) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    encode_into(&mut output, image)?;
    Ok(output)
}

/// Encode an [`AnimatedImage`] into a caller-provided buffer.
///
/// The `output` buffer will be cleared and reused, allowing callers to avoid
/// repeated allocations across multiple encodes.
pub fn encode_into(output: &mut Vec<u8>, image: &AnimatedImage) -> Result<()> {
    image.validate()?;
    let width = to_u16(image.width, "canvas width")?;
    let height = to_u16(image.height, "canvas height")?;

    output.clear();
    {
        let mut encoder = gif::Encoder::new(&mut *output, width, height, &[])?;
        match image.loop_count {
            LoopCount::Infinite => encoder.set_repeat(gif::Repeat::Infinite)?,
            // Without the looping extension a GIF plays once.
            LoopCount::Finite(0) => {}
            LoopCount::Finite(n) => encoder.set_repeat(gif::Repeat::Finite(n))?,
        }

        for (index, frame) in image.frames.iter().enumerate() {
            let gif_frame = to_gif_frame(index, frame)?;
            trace!(
                "encoding frame {index}: {}x{}@({},{}), {} colors",
                gif_frame.width,
                gif_frame.height,
                gif_frame.left,
                gif_frame.top,
                frame.palette.len()
            );
            encoder.write_frame(&gif_frame)?;
        }
        // Dropping the encoder writes the trailer.
    }

    debug!(
        "encoded GIF {}x{}, {} frames, {} bytes",
        image.width,
        image.height,
        image.frames.len(),
        output.len()
    );
    Ok(())
}

fn to_u16(value: u32, what: &str) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| Error::InvalidEncode(format!("{what} {value} exceeds {}", u16::MAX)))
}

fn to_gif_frame(index: usize, frame: &Frame) -> Result<gif::Frame<'static>> {
    let delay = to_u16(frame.delay, &format!("frame {index} delay"))?;
    let transparent = frame.transparent_index();

    // GIF has a single transparent index per frame; fold any other fully
    // transparent entries onto it.
    let pixels: Vec<u8> = match transparent {
        Some(t) => frame
            .pixels
            .iter()
            .map(|&p| {
                if color::is_transparent(frame.palette[p as usize]) {
                    t
                } else {
                    p
                }
            })
            .collect(),
        None => frame.pixels.clone(),
    };

    Ok(gif::Frame {
        left: to_u16(frame.rect.x, "frame left")?,
        top: to_u16(frame.rect.y, "frame top")?,
        width: to_u16(frame.rect.width, "frame width")?,
        height: to_u16(frame.rect.height, "frame height")?,
        delay,
        dispose: disposal_to_gif(frame.disposal),
        transparent,
        palette: Some(color_table(frame)),
        buffer: Cow::Owned(pixels),
        ..gif::Frame::default()
    })
}

/// RGB color table padded with black to a power of two (at least 2 entries).
fn color_table(frame: &Frame) -> Vec<u8> {
    let size = frame.palette.len().max(2).next_power_of_two();
    let mut table = Vec::with_capacity(size * 3);
    for c in &frame.palette {
        table.extend_from_slice(&c[..3]);
    }
    table.resize(size * 3, 0);
    table
}

fn disposal_to_gif(disposal: DisposalMethod) -> gif::DisposalMethod {
    match disposal {
        DisposalMethod::None => gif::DisposalMethod::Any,
        DisposalMethod::Keep => gif::DisposalMethod::Keep,
        DisposalMethod::Background => gif::DisposalMethod::Background,
        DisposalMethod::Previous => gif::DisposalMethod::Previous,
    }
}
