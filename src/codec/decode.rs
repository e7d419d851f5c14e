use std::cell::Cell;
use std::io::{self, Read};

use log::{debug, trace};

use crate::color::{Rgba, TRANSPARENT};
use crate::error::{Error, Result};
use crate::frame::{AnimatedImage, DisposalMethod, Frame, LoopCount, Rect};

/// Decode GIF bytes into an [`AnimatedImage`].
///
/// # Errors
///
/// Returns [`Error::Decode`] when the container is malformed and
/// [`Error::InvalidDecode`] when it parses but cannot be represented (no
/// frames, a frame outside the logical screen, a missing color table or a
/// pixel referring past the end of its palette).
///
/// # Example
///
/// ```rust
/// use gifpress::codec;
///
/// let err = codec::decode(b"not a gif").unwrap_err();
/// assert!(matches!(err, gifpress::Error::Decode(_)));
/// ```
pub fn decode(data: &[u8]) -> Result<AnimatedImage> {
    decode_from(data)
}

/// Decode a GIF from any reader.
pub fn decode_from<R: Read>(reader: R) -> Result<AnimatedImage> {
    let last = Cell::new(None);
    let reader = LastByte {
        inner: reader,
        last: &last,
    };

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options
        .read_info(reader)
        .map_err(|err| empty_stream(err, last.get()))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    if width == 0 || height == 0 {
        return Err(Error::InvalidDecode(format!(
            "logical screen is {width}x{height}"
        )));
    }

    let global_palette = decoder.global_palette().map(<[u8]>::to_vec);
    let background_index = decoder.bg_color().unwrap_or(0).min(255) as u8;

    let mut frames = Vec::new();
    loop {
        let frame = match decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) if frames.is_empty() => return Err(empty_stream(err, last.get())),
            Err(err) => return Err(err.into()),
        };
        let index = frames.len();
        let rect = Rect::new(
            u32::from(frame.left),
            u32::from(frame.top),
            u32::from(frame.width),
            u32::from(frame.height),
        );
        if !rect.fits_within(width, height) {
            return Err(Error::InvalidDecode(format!(
                "frame {index}: {}x{} at ({}, {}) outside {width}x{height} screen",
                rect.width, rect.height, rect.x, rect.y
            )));
        }

        let table = frame
            .palette
            .as_deref()
            .or(global_palette.as_deref())
            .ok_or_else(|| Error::InvalidDecode(format!("frame {index}: no color table")))?;
        let palette = palette_from_rgb(table, frame.transparent);

        let pixels = frame.buffer.to_vec();
        if pixels.len() != rect.area() {
            return Err(Error::InvalidDecode(format!(
                "frame {index}: {} pixels for a {}x{} frame",
                pixels.len(),
                rect.width,
                rect.height
            )));
        }
        if let Some(&bad) = pixels.iter().find(|&&p| p as usize >= palette.len()) {
            return Err(Error::InvalidDecode(format!(
                "frame {index}: pixel index {bad} outside palette of {}",
                palette.len()
            )));
        }

        trace!(
            "decoded frame {index}: {}x{}@({},{}), {} colors, delay {}, {:?}",
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            palette.len(),
            frame.delay,
            frame.dispose
        );

        frames.push(Frame {
            rect,
            palette,
            pixels,
            delay: u32::from(frame.delay),
            disposal: disposal_from_gif(frame.dispose),
        });
    }

    if frames.is_empty() {
        return Err(Error::InvalidDecode("no image data".into()));
    }

    // The looping extension is only seen while frames are read.
    let loop_count = match decoder.repeat() {
        gif::Repeat::Infinite => LoopCount::Infinite,
        gif::Repeat::Finite(n) => LoopCount::Finite(n),
    };

    debug!(
        "decoded GIF {width}x{height}, {} frames, {loop_count:?}",
        frames.len()
    );

    Ok(AnimatedImage {
        width,
        height,
        frames,
        loop_count,
        background_index,
    })
}

const TRAILER: u8 = 0x3B;

/// Reader that remembers the last byte handed to the decoder.
struct LastByte<'a, R> {
    inner: R,
    last: &'a Cell<Option<u8>>,
}

impl<R: Read> Read for LastByte<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.last.set(Some(buf[n - 1]));
        }
        Ok(n)
    }
}

/// The `gif` crate reports a stream that reaches its trailer before any image
/// as an early EOF. That stream is well formed, just empty.
fn empty_stream(err: gif::DecodingError, last: Option<u8>) -> Error {
    match err {
        gif::DecodingError::Io(ref e)
            if e.kind() == io::ErrorKind::UnexpectedEof && last == Some(TRAILER) =>
        {
            Error::InvalidDecode("no image data".into())
        }
        err => Error::Decode(err),
    }
}

fn palette_from_rgb(table: &[u8], transparent: Option<u8>) -> Vec<Rgba> {
    let mut palette: Vec<Rgba> = table
        .chunks_exact(3)
        .map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
        .collect();
    if let Some(entry) = transparent.and_then(|t| palette.get_mut(t as usize)) {
        *entry = TRANSPARENT;
    }
    palette
}

fn disposal_from_gif(dispose: gif::DisposalMethod) -> DisposalMethod {
    match dispose {
        gif::DisposalMethod::Any => DisposalMethod::None,
        gif::DisposalMethod::Keep => DisposalMethod::Keep,
        gif::DisposalMethod::Background => DisposalMethod::Background,
        gif::DisposalMethod::Previous => DisposalMethod::Previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_from_rgb() {
        let table = [1, 2, 3, 4, 5, 6, 7, 8];
        let palette = palette_from_rgb(&table, Some(1));
        assert_eq!(palette, vec![[1, 2, 3, 255], TRANSPARENT]);

        // Out-of-range transparent index is ignored.
        let palette = palette_from_rgb(&table, Some(9));
        assert_eq!(palette, vec![[1, 2, 3, 255], [4, 5, 6, 255]]);
    }

    #[test]
    fn test_stream_without_images_is_invalid() {
        // Header, 1x1 screen, no color table, trailer.
        let bare = [b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0, 0, 0, TRAILER];
        assert!(matches!(decode(&bare), Err(Error::InvalidDecode(_))));

        // Same with a two-entry global color table.
        let with_palette = [
            b'G', b'I', b'F', b'8', b'7', b'a', 2, 0, 2, 0, 0x80, 0, 0, 0, 0, 0, 255, 255, 255,
            TRAILER,
        ];
        assert!(matches!(decode(&with_palette), Err(Error::InvalidDecode(_))));

        // Through a reader as well.
        assert!(matches!(
            decode_from(io::Cursor::new(bare)),
            Err(Error::InvalidDecode(_))
        ));
    }

    #[test]
    fn test_empty_stream_only_maps_eof_after_trailer() {
        let eof = || gif::DecodingError::Io(io::ErrorKind::UnexpectedEof.into());
        assert!(matches!(empty_stream(eof(), Some(TRAILER)), Error::InvalidDecode(_)));
        assert!(matches!(empty_stream(eof(), Some(b'a')), Error::Decode(_)));
        assert!(matches!(empty_stream(eof(), None), Error::Decode(_)));

        let other = gif::DecodingError::Io(io::ErrorKind::Other.into());
        assert!(matches!(empty_stream(other, Some(TRAILER)), Error::Decode(_)));
    }

    #[test]
    fn test_truncated_input_fails() {
        assert!(matches!(decode(b"GIF89a"), Err(Error::Decode(_))));
        assert!(decode(&[]).is_err());
    }
}
