use std::io::Cursor;

use gifpress::{codec, compress_gif, AnimatedImage, CompressionOptions, Error, LoopCount, Preset, Rect};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
mod support;
use support::synthetic::{arb_animation, binary_alpha, numbered_animation, random_animation, solid_frame};

/// Decode with the `image` crate and return each composited RGBA frame plus
/// its delay in milliseconds.
fn decode_with_image_crate(bytes: &[u8]) -> Vec<(Vec<u8>, u32)> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).expect("image crate should read the header");
    decoder
        .into_frames()
        .collect_frames()
        .expect("image crate should decode every frame")
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            (frame.buffer().as_raw().clone(), numer / denom.max(1))
        })
        .collect()
}

#[test]
fn encoded_output_starts_with_gif89a_and_ends_with_trailer() {
    let bytes = codec::encode(&numbered_animation(2, 3, 3, 4)).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(bytes.last(), Some(&0x3B));
}

#[test]
fn image_crate_sees_the_same_frames() {
    let image = AnimatedImage::new(6, 4)
        .with_frame(solid_frame(Rect::new(0, 0, 6, 4), [255, 0, 0, 255]).with_delay(10))
        .with_frame(solid_frame(Rect::new(1, 1, 3, 2), [0, 0, 255, 255]).with_delay(20))
        .with_frame(solid_frame(Rect::new(5, 3, 1, 1), [0, 255, 0, 255]).with_delay(30));

    let bytes = codec::encode(&image).unwrap();
    let frames = decode_with_image_crate(&bytes);
    let expected = image.render();

    assert_eq!(frames.len(), 3);
    for (i, ((pixels, delay_ms), want)) in frames.iter().zip(&expected).enumerate() {
        assert_eq!(pixels, want, "frame {i}");
        assert_eq!(*delay_ms, image.frames[i].delay * 10, "frame {i}");
    }
}

#[test]
fn compressed_output_is_readable_by_image_crate() {
    let mut rng = StdRng::seed_from_u64(7);
    let image = random_animation(&mut rng, 40, 30, 8);
    let input = codec::encode(&image).unwrap();

    for preset in [Preset::Light, Preset::Maximum] {
        let options = CompressionOptions::from_preset(preset);
        let output = compress_gif(&input, &options).unwrap();
        let ours = codec::decode(&output).unwrap();
        let theirs = decode_with_image_crate(&output);
        assert_eq!(theirs.len(), ours.frames.len(), "{preset:?}");
    }
}

#[test]
fn loop_count_roundtrips() {
    for loop_count in [LoopCount::Infinite, LoopCount::Finite(0), LoopCount::Finite(5)] {
        let mut image = numbered_animation(2, 2, 2, 1);
        image.loop_count = loop_count;
        let decoded = codec::decode(&codec::encode(&image).unwrap()).unwrap();
        assert_eq!(decoded.loop_count, loop_count);
    }
}

#[test]
fn truncated_input_is_a_decode_error() {
    let bytes = codec::encode(&numbered_animation(3, 8, 8, 5)).unwrap();
    // Cut inside the first image's data.
    let result = codec::decode(&bytes[..bytes.len() / 2]);
    assert!(result.is_err());

    assert!(matches!(codec::decode(b"GIF89a"), Err(Error::Decode(_))));
    assert!(matches!(codec::decode(b"\x89PNG\r\n\x1a\n"), Err(Error::Decode(_))));
}

#[test]
fn header_only_gif_has_no_frames() {
    // Logical screen 1x1, no global color table, then the trailer.
    let bytes = [b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0, 0, 0, 0x3B];
    assert!(matches!(codec::decode(&bytes), Err(Error::InvalidDecode(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_codec_roundtrip_preserves_playback(image in arb_animation()) {
        let image = binary_alpha(image);
        let bytes = codec::encode(&image).unwrap();
        let decoded = codec::decode(&bytes).unwrap();

        prop_assert_eq!((decoded.width, decoded.height), (image.width, image.height));
        prop_assert_eq!(decoded.loop_count, image.loop_count);
        prop_assert_eq!(decoded.frames.len(), image.frames.len());
        for (before, after) in image.frames.iter().zip(&decoded.frames) {
            prop_assert_eq!(after.rect, before.rect);
            prop_assert_eq!(after.delay, before.delay);
            prop_assert_eq!(after.disposal, before.disposal);
            prop_assert_eq!(after.to_rgba(), before.to_rgba());
        }
        prop_assert_eq!(decoded.render(), image.render());
    }
}
