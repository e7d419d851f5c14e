use gifpress::optimize::optimize_frames;
use gifpress::quantize::quantize_animation;
use gifpress::resize::resize_animation;
use gifpress::skip::skip_frames;
use gifpress::{compress, CompressionOptions, ResizeAlgorithm};
use proptest::prelude::*;
mod support;
use support::synthetic::arb_animation;

fn arb_algorithm() -> impl Strategy<Value = ResizeAlgorithm> {
    prop_oneof![
        Just(ResizeAlgorithm::Nearest),
        Just(ResizeAlgorithm::Bilinear),
        Just(ResizeAlgorithm::CatmullRom),
        Just(ResizeAlgorithm::Lanczos3),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_skip_conserves_total_delay(image in arb_animation(), skip in 0u8..=10) {
        let total = image.total_delay();
        let out = skip_frames(image, skip);
        prop_assert_eq!(out.total_delay(), total);
    }

    #[test]
    fn prop_skip_keeps_first_and_last_frame(image in arb_animation(), skip in 1u8..=10) {
        let first = image.frames[0].clone();
        let last = image.frames[image.frames.len() - 1].clone();
        let out = skip_frames(image.clone(), skip);

        prop_assert_eq!(&out.frames[0].pixels, &first.pixels);
        let kept_last = &out.frames[out.frames.len() - 1];
        prop_assert_eq!(&kept_last.pixels, &last.pixels);
        prop_assert_eq!(kept_last.rect, last.rect);
        prop_assert_eq!(kept_last.disposal, last.disposal);

        let expected = (image.frames.len() - 1) / (skip as usize + 1) + 1
            + usize::from((image.frames.len() - 1) % (skip as usize + 1) != 0);
        prop_assert_eq!(out.frames.len(), expected);
    }

    #[test]
    fn prop_quantize_respects_color_count(
        image in arb_animation(),
        color_count in 2u16..=256,
        lossy in 0u8..=100,
    ) {
        let out = quantize_animation(image.clone(), color_count, lossy);
        prop_assert_eq!(out.frames.len(), image.frames.len());
        for (before, after) in image.frames.iter().zip(&out.frames) {
            prop_assert!(after.palette.len() <= color_count as usize);
            prop_assert!(!after.palette.is_empty());
            prop_assert!(after.pixels.iter().all(|&i| (i as usize) < after.palette.len()));
            prop_assert_eq!(after.rect, before.rect);
            prop_assert_eq!(after.delay, before.delay);
        }
    }

    #[test]
    fn prop_quantize_is_exact_when_palette_fits(image in arb_animation()) {
        // Generated frames use at most 6 colors, so 256 never drops one.
        let out = quantize_animation(image.clone(), 256, 0);
        prop_assert_eq!(out.render(), image.render());
    }

    #[test]
    fn prop_delta_optimization_is_lossless(image in arb_animation()) {
        let out = optimize_frames(image.clone());
        prop_assert_eq!(out.frames.len(), image.frames.len());
        prop_assert_eq!(&out.frames[0], &image.frames[0]);
        for (before, after) in image.frames.iter().zip(&out.frames) {
            prop_assert!(before.rect.contains_rect(&after.rect));
            prop_assert_eq!(after.delay, before.delay);
            prop_assert_eq!(after.disposal, before.disposal);
        }
        prop_assert_eq!(out.render(), image.render());
    }

    #[test]
    fn prop_full_resize_is_identity(image in arb_animation(), algorithm in arb_algorithm()) {
        prop_assert_eq!(resize_animation(image.clone(), 100, algorithm).unwrap(), image);
    }

    #[test]
    fn prop_resize_keeps_frames_on_canvas(
        image in arb_animation(),
        percent in 10u8..100,
        algorithm in arb_algorithm(),
    ) {
        let out = resize_animation(image.clone(), percent, algorithm).unwrap();
        prop_assert!(out.validate().is_ok());
        for (before, after) in image.frames.iter().zip(&out.frames) {
            prop_assert_eq!(&after.palette, &before.palette);
        }
    }

    #[test]
    fn prop_compress_output_is_valid(
        image in arb_animation(),
        color_count in 2u16..=256,
        percent in 10u8..=100,
        lossy in 0u8..=100,
        skip in 0u8..=10,
        optimize in any::<bool>(),
    ) {
        let options = CompressionOptions::builder()
            .color_count(color_count)
            .resize_percent(percent)
            .lossy_level(lossy)
            .frame_skip(skip)
            .optimize_frames(optimize)
            .build();
        let total = image.total_delay();
        let out = compress(image, &options).unwrap();
        prop_assert!(out.validate().is_ok());
        prop_assert_eq!(out.total_delay(), total);
    }
}
