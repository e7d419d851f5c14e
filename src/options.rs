//! Compression options.

use crate::error::{Error, Result};
use crate::resize::ResizeAlgorithm;

/// Smallest accepted palette size.
pub const MIN_COLOR_COUNT: u16 = 2;
/// Largest accepted palette size.
pub const MAX_COLOR_COUNT: u16 = 256;
/// Smallest accepted resize percentage.
pub const MIN_RESIZE_PERCENT: u8 = 10;
/// Largest accepted resize percentage (no resize).
pub const MAX_RESIZE_PERCENT: u8 = 100;
/// Largest accepted lossy level.
pub const MAX_LOSSY_LEVEL: u8 = 100;
/// Largest accepted frame skip factor.
pub const MAX_FRAME_SKIP: u8 = 10;

/// Named option sets, from gentle to aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// 128 colors, 90% size.
    Light,
    /// 64 colors, 75% size.
    Medium,
    /// 32 colors, 50% size, every other frame.
    High,
    /// 16 colors, 40% size, one frame in three, no dithering.
    Maximum,
}

/// Options for [`compress`](crate::compress).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    /// Maximum palette size per frame, 2-256.
    pub color_count: u16,
    /// Output size as a percentage of the input, 10-100 (100 = no resize).
    pub resize_percent: u8,
    /// 0-100. Above 50 palette remapping skips dithering.
    pub lossy_level: u8,
    /// Crop frames to the region they change.
    pub optimize_frames: bool,
    /// Frames dropped between two kept frames, 0-10.
    pub frame_skip: u8,
    /// Resampling filter used when resizing.
    pub resize_algorithm: ResizeAlgorithm,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            color_count: MAX_COLOR_COUNT,
            resize_percent: MAX_RESIZE_PERCENT,
            lossy_level: 0,
            optimize_frames: false,
            frame_skip: 0,
            resize_algorithm: ResizeAlgorithm::CatmullRom,
        }
    }
}

impl CompressionOptions {
    /// Light: 128 colors, 90% size, frame optimization.
    pub fn light() -> Self {
        Self {
            color_count: 128,
            resize_percent: 90,
            lossy_level: 0,
            optimize_frames: true,
            frame_skip: 0,
            ..Default::default()
        }
    }

    /// Medium: 64 colors, 75% size, frame optimization.
    pub fn medium() -> Self {
        Self {
            color_count: 64,
            resize_percent: 75,
            lossy_level: 0,
            optimize_frames: true,
            frame_skip: 0,
            ..Default::default()
        }
    }

    /// High: 32 colors, 50% size, frame optimization, every other frame dropped.
    pub fn high() -> Self {
        Self {
            color_count: 32,
            resize_percent: 50,
            lossy_level: 0,
            optimize_frames: true,
            frame_skip: 1,
            ..Default::default()
        }
    }

    /// Maximum: 16 colors, 40% size, frame optimization, two of every three
    /// frames dropped, lossy 50.
    pub fn maximum() -> Self {
        Self {
            color_count: 16,
            resize_percent: 40,
            lossy_level: 50,
            optimize_frames: true,
            frame_skip: 2,
            ..Default::default()
        }
    }

    /// Create from a named preset.
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Light => Self::light(),
            Preset::Medium => Self::medium(),
            Preset::High => Self::high(),
            Preset::Maximum => Self::maximum(),
        }
    }

    /// Create a builder for [`CompressionOptions`], starting from the defaults.
    pub fn builder() -> CompressionOptionsBuilder {
        CompressionOptionsBuilder::new()
    }

    /// Check every option against its documented range.
    pub fn validate(&self) -> Result<()> {
        check_range(
            "color_count",
            self.color_count.into(),
            MIN_COLOR_COUNT.into(),
            MAX_COLOR_COUNT.into(),
        )?;
        check_range(
            "resize_percent",
            self.resize_percent.into(),
            MIN_RESIZE_PERCENT.into(),
            MAX_RESIZE_PERCENT.into(),
        )?;
        check_range("lossy_level", self.lossy_level.into(), 0, MAX_LOSSY_LEVEL.into())?;
        check_range("frame_skip", self.frame_skip.into(), 0, MAX_FRAME_SKIP.into())?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidOptions {
            name,
            value,
            min,
            max,
        })
    }
}

/// Builder for [`CompressionOptions`].
///
/// Create with [`CompressionOptions::builder()`] and configure options fluently.
#[derive(Debug, Clone, Default)]
pub struct CompressionOptionsBuilder {
    options: CompressionOptions,
}

impl CompressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_count(mut self, color_count: u16) -> Self {
        self.options.color_count = color_count;
        self
    }

    pub fn resize_percent(mut self, percent: u8) -> Self {
        self.options.resize_percent = percent;
        self
    }

    pub fn lossy_level(mut self, level: u8) -> Self {
        self.options.lossy_level = level;
        self
    }

    pub fn optimize_frames(mut self, value: bool) -> Self {
        self.options.optimize_frames = value;
        self
    }

    pub fn frame_skip(mut self, skip: u8) -> Self {
        self.options.frame_skip = skip;
        self
    }

    pub fn resize_algorithm(mut self, algorithm: ResizeAlgorithm) -> Self {
        self.options.resize_algorithm = algorithm;
        self
    }

    /// Apply a preset while retaining the resize algorithm.
    pub fn preset(mut self, preset: Preset) -> Self {
        let algorithm = self.options.resize_algorithm;
        self.options = CompressionOptions::from_preset(preset);
        self.options.resize_algorithm = algorithm;
        self
    }

    /// Build the [`CompressionOptions`].
    #[must_use]
    pub fn build(self) -> CompressionOptions {
        self.options
    }
}
