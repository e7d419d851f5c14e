//! Mapping truecolor pixels onto a fixed palette.
//!
//! Both the resizer and the quantizer end with an RGBA buffer that has to be
//! expressed in palette indices. [`remap`] does that either with a plain
//! nearest-color lookup or with Floyd–Steinberg error diffusion.

use std::collections::HashMap;

use crate::color::{self, Rgba};

/// How truecolor pixels are mapped onto a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    /// Nearest palette entry per pixel, no error propagation.
    None,
    /// Floyd–Steinberg error diffusion over all four channels.
    #[default]
    FloydSteinberg,
}

/// Nearest palette entry by squared RGBA distance; ties go to the lowest index.
pub fn nearest_palette_index(color: Rgba, palette: &[Rgba]) -> u8 {
    let mut best_idx = 0u8;
    let mut best_dist = u32::MAX;
    for (i, &p) in palette.iter().enumerate() {
        let dist = color::distance_sq(color, p);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i as u8;
            if dist == 0 {
                break;
            }
        }
    }
    best_idx
}

/// Nearest-color lookups memoized per exact RGBA value.
struct PaletteMapper {
    palette: Vec<Rgba>,
    cache: HashMap<u32, u8>,
}

impl PaletteMapper {
    fn new(palette: &[Rgba]) -> Self {
        Self {
            palette: palette.iter().map(|&c| color::normalize(c)).collect(),
            cache: HashMap::new(),
        }
    }

    #[inline]
    fn lookup(&mut self, color: Rgba) -> u8 {
        let color = color::normalize(color);
        let palette = &self.palette;
        *self
            .cache
            .entry(color::pack(color))
            .or_insert_with(|| nearest_palette_index(color, palette))
    }

    #[inline]
    fn color(&self, idx: u8) -> Rgba {
        self.palette[idx as usize]
    }
}

/// Map an RGBA8 buffer of `width * height` pixels onto `palette`.
///
/// `palette` must be non-empty and hold at most 256 entries. The returned
/// indices are always valid for it.
pub fn remap(rgba: &[u8], width: u32, height: u32, palette: &[Rgba], dither: Dither) -> Vec<u8> {
    debug_assert!(!palette.is_empty() && palette.len() <= 256);
    debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);

    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut mapper = PaletteMapper::new(palette);

    match dither {
        Dither::None => rgba
            .chunks_exact(4)
            .map(|px| mapper.lookup([px[0], px[1], px[2], px[3]]))
            .collect(),
        Dither::FloydSteinberg => floyd_steinberg(rgba, width as usize, height as usize, &mut mapper),
    }
}

fn floyd_steinberg(rgba: &[u8], width: usize, height: usize, mapper: &mut PaletteMapper) -> Vec<u8> {
    let mut indices = Vec::with_capacity(width * height);

    // Error rows are padded by one column on each side: entry x + 1 belongs
    // to column x.
    let mut err = vec![[0f32; 4]; width + 2];
    let mut next_err = vec![[0f32; 4]; width + 2];

    for row in rgba.chunks_exact(width * 4).take(height) {
        for (x, px) in row.chunks_exact(4).enumerate() {
            let source = color::normalize([px[0], px[1], px[2], px[3]]);

            let mut adjusted = [0f32; 4];
            let mut rounded = [0u8; 4];
            for c in 0..4 {
                adjusted[c] = (source[c] as f32 + err[x + 1][c]).clamp(0.0, 255.0);
                rounded[c] = adjusted[c].round() as u8;
            }

            let idx = mapper.lookup(rounded);
            indices.push(idx);

            let chosen = mapper.color(idx);
            for c in 0..4 {
                let e = adjusted[c] - chosen[c] as f32;
                err[x + 2][c] += e * 7.0 / 16.0;
                next_err[x][c] += e * 3.0 / 16.0;
                next_err[x + 1][c] += e * 5.0 / 16.0;
                next_err[x + 2][c] += e * 1.0 / 16.0;
            }
        }
        err.fill([0.0; 4]);
        std::mem::swap(&mut err, &mut next_err);
    }

    indices
}
