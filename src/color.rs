//! RGBA color helpers.
//!
//! Palette entries and truecolor pixels are straight (non-premultiplied)
//! `[r, g, b, a]` arrays. Every fully transparent color is treated as the
//! same color, [`TRANSPARENT`], whatever its RGB channels hold.

/// A straight-alpha RGBA color.
pub type Rgba = [u8; 4];

/// The canonical fully transparent color.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Collapse every fully transparent color onto [`TRANSPARENT`].
#[inline]
pub fn normalize(color: Rgba) -> Rgba {
    if color[3] == 0 {
        TRANSPARENT
    } else {
        color
    }
}

/// True when the color has zero alpha.
#[inline]
pub fn is_transparent(color: Rgba) -> bool {
    color[3] == 0
}

/// Pack a color into a `u32` key (`0xRRGGBBAA`).
#[inline]
pub fn pack(color: Rgba) -> u32 {
    u32::from_be_bytes(color)
}

/// Squared Euclidean distance over all four channels.
#[inline]
pub fn distance_sq(a: Rgba, b: Rgba) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    let da = a[3] as i32 - b[3] as i32;
    (dr * dr + dg * dg + db * db + da * da) as u32
}

/// Source-over compositing of `src` onto `dst`.
///
/// Opaque sources replace the destination, fully transparent sources leave
/// it untouched, anything in between is alpha-blended with rounding.
#[inline]
pub fn over(dst: Rgba, src: Rgba) -> Rgba {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    // Work in alpha*255 units so everything stays integral.
    let dst_weight = dst[3] as u32 * (255 - sa);
    let out_alpha = sa * 255 + dst_weight;

    let mut out = [0u8; 4];
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * dst_weight;
        out[c] = ((num + out_alpha / 2) / out_alpha) as u8;
    }
    out[3] = ((out_alpha + 127) / 255) as u8;
    out
}
