//! Packed pixel words and RGB <-> HCL color math.
//!
//! # Pixel word format
//!
//! Packed pixels are `u32` words laid out as `0xAARRGGBB`: blue in the low
//! byte, then green, red and alpha. Written little-endian this is the
//! B, G, R[, A] byte order of a bitmap row, so a 24-bit pixel is simply the
//! low three bytes of the word.
//!
//! # HCL
//!
//! Hue lies in [0, 6), one unit per 60° sector (0 red, 2 green, 4 blue).
//! Chroma is `max - min` of the RGB components. Luma uses the Rec. 709
//! weights. When chroma is zero the hue is undefined and carries the
//! sentinel [`HUE_UNDEFINED`].

/// Blue field shift
pub const BLUE_SHIFT: u32 = 0;
/// Green field shift
pub const GREEN_SHIFT: u32 = 8;
/// Red field shift
pub const RED_SHIFT: u32 = 16;
/// Alpha field shift
pub const ALPHA_SHIFT: u32 = 24;

/// Rec. 709 luma weight of red.
pub const LUMA_COEFF_R: f64 = 0.2126;
/// Rec. 709 luma weight of green.
pub const LUMA_COEFF_G: f64 = 0.7152;
/// Rec. 709 luma weight of blue.
pub const LUMA_COEFF_B: f64 = 0.0722;

/// Hue of an achromatic pixel.
pub const HUE_UNDEFINED: f64 = -100.0;

/// Number of hue units in a full turn.
pub const HUE_RANGE: f64 = 6.0;

const RECIPROCAL_255: f64 = 1.0 / 255.0;
const TINY_LUMA_COEFF_R: f64 = RECIPROCAL_255 * LUMA_COEFF_R;
const TINY_LUMA_COEFF_G: f64 = RECIPROCAL_255 * LUMA_COEFF_G;
const TINY_LUMA_COEFF_B: f64 = RECIPROCAL_255 * LUMA_COEFF_B;

/// Extract the red byte of a packed word.
#[inline]
pub fn red(word: u32) -> u8 {
    ((word >> RED_SHIFT) & 0xff) as u8
}

/// Extract the green byte of a packed word.
#[inline]
pub fn green(word: u32) -> u8 {
    ((word >> GREEN_SHIFT) & 0xff) as u8
}

/// Extract the blue byte of a packed word.
#[inline]
pub fn blue(word: u32) -> u8 {
    ((word >> BLUE_SHIFT) & 0xff) as u8
}

/// Extract the alpha byte of a packed word.
#[inline]
pub fn alpha(word: u32) -> u8 {
    ((word >> ALPHA_SHIFT) & 0xff) as u8
}

/// Compose a packed word with a zero alpha field.
#[inline]
pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT)
}

/// Compose a packed word.
#[inline]
pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    compose_rgb(r, g, b) | ((a as u32) << ALPHA_SHIFT)
}

/// Extract the RGB bytes of a packed word.
#[inline]
pub fn extract_rgb(word: u32) -> (u8, u8, u8) {
    (red(word), green(word), blue(word))
}

/// Quantize a normalized value to 8 bits.
///
/// The value is clamped to [0, 1] and rounded half up, so 0.5 maps to 128.
#[inline]
pub fn quantize(value: f64) -> u8 {
    if value > 1.0 {
        255
    } else if value < 0.0 {
        0
    } else {
        (255.0 * value + 0.5) as u8
    }
}

/// Map an 8-bit value back to [0, 1].
#[inline]
pub fn dequantize(byte: u8) -> f64 {
    RECIPROCAL_255 * byte as f64
}

/// Return `(min, max)` of three values.
#[inline]
pub fn min_max3<T: PartialOrd + Copy>(v1: T, v2: T, v3: T) -> (T, T) {
    let (mut vmin, vmid) = if v2 <= v3 { (v2, v3) } else { (v3, v2) };
    if v1 <= vmid {
        if v1 <= vmin {
            vmin = v1;
        }
        (vmin, vmid)
    } else {
        (vmin, v1)
    }
}

/// Rec. 709 luma of normalized RGB.
#[inline]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    LUMA_COEFF_R * r + LUMA_COEFF_G * g + LUMA_COEFF_B * b
}

/// Rec. 709 luma of 8-bit RGB, normalized to [0, 1].
#[inline]
pub fn luma_of_bytes(r: u8, g: u8, b: u8) -> f64 {
    TINY_LUMA_COEFF_R * r as f64 + TINY_LUMA_COEFF_G * g as f64 + TINY_LUMA_COEFF_B * b as f64
}

/// Hue of 8-bit RGB computed in integer arithmetic.
///
/// Returns [`HUE_UNDEFINED`] when all three components are equal.
pub fn hue_of_bytes(r: u8, g: u8, b: u8) -> f64 {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let (lo, hi) = min_max3(r, g, b);
    let c = hi - lo;
    if c == 0 {
        return HUE_UNDEFINED;
    }

    let h = if hi == r {
        ((g - b) + 6 * c).rem_euclid(6 * c)
    } else if hi == g {
        (b - r) + 2 * c
    } else {
        (r - g) + 4 * c
    };
    h as f64 / c as f64
}

/// Chroma of 8-bit RGB, normalized to [0, 1].
#[inline]
pub fn chroma_of_bytes(r: u8, g: u8, b: u8) -> f64 {
    let (lo, hi) = min_max3(r, g, b);
    dequantize(hi - lo)
}

/// Hue, chroma and luma of one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    /// Hue in [0, 6), or [`HUE_UNDEFINED`]
    pub h: f64,
    /// Chroma in [0, 1]
    pub c: f64,
    /// Luma in [0, 1]
    pub l: f64,
}

impl Hcl {
    /// Create a new HCL triple
    pub fn new(h: f64, c: f64, l: f64) -> Self {
        Self { h, c, l }
    }

    /// Whether the hue is undefined (gray pixel).
    pub fn is_achromatic(&self) -> bool {
        self.h < 0.0
    }
}

/// Convert normalized RGB to HCL.
pub fn rgb_to_hcl(r: f64, g: f64, b: f64) -> Hcl {
    let (lo, hi) = min_max3(r, g, b);
    let c = hi - lo;

    let h = if c <= 0.0 {
        HUE_UNDEFINED
    } else {
        let h = if hi == r {
            ((g - b) + 6.0 * c) % (6.0 * c)
        } else if hi == g {
            (b - r) + 2.0 * c
        } else {
            (r - g) + 4.0 * c
        };
        h / c
    };

    Hcl { h, c, l: luma(r, g, b) }
}

/// Convert HCL to normalized RGB.
///
/// An undefined hue (or one at or beyond 6) reconstructs a gray pixel.
/// The result is shifted so that its luma equals `hcl.l`; components are
/// not clamped.
pub fn hcl_to_rgb(hcl: Hcl) -> (f64, f64, f64) {
    let Hcl { h, c, l } = hcl;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());

    let (r, g, b) = if h < 0.0 {
        (0.0, 0.0, 0.0)
    } else if h < 1.0 {
        (c, x, 0.0)
    } else if h < 2.0 {
        (x, c, 0.0)
    } else if h < 3.0 {
        (0.0, c, x)
    } else if h < 4.0 {
        (0.0, x, c)
    } else if h < 5.0 {
        (x, 0.0, c)
    } else if h < 6.0 {
        (c, 0.0, x)
    } else {
        (0.0, 0.0, 0.0)
    };

    let m = l - luma(r, g, b);
    (r + m, g + m, b + m)
}
