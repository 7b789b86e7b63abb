//! Synthetic test images
//!
//! Deterministic generators, so regression tests need no image files on disk.

use hclpix_core::{Image, Sample};

/// Scale `i` in `0..n` onto `0..=255`.
fn ramp(i: u32, n: u32) -> u8 {
    if n <= 1 {
        0
    } else {
        (i as u64 * 255 / (n as u64 - 1)) as u8
    }
}

/// RGB gradient: red follows x, green follows y, blue varies diagonally.
pub fn gradient_rgb(width: u32, height: u32) -> Image<u8> {
    let mut image = Image::new(width, height).unwrap_or_else(|e| panic!("gradient_rgb: {e}"));
    for y in 0..height {
        for x in 0..width {
            let b = ((x + y) * 7 % 256) as u8;
            let _ = image.set(x, y, [ramp(x, width), ramp(y, height), b]);
        }
    }
    image
}

/// Vertical bars of white, the primaries, the secondaries and black.
pub fn color_bars(width: u32, height: u32) -> Image<u8> {
    const BARS: [[u8; 3]; 8] = [
        [255, 255, 255],
        [255, 255, 0],
        [0, 255, 255],
        [0, 255, 0],
        [255, 0, 255],
        [255, 0, 0],
        [0, 0, 255],
        [0, 0, 0],
    ];
    let mut image = Image::new(width, height).unwrap_or_else(|e| panic!("color_bars: {e}"));
    for y in 0..height {
        for x in 0..width {
            let bar = (x as usize * BARS.len()) / width as usize;
            let _ = image.set(x, y, BARS[bar]);
        }
    }
    image
}

/// Attach an alpha plane that ramps along x.
pub fn with_alpha_ramp(mut image: Image<u8>) -> Image<u8> {
    let width = image.width();
    let alpha = (0..image.len() as u32)
        .map(|i| ramp(i % width, width))
        .collect();
    image
        .set_alpha(Some(alpha))
        .unwrap_or_else(|e| panic!("with_alpha_ramp: {e}"));
    image
}

/// Convert every plane with `T::from_byte`.
pub fn to_samples<T: Sample>(image: &Image<u8>) -> Image<T> {
    let convert = |plane: &[u8]| plane.iter().map(|&v| T::from_byte(v)).collect::<Vec<T>>();
    let [c0, c1, c2] = image.channels();
    Image::from_channels(
        image.width(),
        image.height(),
        convert(c0),
        convert(c1),
        convert(c2),
        image.alpha().map(convert),
    )
    .unwrap_or_else(|e| panic!("to_samples: {e}"))
}

/// Deterministic levels crowded into the dark end of the range.
///
/// Uses a fixed linear congruential sequence; values are squared toward 0 so
/// a histogram is strongly skewed.
pub fn skewed_levels(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let v = state >> 24;
            (v * v / 255) as u8
        })
        .collect()
}
