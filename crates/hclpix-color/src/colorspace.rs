//! Color space conversion
//!
//! Provides conversion between additive RGB and hue/chroma/luma (HCL) for
//! whole images and for caller-owned plane sets.
//!
//! Channels 0, 1, 2 hold R, G, B on the RGB side and H, C, L on the HCL side.
//! Alpha is carried through unchanged.

use crate::{ColorError, ColorResult};
use hclpix_core::color::{Hcl, hcl_to_rgb, rgb_to_hcl};
use hclpix_core::{Image, Planes, PlanesMut, Sample};
use log::debug;

type PixelFn<T> = fn(T, T, T) -> [T; 3];

#[inline]
fn pixel_rgb_to_hcl<T: Sample>(r: T, g: T, b: T) -> [T; 3] {
    let hcl = rgb_to_hcl(r.to_unit(), g.to_unit(), b.to_unit());
    [T::from_hue(hcl.h), T::from_unit(hcl.c), T::from_unit(hcl.l)]
}

#[inline]
fn pixel_hcl_to_rgb<T: Sample>(h: T, c: T, l: T) -> [T; 3] {
    let (r, g, b) = hcl_to_rgb(Hcl::new(h.to_hue(), c.to_unit(), l.to_unit()));
    [T::from_unit(r), T::from_unit(g), T::from_unit(b)]
}

fn convert_image<T: Sample>(image: &Image<T>, f: PixelFn<T>) -> ColorResult<Image<T>> {
    let n = image.len();
    let [s0, s1, s2] = image.channels();
    let mut d0 = Vec::with_capacity(n);
    let mut d1 = Vec::with_capacity(n);
    let mut d2 = Vec::with_capacity(n);

    for ((&a, &b), &c) in s0.iter().zip(s1).zip(s2) {
        let [x, y, z] = f(a, b, c);
        d0.push(x);
        d1.push(y);
        d2.push(z);
    }

    let alpha = image.alpha().map(<[T]>::to_vec);
    Ok(Image::from_channels(
        image.width(),
        image.height(),
        d0,
        d1,
        d2,
        alpha,
    )?)
}

fn convert_planes<T: Sample>(
    src: Planes<'_, T>,
    dst: PlanesMut<'_, T>,
    f: PixelFn<T>,
) -> ColorResult<usize> {
    let (Some(s0), Some(s1), Some(s2)) = (src.c0, src.c1, src.c2) else {
        return Err(ColorError::MissingPlane("source"));
    };
    let PlanesMut { c0, c1, c2, alpha } = dst;
    let (Some(d0), Some(d1), Some(d2)) = (c0, c1, c2) else {
        return Err(ColorError::MissingPlane("destination"));
    };

    let n = s0.len();
    let mut lens = vec![s1.len(), s2.len(), d0.len(), d1.len(), d2.len()];
    lens.extend(src.alpha.map(<[T]>::len));
    lens.extend(alpha.as_ref().map(|a| a.len()));
    if let Some(&actual) = lens.iter().find(|&&len| len != n) {
        return Err(ColorError::PlaneLength {
            expected: n,
            actual,
        });
    }

    for i in 0..n {
        let [x, y, z] = f(s0[i], s1[i], s2[i]);
        d0[i] = x;
        d1[i] = y;
        d2[i] = z;
    }

    match (src.alpha, alpha) {
        (Some(sa), Some(da)) => da.copy_from_slice(sa),
        (None, Some(da)) => da.fill(T::from_byte(255)),
        _ => {}
    }

    Ok(n)
}

/// Convert an RGB image to HCL
///
/// Gray pixels get the undefined hue: `-100.0` for `f64` samples, `0` for
/// `u8` samples.
///
/// # Errors
///
/// Only fails if the output image cannot be assembled.
pub fn convert_rgb_to_hcl<T: Sample>(image: &Image<T>) -> ColorResult<Image<T>> {
    debug!(
        "Converting {}x{} image from RGB to HCL",
        image.width(),
        image.height()
    );
    convert_image(image, pixel_rgb_to_hcl)
}

/// Convert an HCL image back to RGB
///
/// `u8` output is clamped to 0..=255. `f64` output is not clamped and may
/// fall slightly outside [0, 1] for colors near the gamut boundary.
///
/// # Errors
///
/// Only fails if the output image cannot be assembled.
pub fn convert_hcl_to_rgb<T: Sample>(image: &Image<T>) -> ColorResult<Image<T>> {
    debug!(
        "Converting {}x{} image from HCL to RGB",
        image.width(),
        image.height()
    );
    convert_image(image, pixel_hcl_to_rgb)
}

/// Convert RGB planes to HCL planes
///
/// All three planes are required on both sides and every present plane must
/// have the same length. Source alpha is copied when both sides carry it; a
/// destination alpha without a source is filled opaque.
///
/// # Returns
///
/// The number of pixels converted.
///
/// # Errors
///
/// - [`ColorError::MissingPlane`] if a primary plane is absent
/// - [`ColorError::PlaneLength`] if plane lengths differ
pub fn convert_planes_rgb_to_hcl<T: Sample>(
    src: Planes<'_, T>,
    dst: PlanesMut<'_, T>,
) -> ColorResult<usize> {
    convert_planes(src, dst, pixel_rgb_to_hcl)
}

/// Convert HCL planes to RGB planes
///
/// Same plane rules as [`convert_planes_rgb_to_hcl`].
pub fn convert_planes_hcl_to_rgb<T: Sample>(
    src: Planes<'_, T>,
    dst: PlanesMut<'_, T>,
) -> ColorResult<usize> {
    convert_planes(src, dst, pixel_hcl_to_rgb)
}
