//! Perceptual image difference
//!
//! Renders the difference between two RGB images of equal size. Each output
//! pixel blends a gray base (the mean luma of both inputs) with a tint whose
//! strength is the normalized RGB distance between the inputs: magenta where
//! the second image is brighter, green where the first is.

use crate::FilterResult;
use hclpix_core::color::luma;
use hclpix_core::{Error, Image, Planes, PlanesMut};
use log::debug;

/// Euclidean RGB distance between two pixels, scaled to [0, 1].
#[inline]
pub fn pixel_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let sum: f64 = a.iter().zip(&b).map(|(x, y)| (y - x) * (y - x)).sum();
    sum.sqrt() / 3f64.sqrt()
}

/// Difference rendering of one pixel pair.
#[inline]
pub fn diff_pixel(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let l1 = luma(a[0], a[1], a[2]);
    let l2 = luma(b[0], b[1], b[2]);
    let d = pixel_distance(a, b);

    let gray = (1.0 - d) * 0.5 * (l1 + l2);
    let magenta = d * l2;
    let green = d * l1;
    [gray + magenta, gray + green, gray + magenta]
}

/// Difference rendering of two RGB images.
///
/// The result has no alpha plane.
///
/// # Errors
///
/// Returns a [`Error::DimensionMismatch`] (reported as bad dimension) if the
/// images differ in size.
pub fn image_diff(first: &Image<f64>, second: &Image<f64>) -> FilterResult<Image<f64>> {
    if (first.width(), first.height()) != (second.width(), second.height()) {
        return Err(Error::DimensionMismatch {
            expected: (first.width(), first.height()),
            actual: (second.width(), second.height()),
        }
        .into());
    }

    let mut out = Image::new(first.width(), first.height())?;
    image_diff_planes(first.planes(), second.planes(), out.planes_mut())?;
    Ok(out)
}

/// Difference rendering over caller-owned planes.
///
/// All three primary planes are required on every side, and all must have
/// the same length. Alpha planes are ignored.
///
/// # Returns
///
/// The number of pixels rendered.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if a primary plane is missing
/// - [`Error::ChannelLength`] if plane lengths differ
pub fn image_diff_planes(
    first: Planes<'_, f64>,
    second: Planes<'_, f64>,
    out: PlanesMut<'_, f64>,
) -> FilterResult<usize> {
    let missing = || Error::InvalidParameter("all three color planes are required".into());
    let (Some(a0), Some(a1), Some(a2)) = (first.c0, first.c1, first.c2) else {
        return Err(missing().into());
    };
    let (Some(b0), Some(b1), Some(b2)) = (second.c0, second.c1, second.c2) else {
        return Err(missing().into());
    };
    let PlanesMut { c0, c1, c2, .. } = out;
    let (Some(o0), Some(o1), Some(o2)) = (c0, c1, c2) else {
        return Err(missing().into());
    };

    let n = a0.len();
    let lens = [a1.len(), a2.len(), b0.len(), b1.len(), b2.len(), o0.len(), o1.len(), o2.len()];
    if let Some((i, &actual)) = lens.iter().enumerate().find(|&(_, &len)| len != n) {
        return Err(Error::ChannelLength {
            channel: (i + 1) % 3,
            expected: n,
            actual,
        }
        .into());
    }

    let mut max_distance = 0.0f64;
    for i in 0..n {
        let a = [a0[i], a1[i], a2[i]];
        let b = [b0[i], b1[i], b2[i]];
        max_distance = max_distance.max(pixel_distance(a, b));
        let [r, g, bl] = diff_pixel(a, b);
        o0[i] = r;
        o1[i] = g;
        o2[i] = bl;
    }

    debug!(
        "Rendered difference of {} pixels, max distance {:.4}",
        n, max_distance
    );
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hclpix_core::ResultCode;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_pixel_distance() {
        assert_eq!(pixel_distance([0.2, 0.4, 0.6], [0.2, 0.4, 0.6]), 0.0);
        assert!((pixel_distance([0.0; 3], [1.0; 3]) - 1.0).abs() < EPS);
        assert!((pixel_distance([0.0; 3], [1.0, 0.0, 0.0]) - 1.0 / 3f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_identical_pixels_render_gray_luma() {
        let p = [0.9, 0.3, 0.1];
        let l = luma(p[0], p[1], p[2]);
        let out = diff_pixel(p, p);
        for v in out {
            assert!((v - l).abs() < EPS);
        }
    }

    #[test]
    fn test_black_to_white_is_magenta() {
        assert_eq!(diff_pixel([0.0; 3], [1.0; 3]).map(|v| (v * 1e9).round() / 1e9), [1.0, 0.0, 1.0]);
        assert_eq!(diff_pixel([1.0; 3], [0.0; 3]).map(|v| (v * 1e9).round() / 1e9), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_image_diff_of_self_is_luma() {
        let image = Image::from_channels(
            2,
            1,
            vec![0.1, 0.8],
            vec![0.5, 0.2],
            vec![0.9, 0.4],
            None,
        )
        .unwrap();
        let out = image_diff(&image, &image).unwrap();
        for i in 0..2 {
            let l = luma(image.channel(0)[i], image.channel(1)[i], image.channel(2)[i]);
            for ch in 0..3 {
                assert!((out.channel(ch)[i] - l).abs() < EPS);
            }
        }
        assert!(!out.has_alpha());
    }

    #[test]
    fn test_image_diff_size_mismatch() {
        let a = Image::<f64>::new(2, 2).unwrap();
        let b = Image::<f64>::new(2, 3).unwrap();
        let err = image_diff(&a, &b).unwrap_err();
        assert_eq!(err.code(), ResultCode::BadDimension);
    }

    #[test]
    fn test_planes_errors() {
        let a = [0.0f64; 2];
        let short = [0.0f64; 1];
        let (mut x, mut y, mut z) = ([0.0f64; 2], [0.0f64; 2], [0.0f64; 2]);
        let err = image_diff_planes(
            Planes::new(&a, &a, &a),
            Planes::new(&a, &short, &a),
            PlanesMut::new(&mut x, &mut y, &mut z),
        )
        .unwrap_err();
        assert_eq!(err.code(), ResultCode::BadDimension);

        let partial: Planes<'_, f64> = Planes {
            c0: Some(&a[..]),
            ..Default::default()
        };
        let err = image_diff_planes(
            partial,
            Planes::new(&a, &a, &a),
            PlanesMut::new(&mut x, &mut y, &mut z),
        )
        .unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidArgument);
    }
}
