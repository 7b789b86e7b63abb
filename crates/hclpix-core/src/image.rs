//! Planar image buffers
//!
//! An [`Image`] stores three primary channels and an optional alpha channel
//! as separate planes, each holding exactly `width * height` samples.
//!
//! # Pixel layout
//!
//! - Pixel (x, y) lives at flat index `x + width * y`
//! - Row 0 is the bottom row (origin at the lower-left corner), matching the
//!   bottom-up row order of a bitmap file, so buffers are never flipped
//!
//! [`Planes`] and [`PlanesMut`] are the borrowed forms used when the caller
//! owns the buffers. Any of their channels may be absent.

use crate::error::{Error, Result};
use crate::sample::Sample;

/// Number of pixels in a `width x height` image, checked for overflow.
///
/// # Errors
///
/// Returns [`Error::InvalidDimension`] if either side is zero or the product
/// does not fit in `usize`.
pub fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimension { width, height })
}

/// Owned planar image
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T: Sample> {
    width: u32,
    height: u32,
    channels: [Vec<T>; 3],
    alpha: Option<Vec<T>>,
}

impl<T: Sample> Image<T> {
    /// Create a zero-filled image without alpha.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if `width` or `height` is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let n = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            channels: [vec![T::default(); n], vec![T::default(); n], vec![T::default(); n]],
            alpha: None,
        })
    }

    /// Create a zero-filled image with an alpha plane.
    pub fn new_with_alpha(width: u32, height: u32) -> Result<Self> {
        let mut image = Self::new(width, height)?;
        image.alpha = Some(vec![T::default(); image.len()]);
        Ok(image)
    }

    /// Create a zero-filled image, reporting allocation failure as an error.
    ///
    /// Every plane is reserved with `try_reserve_exact` before any is filled,
    /// so dimensions taken from untrusted input cannot abort the process.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if `width` or `height` is zero
    /// - [`Error::AllocationFailed`] if a plane cannot be allocated
    pub fn try_new(width: u32, height: u32, with_alpha: bool) -> Result<Self> {
        let n = pixel_count(width, height)?;
        let reserve = || -> Result<Vec<T>> {
            let mut plane = Vec::new();
            plane
                .try_reserve_exact(n)
                .map_err(|_| Error::AllocationFailed)?;
            Ok(plane)
        };

        let mut channels = [reserve()?, reserve()?, reserve()?];
        let mut alpha = if with_alpha { Some(reserve()?) } else { None };
        for plane in channels.iter_mut().chain(alpha.as_mut()) {
            plane.resize(n, T::default());
        }

        Ok(Self {
            width,
            height,
            channels,
            alpha,
        })
    }

    /// Build an image from existing planes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelLength`] if any plane does not hold exactly
    /// `width * height` samples.
    pub fn from_channels(
        width: u32,
        height: u32,
        c0: Vec<T>,
        c1: Vec<T>,
        c2: Vec<T>,
        alpha: Option<Vec<T>>,
    ) -> Result<Self> {
        let n = pixel_count(width, height)?;
        for (i, plane) in [Some(&c0), Some(&c1), Some(&c2), alpha.as_ref()]
            .into_iter()
            .enumerate()
        {
            if let Some(plane) = plane
                && plane.len() != n
            {
                return Err(Error::ChannelLength {
                    channel: i,
                    expected: n,
                    actual: plane.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            channels: [c0, c1, c2],
            alpha,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// Always false; images have at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    /// Whether the image carries an alpha plane
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Flat index of pixel (x, y).
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(x as usize + self.width as usize * y as usize)
        } else {
            None
        }
    }

    /// Plane `i` (0, 1 or 2).
    ///
    /// # Panics
    ///
    /// Panics if `i > 2`.
    pub fn channel(&self, i: usize) -> &[T] {
        &self.channels[i]
    }

    /// Mutable plane `i` (0, 1 or 2).
    ///
    /// # Panics
    ///
    /// Panics if `i > 2`.
    pub fn channel_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.channels[i]
    }

    /// The three primary planes.
    pub fn channels(&self) -> [&[T]; 3] {
        [
            self.channels[0].as_slice(),
            self.channels[1].as_slice(),
            self.channels[2].as_slice(),
        ]
    }

    /// Alpha plane, if any.
    pub fn alpha(&self) -> Option<&[T]> {
        self.alpha.as_deref()
    }

    /// Mutable alpha plane, if any.
    pub fn alpha_mut(&mut self) -> Option<&mut [T]> {
        self.alpha.as_deref_mut()
    }

    /// Replace or remove the alpha plane.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelLength`] if the plane has the wrong length.
    pub fn set_alpha(&mut self, alpha: Option<Vec<T>>) -> Result<()> {
        if let Some(plane) = &alpha
            && plane.len() != self.len()
        {
            return Err(Error::ChannelLength {
                channel: 3,
                expected: self.len(),
                actual: plane.len(),
            });
        }
        self.alpha = alpha;
        Ok(())
    }

    /// The three primary samples of pixel (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<[T; 3]> {
        let i = self.index(x, y)?;
        Some([self.channels[0][i], self.channels[1][i], self.channels[2][i]])
    }

    /// Set the three primary samples of pixel (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if (x, y) lies outside the image.
    pub fn set(&mut self, x: u32, y: u32, value: [T; 3]) -> Result<()> {
        let i = self.index(x, y).ok_or(Error::IndexOutOfBounds {
            index: x as usize + self.width as usize * y as usize,
            len: self.len(),
        })?;
        for (plane, v) in self.channels.iter_mut().zip(value) {
            plane[i] = v;
        }
        Ok(())
    }

    /// Borrow as read-only planes.
    pub fn planes(&self) -> Planes<'_, T> {
        Planes {
            c0: Some(self.channels[0].as_slice()),
            c1: Some(self.channels[1].as_slice()),
            c2: Some(self.channels[2].as_slice()),
            alpha: self.alpha.as_deref(),
        }
    }

    /// Borrow as writable planes.
    pub fn planes_mut(&mut self) -> PlanesMut<'_, T> {
        let [c0, c1, c2] = &mut self.channels;
        PlanesMut {
            c0: Some(c0.as_mut_slice()),
            c1: Some(c1.as_mut_slice()),
            c2: Some(c2.as_mut_slice()),
            alpha: self.alpha.as_deref_mut(),
        }
    }

    /// Decompose into `(width, height, planes, alpha)`.
    pub fn into_parts(self) -> (u32, u32, [Vec<T>; 3], Option<Vec<T>>) {
        (self.width, self.height, self.channels, self.alpha)
    }
}

/// Borrowed read-only planes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planes<'a, T> {
    pub c0: Option<&'a [T]>,
    pub c1: Option<&'a [T]>,
    pub c2: Option<&'a [T]>,
    pub alpha: Option<&'a [T]>,
}

impl<'a, T> Planes<'a, T> {
    /// Three primary planes without alpha.
    pub fn new(c0: &'a [T], c1: &'a [T], c2: &'a [T]) -> Self {
        Self {
            c0: Some(c0),
            c1: Some(c1),
            c2: Some(c2),
            alpha: None,
        }
    }

    /// Attach an alpha plane.
    pub fn with_alpha(mut self, alpha: &'a [T]) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Check that every present plane holds at least `n` samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelLength`] for the first short plane.
    pub fn check_len(&self, n: usize) -> Result<()> {
        check_lens([self.c0, self.c1, self.c2, self.alpha].map(|p| p.map(<[T]>::len)), n)
    }
}

/// Borrowed writable planes.
#[derive(Debug, Default)]
pub struct PlanesMut<'a, T> {
    pub c0: Option<&'a mut [T]>,
    pub c1: Option<&'a mut [T]>,
    pub c2: Option<&'a mut [T]>,
    pub alpha: Option<&'a mut [T]>,
}

impl<'a, T> PlanesMut<'a, T> {
    /// Three primary planes without alpha.
    pub fn new(c0: &'a mut [T], c1: &'a mut [T], c2: &'a mut [T]) -> Self {
        Self {
            c0: Some(c0),
            c1: Some(c1),
            c2: Some(c2),
            alpha: None,
        }
    }

    /// Attach an alpha plane.
    pub fn with_alpha(mut self, alpha: &'a mut [T]) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Check that every present plane holds at least `n` samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelLength`] for the first short plane.
    pub fn check_len(&self, n: usize) -> Result<()> {
        check_lens(
            [&self.c0, &self.c1, &self.c2, &self.alpha].map(|p| p.as_ref().map(|s| s.len())),
            n,
        )
    }
}

fn check_lens(lens: [Option<usize>; 4], n: usize) -> Result<()> {
    for (channel, len) in lens.into_iter().enumerate() {
        if let Some(actual) = len
            && actual < n
        {
            return Err(Error::ChannelLength {
                channel,
                expected: n,
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(Image::<u8>::new(0, 4).is_err());
        assert!(Image::<f64>::new(4, 0).is_err());
    }

    #[test]
    fn test_try_new() {
        let img = Image::<u8>::try_new(3, 2, true).unwrap();
        assert_eq!(img, {
            let mut expected = Image::<u8>::new(3, 2).unwrap();
            expected.set_alpha(Some(vec![0; 6])).unwrap();
            expected
        });
        assert!(!Image::<f64>::try_new(3, 2, false).unwrap().has_alpha());

        // More samples than the address space can hold
        let err = Image::<u8>::try_new(u32::MAX, u32::MAX, false).unwrap_err();
        assert!(matches!(err, Error::AllocationFailed));
        let err = Image::<f64>::try_new(0, 1, false).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { .. }));
    }

    #[test]
    fn test_index_is_bottom_up_row_major() {
        let img = Image::<u8>::new(4, 3).unwrap();
        assert_eq!(img.index(0, 0), Some(0));
        assert_eq!(img.index(3, 0), Some(3));
        assert_eq!(img.index(0, 1), Some(4));
        assert_eq!(img.index(2, 2), Some(10));
        assert_eq!(img.index(4, 0), None);
        assert_eq!(img.index(0, 3), None);
    }

    #[test]
    fn test_set_get() {
        let mut img = Image::<u8>::new(2, 2).unwrap();
        img.set(1, 1, [10, 20, 30]).unwrap();
        assert_eq!(img.get(1, 1), Some([10, 20, 30]));
        assert_eq!(img.channel(1)[3], 20);
        assert!(img.set(2, 0, [0, 0, 0]).is_err());
    }

    #[test]
    fn test_from_channels_checks_lengths() {
        let ok = Image::from_channels(2, 1, vec![1u8, 2], vec![3, 4], vec![5, 6], None);
        assert!(ok.is_ok());

        let err = Image::from_channels(2, 1, vec![1u8, 2], vec![3], vec![5, 6], None);
        assert!(matches!(
            err,
            Err(Error::ChannelLength {
                channel: 1,
                expected: 2,
                actual: 1
            })
        ));

        let err = Image::from_channels(2, 1, vec![1u8, 2], vec![3, 4], vec![5, 6], Some(vec![]));
        assert!(matches!(err, Err(Error::ChannelLength { channel: 3, .. })));
    }

    #[test]
    fn test_planes_check_len() {
        let a = [0u8; 4];
        let b = [0u8; 3];
        assert!(Planes::new(&a, &a, &a).check_len(4).is_ok());
        assert!(Planes::new(&a, &b, &a).check_len(4).is_err());

        let planes: Planes<'_, u8> = Planes {
            c0: Some(&a[..]),
            ..Default::default()
        };
        assert!(planes.check_len(4).is_ok());
    }

    #[test]
    fn test_pixel_count_overflow() {
        assert_eq!(pixel_count(3, 5).unwrap(), 15);
        assert!(pixel_count(0, 5).is_err());
    }
}
