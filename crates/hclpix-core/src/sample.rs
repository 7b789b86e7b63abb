//! Channel sample types
//!
//! Planar channels hold either `f64` values (normalized RGB, chroma and
//! luma in [0, 1], hue in [0, 6)) or quantized `u8` values (hue scaled so
//! that 6 maps to 255). The [`Sample`] trait converts between a sample and
//! the values the codec and color math work with, so that the same code
//! path serves both representations.

use crate::color::{HUE_RANGE, dequantize, quantize};
use crate::format::SampleKind;

/// A scalar element of a planar channel buffer.
pub trait Sample: Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Which representation this type is.
    const KIND: SampleKind;

    /// Sample for an 8-bit component.
    fn from_byte(byte: u8) -> Self;

    /// 8-bit component for this sample.
    fn to_byte(self) -> u8;

    /// Sample for a normalized value in [0, 1].
    fn from_unit(value: f64) -> Self;

    /// Normalized value of this sample.
    fn to_unit(self) -> f64;

    /// Sample for a hue in [0, 6) (or the undefined sentinel).
    fn from_hue(hue: f64) -> Self;

    /// Hue carried by this sample.
    fn to_hue(self) -> f64;
}

impl Sample for f64 {
    const KIND: SampleKind = SampleKind::Float;

    #[inline]
    fn from_byte(byte: u8) -> Self {
        dequantize(byte)
    }

    #[inline]
    fn to_byte(self) -> u8 {
        quantize(self)
    }

    #[inline]
    fn from_unit(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_unit(self) -> f64 {
        self
    }

    #[inline]
    fn from_hue(hue: f64) -> Self {
        hue
    }

    #[inline]
    fn to_hue(self) -> f64 {
        self
    }
}

impl Sample for u8 {
    const KIND: SampleKind = SampleKind::Byte;

    #[inline]
    fn from_byte(byte: u8) -> Self {
        byte
    }

    #[inline]
    fn to_byte(self) -> u8 {
        self
    }

    #[inline]
    fn from_unit(value: f64) -> Self {
        quantize(value)
    }

    #[inline]
    fn to_unit(self) -> f64 {
        dequantize(self)
    }

    /// Undefined hue clamps to 0, i.e. it reads back as red with whatever
    /// chroma accompanies it (zero for a gray pixel).
    #[inline]
    fn from_hue(hue: f64) -> Self {
        quantize(hue / HUE_RANGE)
    }

    /// Byte 255 decodes to exactly 6, which reconstructs as gray.
    #[inline]
    fn to_hue(self) -> f64 {
        HUE_RANGE * f64::from(self) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HUE_UNDEFINED;

    #[test]
    fn test_float_is_identity_for_unit_and_hue() {
        assert_eq!(f64::from_unit(0.375), 0.375);
        assert_eq!(0.375f64.to_unit(), 0.375);
        assert_eq!(f64::from_hue(4.5), 4.5);
        assert_eq!(4.5f64.to_hue(), 4.5);
    }

    #[test]
    fn test_byte_hue_scaling() {
        assert_eq!(u8::from_hue(0.0), 0);
        assert_eq!(u8::from_hue(3.0), 128);
        assert_eq!(u8::from_hue(HUE_UNDEFINED), 0);
        assert_eq!(255u8.to_hue(), HUE_RANGE);
        assert!((254u8.to_hue() - 6.0 * 254.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_byte_roundtrip_through_float() {
        for b in 0..=255u8 {
            assert_eq!(f64::from_byte(b).to_byte(), b);
            assert_eq!(u8::from_unit(b.to_unit()), b);
        }
    }
}
