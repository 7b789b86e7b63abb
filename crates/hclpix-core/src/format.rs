//! Data format selectors
//!
//! A [`DataFormat`] picks the color model a read or write works in and the
//! sample representation of the channel buffers.

use crate::error::{Error, Result};

/// Color model of the three primary channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorModel {
    /// Channels are red, green, blue
    Rgb,
    /// Channels are hue, chroma, luma
    Hcl,
}

/// Element type of a channel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// `f64` samples
    Float,
    /// `u8` samples
    Byte,
}

/// Data format of planar channel buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DataFormat {
    /// RGB channels as `f64` in [0, 1]
    Rgb = 1,
    /// HCL channels as `f64`
    Hcl = 2,
    /// RGB channels as `u8`
    RgbBytes = 3,
    /// HCL channels as `u8`, hue scaled by 255/6
    HclBytes = 4,
}

impl DataFormat {
    /// Look up a format from its integer selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for selectors other than 1..=4.
    pub fn from_selector(selector: i32) -> Result<Self> {
        match selector {
            1 => Ok(Self::Rgb),
            2 => Ok(Self::Hcl),
            3 => Ok(Self::RgbBytes),
            4 => Ok(Self::HclBytes),
            _ => Err(Error::InvalidParameter(format!(
                "unknown data format selector: {}",
                selector
            ))),
        }
    }

    /// Integer selector of this format.
    pub fn selector(self) -> i32 {
        self as i32
    }

    /// Color model of the primary channels.
    pub fn color_model(self) -> ColorModel {
        match self {
            Self::Rgb | Self::RgbBytes => ColorModel::Rgb,
            Self::Hcl | Self::HclBytes => ColorModel::Hcl,
        }
    }

    /// Sample representation of the channel buffers.
    pub fn sample_kind(self) -> SampleKind {
        match self {
            Self::Rgb | Self::Hcl => SampleKind::Float,
            Self::RgbBytes | Self::HclBytes => SampleKind::Byte,
        }
    }

    /// Build the format for a model and representation.
    pub fn from_parts(model: ColorModel, kind: SampleKind) -> Self {
        match (model, kind) {
            (ColorModel::Rgb, SampleKind::Float) => Self::Rgb,
            (ColorModel::Hcl, SampleKind::Float) => Self::Hcl,
            (ColorModel::Rgb, SampleKind::Byte) => Self::RgbBytes,
            (ColorModel::Hcl, SampleKind::Byte) => Self::HclBytes,
        }
    }

    /// Check that buffers of sample kind `kind` can carry this format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] on a mismatch, e.g. `HclBytes`
    /// with `f64` channels.
    pub fn check_sample_kind(self, kind: SampleKind) -> Result<()> {
        if self.sample_kind() == kind {
            Ok(())
        } else {
            Err(Error::InvalidParameter(format!(
                "{:?} requires {:?} samples, got {:?}",
                self,
                self.sample_kind(),
                kind
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_roundtrip() {
        for f in [
            DataFormat::Rgb,
            DataFormat::Hcl,
            DataFormat::RgbBytes,
            DataFormat::HclBytes,
        ] {
            assert_eq!(DataFormat::from_selector(f.selector()).unwrap(), f);
            assert_eq!(DataFormat::from_parts(f.color_model(), f.sample_kind()), f);
        }
        assert!(DataFormat::from_selector(0).is_err());
        assert!(DataFormat::from_selector(5).is_err());
    }

    #[test]
    fn test_check_sample_kind() {
        assert!(DataFormat::Hcl.check_sample_kind(SampleKind::Float).is_ok());
        assert!(DataFormat::HclBytes.check_sample_kind(SampleKind::Float).is_err());
    }
}
