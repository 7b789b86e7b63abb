//! Pixel extraction and packing
//!
//! Bridges packed pixel words (the in-row representation of a bitmap) and
//! planar channel buffers. An [`ExtractorSet`] splits each decoded word into
//! up to four output planes; a [`Packer`] reads one sample from each input
//! plane and builds the word to encode. Both are bound once per call from the
//! [`DataFormat`] and advance a cursor by exactly one element per pixel.

use hclpix_core::color::{
    self, alpha, blue, chroma_of_bytes, compose_rgba, green, hue_of_bytes, luma_of_bytes, red,
};
use hclpix_core::{ColorModel, DataFormat, Hcl, PlanesMut, Sample};

/// Source of one channel value in a packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Red,
    Green,
    Blue,
    Alpha,
    Hue,
    Chroma,
    Luma,
}

impl Extractor {
    /// Extractors for channels 0, 1, 2 and alpha under a color model.
    pub fn set_for(model: ColorModel) -> [Extractor; 4] {
        match model {
            ColorModel::Rgb => [
                Extractor::Red,
                Extractor::Green,
                Extractor::Blue,
                Extractor::Alpha,
            ],
            ColorModel::Hcl => [
                Extractor::Hue,
                Extractor::Chroma,
                Extractor::Luma,
                Extractor::Alpha,
            ],
        }
    }

    /// Sample extracted from `word`.
    #[inline]
    pub fn extract<T: Sample>(self, word: u32) -> T {
        match self {
            Extractor::Red => T::from_byte(red(word)),
            Extractor::Green => T::from_byte(green(word)),
            Extractor::Blue => T::from_byte(blue(word)),
            Extractor::Alpha => T::from_byte(alpha(word)),
            Extractor::Hue => T::from_hue(hue_of_bytes(red(word), green(word), blue(word))),
            Extractor::Chroma => T::from_unit(chroma_of_bytes(red(word), green(word), blue(word))),
            Extractor::Luma => T::from_unit(luma_of_bytes(red(word), green(word), blue(word))),
        }
    }
}

/// One output plane with its extractor and write cursor.
struct Lane<'a, T> {
    extractor: Extractor,
    out: &'a mut [T],
    cursor: usize,
}

/// Extractors bound to the caller's output planes.
///
/// Planes that are `None` get no lane, so nothing is written or advanced for
/// them.
pub struct ExtractorSet<'a, T> {
    lanes: Vec<Lane<'a, T>>,
}

impl<'a, T: Sample> ExtractorSet<'a, T> {
    /// Bind the extractors of `format` to `planes`.
    ///
    /// Callers check beforehand that `format` matches `T` and that every
    /// plane is long enough for the image.
    pub fn new(format: DataFormat, planes: PlanesMut<'a, T>) -> Self {
        let extractors = Extractor::set_for(format.color_model());
        let PlanesMut { c0, c1, c2, alpha } = planes;
        let lanes = [c0, c1, c2, alpha]
            .into_iter()
            .zip(extractors)
            .filter_map(|(out, extractor)| {
                out.map(|out| Lane {
                    extractor,
                    out,
                    cursor: 0,
                })
            })
            .collect();
        Self { lanes }
    }

    /// Write one pixel into every bound plane.
    #[inline]
    pub fn extract(&mut self, word: u32) {
        for lane in &mut self.lanes {
            lane.out[lane.cursor] = lane.extractor.extract(word);
            lane.cursor += 1;
        }
    }

    /// Number of pixels written so far.
    pub fn position(&self) -> usize {
        self.lanes.first().map_or(0, |l| l.cursor)
    }
}

/// Reads channel samples and packs them into pixel words.
pub struct Packer<'a, T> {
    model: ColorModel,
    c0: &'a [T],
    c1: &'a [T],
    c2: &'a [T],
    alpha: Option<&'a [T]>,
    cursor: usize,
}

impl<'a, T: Sample> Packer<'a, T> {
    /// Bind a packer for `format` to the input planes.
    pub fn new(
        format: DataFormat,
        c0: &'a [T],
        c1: &'a [T],
        c2: &'a [T],
        alpha: Option<&'a [T]>,
    ) -> Self {
        Self {
            model: format.color_model(),
            c0,
            c1,
            c2,
            alpha,
            cursor: 0,
        }
    }

    /// Whether an alpha plane is bound.
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Pack the next pixel and advance.
    ///
    /// Without an alpha plane the alpha field is zero.
    #[inline]
    pub fn pack(&mut self) -> u32 {
        let i = self.cursor;
        let (s0, s1, s2) = (self.c0[i], self.c1[i], self.c2[i]);
        let (r, g, b) = match self.model {
            ColorModel::Rgb => (s0.to_byte(), s1.to_byte(), s2.to_byte()),
            ColorModel::Hcl => {
                let (r, g, b) = color::hcl_to_rgb(Hcl::new(s0.to_hue(), s1.to_unit(), s2.to_unit()));
                (color::quantize(r), color::quantize(g), color::quantize(b))
            }
        };
        let a = self.alpha.map_or(0, |plane| plane[i].to_byte());
        self.cursor += 1;
        compose_rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hclpix_core::color::{HUE_UNDEFINED, compose_rgb};

    #[test]
    fn test_rgb_byte_extraction() {
        let mut r = [0u8; 2];
        let mut g = [0u8; 2];
        let mut b = [0u8; 2];
        let mut set = ExtractorSet::new(
            DataFormat::RgbBytes,
            PlanesMut::new(&mut r, &mut g, &mut b),
        );
        set.extract(compose_rgb(255, 0, 0));
        set.extract(compose_rgb(1, 2, 3));
        assert_eq!(set.position(), 2);
        drop(set);
        assert_eq!(r, [255, 1]);
        assert_eq!(g, [0, 2]);
        assert_eq!(b, [0, 3]);
    }

    #[test]
    fn test_absent_planes_are_skipped() {
        let mut l = [0.0f64; 1];
        let planes = PlanesMut {
            c2: Some(&mut l[..]),
            ..Default::default()
        };
        let mut set = ExtractorSet::new(DataFormat::Hcl, planes);
        set.extract(compose_rgb(255, 255, 255));
        drop(set);
        assert!((l[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hcl_float_extraction() {
        let word = compose_rgb(0, 255, 0);
        assert!((Extractor::Hue.extract::<f64>(word) - 2.0).abs() < 1e-12);
        assert!((Extractor::Chroma.extract::<f64>(word) - 1.0).abs() < 1e-12);
        assert!((Extractor::Luma.extract::<f64>(word) - 0.7152).abs() < 1e-12);
        assert_eq!(Extractor::Hue.extract::<f64>(compose_rgb(7, 7, 7)), HUE_UNDEFINED);
    }

    #[test]
    fn test_hcl_byte_extraction() {
        // Green: hue 2/6 of 255 = 85
        let word = compose_rgb(0, 255, 0);
        assert_eq!(Extractor::Hue.extract::<u8>(word), 85);
        assert_eq!(Extractor::Chroma.extract::<u8>(word), 255);
        assert_eq!(Extractor::Luma.extract::<u8>(word), 182);
        // Undefined hue quantizes to 0
        assert_eq!(Extractor::Hue.extract::<u8>(compose_rgb(9, 9, 9)), 0);
    }

    #[test]
    fn test_alpha_from_24bit_word_is_opaque() {
        let word = u32::from_le_bytes([10, 20, 30, 0xff]);
        assert_eq!(Extractor::Alpha.extract::<u8>(word), 255);
        assert!((Extractor::Alpha.extract::<f64>(word) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pack_rgb_float_and_alpha() {
        let r = [1.0, 0.0];
        let g = [0.5, 0.0];
        let b = [0.0, 2.0];
        let a = [1.0, 0.0];
        let mut packer = Packer::new(DataFormat::Rgb, &r, &g, &b, Some(&a));
        assert!(packer.has_alpha());
        assert_eq!(packer.pack(), compose_rgba(255, 128, 0, 255));
        assert_eq!(packer.pack(), compose_rgba(0, 0, 255, 0));
    }

    fn hcl_bytes_roundtrip(word: u32) -> (u8, u8, u8) {
        let h = [Extractor::Hue.extract::<u8>(word)];
        let c = [Extractor::Chroma.extract::<u8>(word)];
        let l = [Extractor::Luma.extract::<u8>(word)];
        color::extract_rgb(Packer::new(DataFormat::HclBytes, &h, &c, &l, None).pack())
    }

    #[test]
    fn test_pack_hcl_bytes_roundtrip() {
        let colors = [
            (255u8, 0u8, 0u8),
            (0, 255, 0),
            (0, 0, 255),
            (10, 20, 30),
            (128, 128, 128),
        ];
        for (r, g, b) in colors {
            let (r2, g2, b2) = hcl_bytes_roundtrip(compose_rgb(r, g, b));
            for (x, y) in [(r, r2), (g, g2), (b, b2)] {
                assert!(
                    (x as i32 - y as i32).abs() <= 1,
                    "({r},{g},{b}) -> ({r2},{g2},{b2})"
                );
            }
        }

        // Hue quantization costs up to a couple of levels at high chroma
        assert_eq!(hcl_bytes_roundtrip(compose_rgb(12, 200, 99)), (12, 200, 101));
    }

    #[test]
    fn test_hue_byte_255_packs_gray() {
        // Hue just below 6 quantizes to 255, which decodes to 6
        let word = compose_rgb(255, 0, 1);
        assert_eq!(Extractor::Hue.extract::<u8>(word), 255);
        assert_eq!(Extractor::Luma.extract::<u8>(word), 54);
        assert_eq!(hcl_bytes_roundtrip(word), (54, 54, 54));
    }

    #[test]
    fn test_pack_hcl_float_is_exact() {
        let word = compose_rgb(12, 200, 99);
        let h = [Extractor::Hue.extract::<f64>(word)];
        let c = [Extractor::Chroma.extract::<f64>(word)];
        let l = [Extractor::Luma.extract::<f64>(word)];
        let packed = Packer::new(DataFormat::Hcl, &h, &c, &l, None).pack();
        assert_eq!(packed, word);
    }
}
