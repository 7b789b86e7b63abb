//! Image difference regression test
//!
//! Tests the perceptual difference rendering:
//!   - an image compared with itself renders its luma as gray (test 1)
//!   - brightening part of an image tints only that part magenta (tests 2-4)
//!   - the rendering survives a BMP round trip (test 5)
//!
//! Run with:
//! ```
//! cargo test -p hclpix-filter --test imgdiff_reg -- --nocapture
//! ```

use hclpix_core::color::luma;
use hclpix_core::{DataFormat, Image};
use hclpix_filter::image_diff;
use hclpix_test::{RegParams, synth};

// ============================================================================
// Test 1: self difference
// ============================================================================
#[test]
fn imgdiff_reg_self() {
    let mut rp = RegParams::new("imgdiff_self");

    let image: Image<f64> = synth::to_samples(&synth::color_bars(48, 6));
    let out = image_diff(&image, &image).expect("diff");

    let [r, g, b] = image.channels();
    let worst = (0..image.len())
        .flat_map(|i| {
            let l = luma(r[i], g[i], b[i]);
            (0..3).map(move |ch| (ch, i, l))
        })
        .map(|(ch, i, l)| (out.channel(ch)[i] - l).abs())
        .fold(0.0, f64::max);
    rp.compare_values(0.0, worst, 1e-12);

    assert!(rp.cleanup());
}

// ============================================================================
// Test 2-5: localized change
//
// The right half of the second image is brighter. Unchanged pixels render
// as gray luma; changed pixels lean magenta (red and blue above green).
// ============================================================================
#[test]
fn imgdiff_reg_local_change() {
    let mut rp = RegParams::new("imgdiff_local");

    let width = 32;
    let height = 8;
    let first: Image<f64> = synth::to_samples(&synth::gradient_rgb(width, height));
    let mut second = first.clone();
    for y in 0..height {
        for x in width / 2..width {
            let p = second.get(x, y).expect("in bounds");
            second
                .set(x, y, p.map(|v| (v + 0.4).min(1.0)))
                .expect("in bounds");
        }
    }

    let out = image_diff(&first, &second).expect("diff");

    // Test 2: left half is neutral gray
    let mut neutral = true;
    let mut magenta = true;
    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = out.get(x, y).expect("in bounds");
            if x < width / 2 {
                neutral &= (r - g).abs() < 1e-12 && (g - b).abs() < 1e-12;
            } else {
                magenta &= r > g && (r - b).abs() < 1e-12;
            }
        }
    }
    rp.compare_values(1.0, if neutral { 1.0 } else { 0.0 }, 0.0);

    // Test 3: right half leans magenta
    rp.compare_values(1.0, if magenta { 1.0 } else { 0.0 }, 0.0);

    // Test 4: swapping the inputs turns magenta into green
    let swapped = image_diff(&second, &first).expect("diff");
    let [r, g, _] = swapped.get(width - 1, 0).expect("in bounds");
    rp.compare_values(1.0, if g > r { 1.0 } else { 0.0 }, 0.0);

    // Test 5: BMP round trip of the rendering
    rp.write_image_and_check(&out, DataFormat::Rgb, 0.5 / 255.0 + 1e-9)
        .expect("write diff");

    assert!(rp.cleanup());
}
