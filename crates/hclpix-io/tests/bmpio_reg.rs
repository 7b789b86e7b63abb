//! BMP I/O regression test
//!
//! Tests reading and writing the BMP container through the file API:
//!   - lossless round trips for RGB and 8-bit RGB (tests 1-2)
//!   - 8-bit HCL round trip of a two-pixel image (tests 3-5)
//!   - 32 bpp with alpha, 24 bpp read with alpha (tests 6-8)
//!   - header probe (tests 9-11)
//!   - result codes for rejected files (tests 12-17)
//!
//! Run with:
//! ```
//! cargo test -p hclpix-io --test bmpio_reg -- --nocapture
//! ```

use hclpix_core::{DataFormat, Image, PlanesMut, ResultCode};
use hclpix_io::{
    ReadLimits, read_image, read_image_bytes_hcl, read_image_bytes_rgb, read_image_header,
    read_image_into, read_image_rgb, write_image_bytes_hcl, write_image_bytes_rgb,
};
use hclpix_test::{RegParams, synth};
use std::fs;

// ============================================================================
// Test 1-2: lossless round trips
// ============================================================================
#[test]
fn bmpio_reg_lossless() {
    let mut rp = RegParams::new("bmpio_lossless");

    // Test 1: 8-bit RGB, odd width so rows carry padding
    let bytes = synth::gradient_rgb(101, 37);
    rp.write_image_and_check(&bytes, DataFormat::RgbBytes, 0.0)
        .expect("rgb bytes");

    // Test 2: float RGB holding exact byte values
    let float: Image<f64> = synth::to_samples(&synth::color_bars(64, 9));
    rp.write_image_and_check(&float, DataFormat::Rgb, 0.0)
        .expect("rgb float");

    assert!(rp.cleanup());
}

// ============================================================================
// Test 3-5: two-pixel HCL bytes
//
// A 2x1 image of pure red and pure green, read as 8-bit RGB and as 8-bit
// HCL, then written from HCL and read back within one level.
// ============================================================================
#[test]
fn bmpio_reg_two_pixels() {
    let mut rp = RegParams::new("bmpio_two");

    let image =
        Image::from_channels(2, 1, vec![255u8, 0], vec![0, 255], vec![0, 0], None).expect("image");
    let path = rp.next_output_path("bmp").expect("path");
    write_image_bytes_rgb(&path, "", &image).expect("write");

    let limits = ReadLimits::default();
    let rgb = read_image_bytes_rgb(&path, "", &limits).expect("read rgb");
    // Test 3
    rp.compare_images(&image, &rgb, 0.0);

    let hcl = read_image_bytes_hcl(&path, "BMP", &limits).expect("read hcl");
    let hcl_path = hclpix_test::regout_path("bmpio_two", rp.index() + 1, "bmp");
    write_image_bytes_hcl(&hcl_path, "", &hcl).expect("write hcl");
    let back = read_image_bytes_rgb(&hcl_path, "", &limits).expect("read back");
    // Test 4
    rp.compare_images(&image, &back, 1.0);

    // Test 5: chroma is full for both pixels
    rp.compare_channels(&[255u8, 255], hcl.channel(1), 0.0);

    if !rp.display() {
        let _ = fs::remove_file(&path);
        let _ = fs::remove_file(&hcl_path);
    }
    assert!(rp.cleanup());
}

// ============================================================================
// Test 6-8: alpha
// ============================================================================
#[test]
fn bmpio_reg_alpha() {
    let mut rp = RegParams::new("bmpio_alpha");

    // Test 6: 32 bpp keeps alpha
    let rgba = synth::with_alpha_ramp(synth::gradient_rgb(30, 10));
    rp.write_image_and_check(&rgba, DataFormat::RgbBytes, 0.0)
        .expect("rgba");
    let path = hclpix_test::regout_path("bmpio_alpha", rp.index(), "bmp");

    // Test 7: the probe reports 32 bpp
    let header = read_image_header(&path).expect("header");
    rp.compare_values(32.0, header.bits_per_pixel as f64, 0.0);

    // Test 8: a 24 bpp file read into an alpha plane is opaque
    let rgb = synth::gradient_rgb(7, 3);
    let path24 = rp.next_output_path("bmp").expect("path");
    write_image_bytes_rgb(&path24, "", &rgb).expect("write 24");
    let mut red = vec![0u8; 21];
    let mut alpha = vec![0u8; 21];
    let planes = PlanesMut {
        c0: Some(&mut red[..]),
        alpha: Some(&mut alpha[..]),
        ..Default::default()
    };
    let dims = read_image_into(&path24, "", DataFormat::RgbBytes, &ReadLimits::default(), planes)
        .expect("read into");
    assert_eq!(dims, (7, 3));
    rp.compare_channels(&[255u8; 21], &alpha[..], 0.0);

    if !rp.display() {
        let _ = fs::remove_file(&path24);
    }
    assert!(rp.cleanup());
}

// ============================================================================
// Test 9-11: header probe
// ============================================================================
#[test]
fn bmpio_reg_header() {
    let mut rp = RegParams::new("bmpio_header");

    let image = synth::gradient_rgb(13, 5);
    rp.write_image_and_check(&image, DataFormat::RgbBytes, 0.0)
        .expect("write");
    let path = hclpix_test::regout_path("bmpio_header", rp.index(), "bmp");

    let header = read_image_header(&path).expect("header");
    // 13 pixels * 3 bytes = 39, padded to 40
    rp.compare_values(200.0, header.bitmap_size as f64, 0.0);
    rp.compare_values(254.0, header.file_size as f64, 0.0);
    rp.compare_values(
        fs::metadata(&path).expect("metadata").len() as f64,
        header.file_size as f64,
        0.0,
    );

    assert!(rp.cleanup());
}

// ============================================================================
// Test 12-16: result codes
// ============================================================================
#[test]
fn bmpio_reg_errors() {
    let mut rp = RegParams::new("bmpio_errors");
    let limits = ReadLimits::default();

    let image = synth::gradient_rgb(20, 20);
    let path = rp.next_output_path("bmp").expect("path");
    write_image_bytes_rgb(&path, "", &image).expect("write");
    let data = fs::read(&path).expect("read file");

    let code_of = |bytes: &[u8], limits: &ReadLimits| {
        fs::write(&path, bytes).expect("rewrite");
        ResultCode::of(&read_image::<u8, _>(&path, "", DataFormat::RgbBytes, limits))
    };

    // Test 12: limits smaller than the image
    let small = ReadLimits::default().with_max_height(19);
    rp.compare_values(
        ResultCode::BadDimension.value() as f64,
        code_of(&data, &small).value() as f64,
        0.0,
    );

    // Test 13: 16 bpp
    let mut bad = data.clone();
    bad[28..30].copy_from_slice(&16u16.to_le_bytes());
    rp.compare_values(
        ResultCode::UnsupportedFormat.value() as f64,
        code_of(&bad, &limits).value() as f64,
        0.0,
    );

    // Test 14: missing signature
    let mut bad = data.clone();
    bad[0..2].copy_from_slice(b"MB");
    rp.compare_values(
        ResultCode::InvalidFormat.value() as f64,
        code_of(&bad, &limits).value() as f64,
        0.0,
    );

    // Test 15: truncated pixel data
    rp.compare_values(
        ResultCode::ReadError.value() as f64,
        code_of(&data[..data.len() - 10], &limits).value() as f64,
        0.0,
    );

    // Test 16: the intact file still reads
    rp.compare_values(
        ResultCode::Ok.value() as f64,
        code_of(&data, &limits).value() as f64,
        0.0,
    );

    // Test 17: headers declaring a huge image with no pixel data behind them
    let mut huge = data[..54].to_vec();
    huge[18..22].copy_from_slice(&32768i32.to_le_bytes());
    huge[22..26].copy_from_slice(&32768i32.to_le_bytes());
    fs::write(&path, &huge).expect("rewrite");
    let result = read_image::<f64, _>(&path, "", DataFormat::Rgb, &limits);
    rp.compare_values(
        ResultCode::ReadError.value() as f64,
        ResultCode::of(&result).value() as f64,
        0.0,
    );

    let missing = read_image_rgb(path.with_extension("missing.bmp"), "", &limits);
    assert_eq!(ResultCode::of(&missing), ResultCode::FopenFailed);

    if !rp.display() {
        let _ = fs::remove_file(&path);
    }
    assert!(rp.cleanup());
}
