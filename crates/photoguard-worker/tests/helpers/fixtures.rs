//! Synthesised test images.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// 4px vertical black/white bands: any blur flattens them to mid-grey.
pub fn banded_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if (x / 4) % 2 == 0 {
            Rgb([20, 20, 20])
        } else {
            Rgb([235, 235, 235])
        }
    })
}

/// Lossless encoding, so decoded pixels equal the source raster.
pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn jpeg_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    buffer
}

/// Mean absolute per-channel difference over a rectangle.
pub fn mean_difference(a: &RgbImage, b: &RgbImage, x: u32, y: u32, w: u32, h: u32) -> f64 {
    let mut total = 0u64;
    for py in y..y + h {
        for px in x..x + w {
            let pa = a.get_pixel(px, py);
            let pb = b.get_pixel(px, py);
            for c in 0..3 {
                total += (pa[c] as i32 - pb[c] as i32).unsigned_abs() as u64;
            }
        }
    }
    total as f64 / (w as f64 * h as f64 * 3.0)
}
