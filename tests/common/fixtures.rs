#![allow(dead_code)]

use contourlay::{BinaryMask, PixelGrid};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Overlay stroke color used by the pipeline.
pub const OVERLAY: [u8; 3] = [255, 0, 0];

/// Creates a `size`x`size` image of `background` with a filled square of
/// `foreground` whose top-left corner is at (`origin`, `origin`).
pub fn square_image(size: u32, origin: u32, side: u32, background: u8, foreground: u8) -> RgbImage {
    ImageBuffer::from_fn(size, size, |x, y| {
        let inside = (origin..origin + side).contains(&x) && (origin..origin + side).contains(&y);
        let v = if inside { foreground } else { background };
        Rgb([v, v, v])
    })
}

pub fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode test PNG");
    out.into_inner()
}

pub fn encode_jpeg(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg)
        .expect("Failed to encode test JPEG");
    out.into_inner()
}

pub fn decode_rgb(bytes: &[u8]) -> RgbImage {
    image::load_from_memory(bytes)
        .expect("Pipeline output should decode")
        .into_rgb8()
}

/// Deterministic pseudo-random bytes (64-bit LCG), for noise fixtures.
pub fn lcg_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

/// Builds a mask from ASCII rows, `#` marking foreground.
pub fn mask_from_rows(rows: &[&str]) -> BinaryMask {
    let h = rows.len() as u32;
    let w = rows[0].len() as u32;
    let grid = PixelGrid::from_fn(w, h, |x, y| {
        [if rows[y as usize].as_bytes()[x as usize] == b'#' { 255 } else { 0 }]
    });
    BinaryMask::new(grid).expect("rows produce a binary mask")
}

/// Random mask with roughly `density`/256 foreground pixels.
pub fn noise_mask(seed: u64, width: u32, height: u32, density: u8) -> BinaryMask {
    let noise = lcg_bytes(seed, (width * height) as usize);
    let data = noise
        .into_iter()
        .map(|v| if v < density { 255 } else { 0 })
        .collect();
    let grid = PixelGrid::from_raw(width, height, 1, data).expect("sized buffer");
    BinaryMask::new(grid).expect("binary values")
}
