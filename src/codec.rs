//! Container decoding and PNG encoding.
//!
//! - `decode`: any raster format `image` can sniff from magic bytes, into RGB.
//! - `encode`: RGB grid to lossless PNG.
//! - `save_png`: 1- or 3-channel grid to a PNG file (debug dumps).
use crate::error::{DecodeError, EncodeError};
use crate::models::PixelGrid;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Decode an encoded image into a 3-channel RGB grid.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(DecodeError::UnknownFormat);
    }

    let rgb = reader.decode()?.into_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSize { width, height });
    }

    Ok(PixelGrid::from_raw(width, height, 3, rgb.into_raw())?)
}

/// Encode a 3-channel grid as PNG.
pub fn encode(grid: &PixelGrid) -> Result<Vec<u8>, EncodeError> {
    if grid.channels() != 3 {
        return Err(EncodeError::ChannelCount(grid.channels()));
    }
    encode_png(grid)
}

/// Write a grid of either channel count to `path` as PNG.
pub fn save_png(grid: &PixelGrid, path: &Path) -> Result<(), std::io::Error> {
    let bytes = encode_png(grid).map_err(std::io::Error::other)?;
    std::fs::write(path, bytes)
}

fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = grid.dimensions();
    let channels = grid.channels();
    let expected = width as usize * height as usize * channels;
    if grid.as_raw().len() != expected {
        return Err(EncodeError::BufferMismatch {
            width,
            height,
            expected,
            actual: grid.as_raw().len(),
        });
    }

    let color = match channels {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        other => return Err(EncodeError::ChannelCount(other)),
    };

    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(grid.as_raw(), width, height, color)?;
    Ok(out)
}
