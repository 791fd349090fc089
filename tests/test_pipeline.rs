//! End-to-end tests for `process`.
//!
//! Tests cover:
//! - Round trips on synthetic square images (both polarities)
//! - Decode failures on empty, zero-length and corrupt input
//! - Dimension preservation across codecs
//! - Determinism and independent concurrent calls
//! - Debug dumps

mod common;

use contourlay::{DecodeError, Pipeline, PipelineError, Stage, process};

use common::*;

fn is_overlay(px: &image::Rgb<u8>) -> bool {
    px.0 == OVERLAY
}

#[test]
fn test_white_square_on_black_is_outlined() -> anyhow::Result<()> {
    // 1. Bright 20x20 square at (40, 40) on a black 100x100 canvas
    let input = encode_png(&square_image(100, 40, 20, 0, 255));

    // 2. One external contour hugging the square (blur may grow it by a pixel)
    let detection = Pipeline::new().run_detailed(&input)?;
    assert_eq!(detection.contours.len(), 1);
    let (lo, hi) = detection.contours[0].bounding_box();
    assert!((39..=40).contains(&lo.x) && (39..=40).contains(&lo.y), "min corner {lo:?}");
    assert!((59..=60).contains(&hi.x) && (59..=60).contains(&hi.y), "max corner {hi:?}");

    // 3. Output keeps the size and draws the stroke on the square's edge
    let out = decode_rgb(&detection.image);
    assert_eq!(out.dimensions(), (100, 100));
    for (x, y) in [(40, 50), (59, 50), (50, 40), (50, 59)] {
        assert!(is_overlay(out.get_pixel(x, y)), "edge pixel ({x}, {y}) not stroked");
    }

    // 4. Interior keeps its grayscale value, far background stays black
    assert_eq!(out.get_pixel(50, 50).0, [255, 255, 255]);
    assert_eq!(out.get_pixel(5, 5).0, [0, 0, 0]);

    // 5. Every stroked pixel lies within two pixels of the square outline
    for (x, y, px) in out.enumerate_pixels() {
        if is_overlay(px) {
            let near_outline = (37..=62).contains(&x) && (37..=62).contains(&y);
            let inside = (44..=55).contains(&x) && (44..=55).contains(&y);
            assert!(near_outline, "stray stroke at ({x}, {y})");
            assert!(!inside, "stroke inside square at ({x}, {y})");
        }
    }

    Ok(())
}

#[test]
fn test_black_square_on_white_traces_the_frame() -> anyhow::Result<()> {
    // The bright background is the foreground region; the square is a hole and
    // holes are not reported.
    let input = encode_png(&square_image(100, 40, 20, 255, 0));
    let detection = Pipeline::new().run_detailed(&input)?;

    assert_eq!(detection.contours.len(), 1);
    assert_eq!(
        detection.contours[0].points(),
        &[Point::new(0, 0), Point::new(0, 99), Point::new(99, 99), Point::new(99, 0)]
    );

    let out = decode_rgb(&detection.image);
    assert_eq!(out.dimensions(), (100, 100));
    assert!(is_overlay(out.get_pixel(0, 50)));
    assert!(is_overlay(out.get_pixel(1, 50)));
    assert_eq!(out.get_pixel(2, 50).0, [255, 255, 255]);
    assert_eq!(out.get_pixel(40, 50).0, [0, 0, 0]);
    assert_eq!(out.get_pixel(50, 50).0, [0, 0, 0]);

    Ok(())
}

#[test]
fn test_blank_image_has_no_strokes() -> anyhow::Result<()> {
    let input = encode_png(&square_image(32, 0, 0, 10, 10));
    let detection = Pipeline::new().run_detailed(&input)?;
    assert!(detection.contours.is_empty());

    let out = decode_rgb(&detection.image);
    assert!(out.pixels().all(|px| px.0 == [10, 10, 10]));
    Ok(())
}

#[test]
fn test_empty_input_is_decode_error() {
    let err = process(&[]).unwrap_err();
    assert!(matches!(err, PipelineError::Decode(DecodeError::Empty)));
    assert_eq!(err.code(), "DecodeError");
    assert_eq!(err.stage(), Stage::Decode);
}

#[test]
fn test_zero_length_jpeg_slice_matches_empty_input() {
    let jpeg = encode_jpeg(&square_image(16, 4, 8, 0, 255));
    let err = process(&jpeg[..0]).unwrap_err();
    assert!(matches!(err, PipelineError::Decode(DecodeError::Empty)));
}

#[test]
fn test_corrupt_inputs_are_decode_errors() {
    let png = encode_png(&square_image(16, 4, 8, 0, 255));

    let truncated = process(&png[..png.len() / 3]).unwrap_err();
    assert_eq!(truncated.code(), "DecodeError");

    let garbage = process(b"GIF? no, just text").unwrap_err();
    assert_eq!(garbage.code(), "DecodeError");
    assert!(!garbage.to_string().is_empty());
}

#[test]
fn test_jpeg_input_produces_png_of_same_size() -> anyhow::Result<()> {
    let input = encode_jpeg(&square_image(64, 20, 24, 0, 255));
    let output = process(&input)?;

    assert_eq!(image::guess_format(&output)?, image::ImageFormat::Png);
    assert_eq!(decode_rgb(&output).dimensions(), (64, 64));
    Ok(())
}

#[test]
fn test_non_square_dimensions_are_preserved() -> anyhow::Result<()> {
    let img = image::RgbImage::from_fn(37, 11, |x, y| {
        image::Rgb([(x * 7) as u8, (y * 23) as u8, 90])
    });
    let output = process(&encode_png(&img))?;
    assert_eq!(decode_rgb(&output).dimensions(), (37, 11));

    let tiny = image::RgbImage::from_pixel(1, 1, image::Rgb([200, 200, 200]));
    let output = process(&encode_png(&tiny))?;
    let out = decode_rgb(&output);
    assert_eq!(out.dimensions(), (1, 1));
    assert_eq!(out.get_pixel(0, 0).0, OVERLAY);
    Ok(())
}

#[test]
fn test_repeated_calls_are_identical() -> anyhow::Result<()> {
    let noise = lcg_bytes(7, 48 * 48 * 3);
    let img = image::RgbImage::from_raw(48, 48, noise).expect("sized buffer");
    let input = encode_png(&img);

    let first = process(&input)?;
    let second = process(&input)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_concurrent_calls_do_not_interfere() -> anyhow::Result<()> {
    let inputs: Vec<Vec<u8>> = (0..4)
        .map(|i| encode_png(&square_image(60, 5 + i * 8, 12, 0, 255)))
        .collect();
    let expected: Vec<Vec<u8>> = inputs.iter().map(|b| process(b)).collect::<Result<_, _>>()?;

    let pipeline = &Pipeline::new();
    let results: Vec<Vec<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || pipeline.run(input)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect::<Result<_, _>>()
    })?;

    assert_eq!(results, expected);
    Ok(())
}

#[test]
fn test_debug_mode_writes_stage_images() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let debug_dir = dir.path().join("stages");
    let pipeline = Pipeline::new().with_debug(debug_dir.clone())?;

    pipeline.run(&encode_png(&square_image(30, 10, 10, 0, 255)))?;

    for name in [
        "00_decode.png",
        "01_grayscale.png",
        "02_gaussian_blur.png",
        "03_threshold.png",
        "05_render.png",
    ] {
        let path = debug_dir.join(name);
        assert!(path.exists(), "missing {name}");
        let img = image::open(&path)?;
        assert_eq!((img.width(), img.height()), (30, 30));
    }

    let mask = image::open(debug_dir.join("03_threshold.png"))?.into_luma8();
    assert!(mask.pixels().all(|px| px.0[0] == 0 || px.0[0] == 255));
    Ok(())
}

#[test]
fn test_debug_dir_must_be_empty() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("leftover.txt"), b"x")?;

    let err = Pipeline::new().with_debug(dir.path().to_path_buf()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::DirectoryNotEmpty);
    Ok(())
}
