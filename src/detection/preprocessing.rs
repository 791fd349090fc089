use crate::models::{BinaryMask, PixelGrid};

/// Fixed-point BT.601 luma weights (R, G, B); they sum to `1 << LUMA_SHIFT`.
pub const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];
pub const LUMA_SHIFT: u32 = 14;

/// Convert an RGB grid to single-channel intensity.
///
/// Gray inputs (all channels equal) come out unchanged.
pub fn to_grayscale(rgb: &PixelGrid) -> PixelGrid {
    assert_eq!(rgb.channels(), 3, "grayscale conversion expects an RGB grid");

    let round = 1u32 << (LUMA_SHIFT - 1);
    let data = rgb
        .as_raw()
        .chunks_exact(3)
        .map(|px| {
            let y = LUMA_WEIGHTS[0] * px[0] as u32
                + LUMA_WEIGHTS[1] * px[1] as u32
                + LUMA_WEIGHTS[2] * px[2] as u32;
            ((y + round) >> LUMA_SHIFT) as u8
        })
        .collect();

    PixelGrid::new_unchecked(rgb.width(), rgb.height(), 1, data)
}

/// Widen a gray grid to RGB by replicating the intensity.
pub fn gray_to_rgb(gray: &PixelGrid) -> PixelGrid {
    assert_eq!(gray.channels(), 1, "expected a single-channel grid");

    let data = gray.as_raw().iter().flat_map(|&v| [v, v, v]).collect();
    PixelGrid::new_unchecked(gray.width(), gray.height(), 3, data)
}

/// Sigma used when none is supplied: `0.3 * ((ksize - 1) / 2 - 1) + 0.8`.
pub fn default_sigma(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized square Gaussian kernel, kept in separable form.
///
/// The 2-D weight at `(i, j)` is `taps[i] * taps[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    sigma: f32,
    taps: Vec<f32>,
}

impl Kernel {
    /// Sample `exp(-d² / 2σ²)` at integer offsets from the centre and normalize.
    ///
    /// A missing or non-positive sigma falls back to [`default_sigma`].
    pub fn gaussian(size: usize, sigma: Option<f32>) -> Self {
        assert!(size % 2 == 1, "kernel size must be odd, got {size}");

        let sigma = match sigma {
            Some(s) if s > 0.0 => s,
            _ => default_sigma(size),
        };
        let half = (size / 2) as i32;
        let scale = -0.5 / (sigma * sigma);
        let mut taps: Vec<f32> = (-half..=half).map(|d| ((d * d) as f32 * scale).exp()).collect();
        let sum: f32 = taps.iter().sum();
        for t in &mut taps {
            *t /= sum;
        }

        Self { sigma, taps }
    }

    /// Width (and height) of the square kernel.
    pub fn size(&self) -> usize {
        self.taps.len()
    }

    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f32 {
        self.taps[i] * self.taps[j]
    }
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`gfedcb|abcdefgh|gfedcba`).
#[inline]
pub(crate) fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = i.rem_euclid(period);
    if m < len as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}

/// Gaussian smoothing of a gray grid; output has the input's dimensions.
///
/// Runs a horizontal then a vertical 1-D pass over an `f32` buffer and rounds
/// once at the end, which matches a direct 2-D convolution up to float error.
pub fn gaussian_blur(gray: &PixelGrid, kernel_size: usize, sigma: Option<f32>) -> PixelGrid {
    assert_eq!(gray.channels(), 1, "blur expects a single-channel grid");

    let kernel = Kernel::gaussian(kernel_size, sigma);
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let r = kernel.radius() as isize;
    let taps = kernel.taps();
    let src = gray.as_raw();

    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        let out = &mut horizontal[y * w..(y + 1) * w];
        for (x, slot) in out.iter_mut().enumerate() {
            *slot = taps
                .iter()
                .enumerate()
                .map(|(k, &t)| t * row[reflect_101(x as isize + k as isize - r, w)] as f32)
                .sum();
        }
    }

    let mut data = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let acc: f32 = taps
                .iter()
                .enumerate()
                .map(|(k, &t)| t * horizontal[reflect_101(y as isize + k as isize - r, h) * w + x])
                .sum();
            data.push(saturate_u8(acc));
        }
    }

    PixelGrid::new_unchecked(gray.width(), gray.height(), 1, data)
}

#[inline]
fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Global binary threshold: foreground where `v >= cutoff`, background elsewhere.
pub fn threshold(gray: &PixelGrid, cutoff: u8) -> BinaryMask {
    assert_eq!(gray.channels(), 1, "threshold expects a single-channel grid");

    let data = gray
        .as_raw()
        .iter()
        .map(|&v| {
            if v >= cutoff {
                BinaryMask::FOREGROUND
            } else {
                BinaryMask::BACKGROUND
            }
        })
        .collect();

    BinaryMask::new_unchecked(PixelGrid::new_unchecked(gray.width(), gray.height(), 1, data))
}
