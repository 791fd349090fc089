pub mod contours;
pub mod preprocessing;
pub mod render;

use crate::models::{ContourSet, PixelGrid};

/// Side length of the square Gaussian kernel.
pub const BLUR_KERNEL_SIZE: usize = 5;
/// `None` derives sigma from the kernel size (1.1 for a 5×5 kernel).
pub const BLUR_SIGMA: Option<f32> = None;
/// Smoothed intensities at or above this value become foreground.
pub const THRESHOLD_CUTOFF: u8 = 80;
/// Overlay stroke color, RGB.
pub const CONTOUR_COLOR: [u8; 3] = [255, 0, 0];
/// Overlay stroke width in pixels.
pub const CONTOUR_THICKNESS: u32 = 3;

/// Grayscale, blur, threshold and trace an RGB grid with the fixed policy.
///
/// Handy for inspecting what `process` would draw without encoding anything.
pub fn find_contours(rgb: &PixelGrid) -> ContourSet {
    let gray = preprocessing::to_grayscale(rgb);
    let blurred = preprocessing::gaussian_blur(&gray, BLUR_KERNEL_SIZE, BLUR_SIGMA);
    let mask = preprocessing::threshold(&blurred, THRESHOLD_CUTOFF);
    contours::trace_external_contours(&mask)
}
