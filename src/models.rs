use crate::error::GridError;

/// Owned 8-bit pixel buffer, row-major, `channels` interleaved samples per pixel.
///
/// The buffer length is always `width * height * channels`; every constructor
/// checks it, so a grid can never hold ragged rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap an existing buffer, validating channel count and length.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, GridError> {
        if channels != 1 && channels != 3 {
            return Err(GridError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Crate-internal constructor for buffers sized by the caller.
    pub(crate) fn new_unchecked(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * channels);
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel. `C` must be 1 or 3.
    pub fn from_fn<const C: usize>(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; C],
    ) -> Self {
        const { assert!(C == 1 || C == 3, "pixel grids hold 1 or 3 channels") };
        let mut data = Vec::with_capacity(width as usize * height as usize * C);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            channels: C,
            data,
        }
    }

    /// Single-channel grid filled with `value`.
    pub fn filled_gray(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            channels: 1,
            data: vec![value; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Samples of the pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let i = self.offset(x, y);
        &self.data[i..i + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let i = self.offset(x, y);
        let c = self.channels;
        &mut self.data[i..i + c]
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }
}

/// Single-channel grid whose samples are only ever 0 or 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask(PixelGrid);

impl BinaryMask {
    pub const BACKGROUND: u8 = 0;
    pub const FOREGROUND: u8 = 255;

    /// Wrap a grid that already satisfies the two-value invariant.
    pub fn new(grid: PixelGrid) -> Result<Self, GridError> {
        if grid.channels() != 1 {
            return Err(GridError::UnsupportedChannels(grid.channels()));
        }
        if let Some(&value) = grid
            .as_raw()
            .iter()
            .find(|&&v| v != Self::BACKGROUND && v != Self::FOREGROUND)
        {
            return Err(GridError::NotBinary(value));
        }
        Ok(Self(grid))
    }

    /// Skips the value scan; callers guarantee every sample is 0 or 255.
    pub(crate) fn new_unchecked(grid: PixelGrid) -> Self {
        Self(grid)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.0.pixel(x, y)[0] == Self::FOREGROUND
    }

    pub fn as_grid(&self) -> &PixelGrid {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed polygon through the direction-change pixels of one outer border.
///
/// The last point implicitly connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Returns `None` for an empty point list.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed polyline edges, including last → first.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Inclusive (min, max) corners of the axis-aligned bounding box.
    pub fn bounding_box(&self) -> (Point, Point) {
        let first = self.points[0];
        self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        })
    }
}

/// External contours in the order their first pixel was met by the raster scan.
pub type ContourSet = Vec<Contour>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_ragged_buffers() {
        let err = PixelGrid::from_raw(4, 4, 3, vec![0; 47]).unwrap_err();
        assert!(matches!(err, GridError::LengthMismatch { expected: 48, actual: 47 }));
    }

    #[test]
    fn from_fn_takes_channel_count_from_pixel_width() {
        let gray = PixelGrid::from_fn(4, 2, |x, y| [(x + y) as u8]);
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.pixel(3, 1), &[4]);

        let rgb = PixelGrid::from_fn(4, 2, |x, y| [x as u8, y as u8, 9]);
        assert_eq!(rgb.channels(), 3);
        assert_eq!(rgb.as_raw().len(), 4 * 2 * 3);
        assert_eq!(rgb.pixel(2, 1), &[2, 1, 9]);
    }

    #[test]
    fn binary_mask_rejects_intermediate_values() {
        let grid = PixelGrid::from_fn(3, 1, |x, _| [if x == 1 { 128 } else { 255 }]);
        assert!(matches!(BinaryMask::new(grid), Err(GridError::NotBinary(128))));
    }

    #[test]
    fn segments_close_the_polygon() {
        let points = vec![Point::new(0, 0), Point::new(0, 2), Point::new(2, 2)];
        let contour = Contour::new(points).unwrap();
        let last = contour.segments().last().unwrap();
        assert_eq!(last, (Point::new(2, 2), Point::new(0, 0)));
        assert_eq!(contour.bounding_box(), (Point::new(0, 0), Point::new(2, 2)));
    }
}
