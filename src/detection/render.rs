use crate::detection::preprocessing::gray_to_rgb;
use crate::models::{ContourSet, PixelGrid, Point};

/// Offsets covered by a round brush of the given diameter.
fn brush(thickness: u32) -> Vec<(i32, i32)> {
    let radius = thickness.max(1) as f32 / 2.0;
    let reach = radius.floor() as i32;
    let limit = radius * radius;
    let mut offsets = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if (dx * dx + dy * dy) as f32 <= limit {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

struct Canvas<'a> {
    grid: &'a mut PixelGrid,
    color: [u8; 3],
    brush: &'a [(i32, i32)],
}

impl Canvas<'_> {
    fn dab(&mut self, p: Point) {
        let (w, h) = (self.grid.width() as i32, self.grid.height() as i32);
        for &(dx, dy) in self.brush {
            let (x, y) = (p.x + dx, p.y + dy);
            if x >= 0 && y >= 0 && x < w && y < h {
                self.grid.pixel_mut(x as u32, y as u32).copy_from_slice(&self.color);
            }
        }
    }

    /// Bresenham walk from `a` to `b`, both ends inclusive.
    fn line(&mut self, a: Point, b: Point) {
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;
        let mut p = a;
        loop {
            self.dab(p);
            if p == b {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                p.x += sx;
            }
            if e2 <= dx {
                err += dx;
                p.y += sy;
            }
        }
    }
}

/// Draw every contour as a closed polyline over an RGB copy of `gray`.
///
/// Strokes overwrite what is beneath them, so where two contours overlap the
/// later one in `contours` wins.
pub fn draw_contours(
    gray: &PixelGrid,
    contours: &ContourSet,
    color: [u8; 3],
    thickness: u32,
) -> PixelGrid {
    let mut out = gray_to_rgb(gray);
    let brush = brush(thickness);
    let mut canvas = Canvas {
        grid: &mut out,
        color,
        brush: &brush,
    };

    for contour in contours {
        if contour.len() == 1 {
            canvas.dab(contour.points()[0]);
            continue;
        }
        for (a, b) in contour.segments() {
            canvas.line(a, b);
        }
    }

    out
}
