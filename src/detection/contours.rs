//! External contour tracing on binary masks.
//!
//! Topological border following after Suzuki & Abe (1985). The mask is copied
//! into an `i32` label buffer with a one-pixel background frame, so every
//! traced pixel has eight in-bounds neighbours. Label values:
//!
//! - `0` background, `1` foreground not yet on a traced border;
//! - `nbd` / `-nbd` pixels on border `nbd`, negative when the pixel's east
//!   neighbour is background (the border leaves the run there).
//!
//! Every border (outer and hole) is traced so that labels and parents stay
//! consistent, but only outer borders whose parent is the frame are emitted.
use crate::models::{BinaryMask, Contour, ContourSet, Point};

/// Chain-code offsets, index 0 = east, increasing counter-clockwise on screen
/// (y grows downward).
const DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const EAST: usize = 0;
const WEST: usize = 4;

/// Sequence number of the image frame; it behaves as a hole border.
const FRAME: i32 = 1;

#[derive(Debug, Clone, Copy)]
struct Border {
    is_hole: bool,
    parent: i32,
}

struct LabelGrid {
    labels: Vec<i32>,
    stride: usize,
    deltas: [isize; 8],
}

impl LabelGrid {
    fn from_mask(mask: &BinaryMask) -> Self {
        let (w, h) = (mask.width() as usize, mask.height() as usize);
        let stride = w + 2;
        let mut labels = vec![0i32; stride * (h + 2)];
        for (y, row) in mask.as_grid().as_raw().chunks_exact(w.max(1)).take(h).enumerate() {
            let base = (y + 1) * stride + 1;
            for (x, &v) in row.iter().enumerate() {
                if v == BinaryMask::FOREGROUND {
                    labels[base + x] = 1;
                }
            }
        }
        let deltas = DIRECTIONS.map(|(dx, dy)| dx + dy * stride as isize);
        Self {
            labels,
            stride,
            deltas,
        }
    }

    #[inline]
    fn step(&self, i: usize, dir: usize) -> usize {
        (i as isize + self.deltas[dir]) as usize
    }

    #[inline]
    fn point(&self, i: usize) -> Point {
        Point::new((i % self.stride) as i32 - 1, (i / self.stride) as i32 - 1)
    }

    /// Follow the border through `start`, whose background neighbour lies in
    /// direction `from`. Relabels the border pixels with `nbd` and returns the
    /// direction-change points.
    fn follow(&mut self, start: usize, from: usize, nbd: i32) -> Vec<Point> {
        // Clockwise search for the last pixel of the border.
        let mut s = from;
        let last = loop {
            s = (s + 7) & 7;
            let i = self.step(start, s);
            if self.labels[i] != 0 {
                break Some(i);
            }
            if s == from {
                break None;
            }
        };
        let Some(last) = last else {
            self.labels[start] = -nbd;
            return vec![self.point(start)];
        };

        let mut points = Vec::new();
        let mut current = start;
        let mut prev_dir = s ^ 4;
        loop {
            // Counter-clockwise search starting just after the previous pixel.
            let back = s;
            let mut t = back;
            let next = loop {
                t += 1;
                let i = self.step(current, t & 7);
                if self.labels[i] != 0 {
                    break i;
                }
            };
            s = t & 7;

            // Wrapping past 8 means the east neighbour was examined and empty.
            if t > 8 {
                self.labels[current] = -nbd;
            } else if self.labels[current] == 1 {
                self.labels[current] = nbd;
            }

            if s != prev_dir {
                points.push(self.point(current));
                prev_dir = s;
            }

            if next == start && current == last {
                break;
            }
            current = next;
            s = (s + 4) & 7;
        }
        points
    }
}

/// Trace the outer borders of all foreground regions not enclosed by another
/// region, in raster order of their first pixel.
pub fn trace_external_contours(mask: &BinaryMask) -> ContourSet {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let mut grid = LabelGrid::from_mask(mask);
    let mut borders = vec![
        Border {
            is_hole: true,
            parent: 0,
        };
        2
    ];
    let mut nbd = FRAME;
    let mut contours = ContourSet::new();

    for y in 1..=h {
        let mut lnbd = FRAME;
        for x in 1..=w {
            let i = y * grid.stride + x;
            let v = grid.labels[i];
            if v == 0 {
                continue;
            }

            let start = if v == 1 && grid.labels[i - 1] == 0 {
                Some((false, WEST))
            } else if v >= 1 && grid.labels[i + 1] == 0 {
                if v > 1 {
                    lnbd = v;
                }
                Some((true, EAST))
            } else {
                None
            };

            if let Some((is_hole, from)) = start {
                nbd += 1;
                let neighbour = borders[lnbd as usize];
                let parent = if neighbour.is_hole == is_hole {
                    neighbour.parent
                } else {
                    lnbd
                };
                borders.push(Border { is_hole, parent });

                let points = grid.follow(i, from, nbd);
                if !is_hole && parent == FRAME {
                    contours.extend(Contour::new(points));
                }
            }

            let v = grid.labels[i];
            if v != 1 {
                lnbd = v.abs();
            }
        }
    }

    log::trace!("traced {} borders, kept {} external", nbd - FRAME, contours.len());
    contours
}
