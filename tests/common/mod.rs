mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from contourlay for tests
pub use contourlay::{BinaryMask, Contour, PixelGrid, Point};
