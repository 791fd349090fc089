pub mod codec;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use error::{DecodeError, EncodeError, GridError, PipelineError, Stage};
pub use models::{BinaryMask, Contour, ContourSet, PixelGrid, Point};
pub use pipeline::{Detection, Pipeline, detect_contours, process};
