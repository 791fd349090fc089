//! Error taxonomy for the contour overlay pipeline.
//!
//! `DecodeError` is the only failure expected on bad input. `EncodeError`
//! and `PipelineError::Processing` indicate a bug when they surface.

use std::fmt;

/// Invalid buffer handed to a [`crate::PixelGrid`] or [`crate::BinaryMask`] constructor.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("mask sample {0} is neither 0 nor 255")]
    NotBinary(u8),
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("input buffer is empty")]
    Empty,
    #[error("input is not a recognized image container")]
    UnknownFormat,
    #[error("decoded image has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to read image header: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("cannot encode a {0}-channel grid, expected 3 channels")]
    ChannelCount(usize),
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("failed to write PNG: {0}")]
    Image(#[from] image::ImageError),
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Decode,
    Grayscale,
    GaussianBlur,
    Threshold,
    TraceContours,
    Render,
    Encode,
}

impl Stage {
    /// Position in the pipeline; `Decode` is 0.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Grayscale => "grayscale",
            Stage::GaussianBlur => "gaussian_blur",
            Stage::Threshold => "threshold",
            Stage::TraceContours => "trace_contours",
            Stage::Render => "render",
            Stage::Encode => "encode",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a whole `process` call.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("{stage} stage failed: {reason}")]
    Processing { stage: Stage, reason: String },
}

impl PipelineError {
    /// Stable error code for the host boundary.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "DecodeError",
            PipelineError::Encode(_) => "EncodeError",
            PipelineError::Processing { .. } => "ProcessingError",
        }
    }

    /// Stage that produced the failure.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode(_) => Stage::Decode,
            PipelineError::Encode(_) => Stage::Encode,
            PipelineError::Processing { stage, .. } => *stage,
        }
    }
}
