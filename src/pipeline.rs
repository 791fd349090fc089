use crate::codec;
use crate::detection::contours::trace_external_contours;
use crate::detection::{self, preprocessing, render};
use crate::error::{PipelineError, Stage};
use crate::models::{ContourSet, PixelGrid};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Detection {
    /// PNG-encoded overlay
    pub image: Vec<u8>,
    /// Contours that were drawn, in raster order
    pub contours: ContourSet,
    pub width: u32,
    pub height: u32,
}

/// The fixed decode → grayscale → blur → threshold → trace → render → encode
/// chain.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// callers; each run allocates its own buffers.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    /// Receives one PNG per image-producing stage when set
    debug_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> io::Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(io::Error::new(
                    io::ErrorKind::DirectoryNotEmpty,
                    format!("Debug directory is not empty: {}", output_dir.display()),
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    pub fn debug_dir(&self) -> Option<&Path> {
        self.debug_dir.as_deref()
    }

    /// Run the pipeline and return only the encoded overlay.
    pub fn run(&self, bytes: &[u8]) -> Result<Vec<u8>, PipelineError> {
        self.run_detailed(bytes).map(|detection| detection.image)
    }

    /// Run the pipeline, keeping the traced contours alongside the image.
    pub fn run_detailed(&self, bytes: &[u8]) -> Result<Detection, PipelineError> {
        let rgb = run_stage(Stage::Decode, || codec::decode(bytes))??;
        let (width, height) = rgb.dimensions();
        log::debug!("decoded {width}x{height} image from {} bytes", bytes.len());
        self.save_debug_output(Stage::Decode, &rgb);

        let gray = run_stage(Stage::Grayscale, || preprocessing::to_grayscale(&rgb))?;
        drop(rgb);
        self.save_debug_output(Stage::Grayscale, &gray);

        let blurred = run_stage(Stage::GaussianBlur, || {
            preprocessing::gaussian_blur(
                &gray,
                detection::BLUR_KERNEL_SIZE,
                detection::BLUR_SIGMA,
            )
        })?;
        self.save_debug_output(Stage::GaussianBlur, &blurred);

        let mask = run_stage(Stage::Threshold, || {
            preprocessing::threshold(&blurred, detection::THRESHOLD_CUTOFF)
        })?;
        drop(blurred);
        self.save_debug_output(Stage::Threshold, mask.as_grid());

        let contours = run_stage(Stage::TraceContours, || trace_external_contours(&mask))?;
        drop(mask);
        log::debug!(
            "traced {} external contours ({} points)",
            contours.len(),
            contours.iter().map(|c| c.len()).sum::<usize>()
        );

        // Strokes go over the unblurred grayscale.
        let overlay = run_stage(Stage::Render, || {
            render::draw_contours(
                &gray,
                &contours,
                detection::CONTOUR_COLOR,
                detection::CONTOUR_THICKNESS,
            )
        })?;
        drop(gray);
        self.save_debug_output(Stage::Render, &overlay);

        let image = codec::encode(&overlay)?;
        log::info!(
            "rendered {} contours on {width}x{height} image ({} bytes PNG)",
            contours.len(),
            image.len()
        );

        Ok(Detection {
            image,
            contours,
            width,
            height,
        })
    }

    /// Save debug output if debug mode is enabled. Failures are logged, never
    /// propagated: dumps must not change the result of a run.
    fn save_debug_output(&self, stage: Stage, grid: &PixelGrid) {
        let Some(debug_dir) = &self.debug_dir else {
            return;
        };

        let filename = format!("{:02}_{}.png", stage.index(), stage.name());
        let path = debug_dir.join(&filename);
        match codec::save_png(grid, &path) {
            Ok(()) => log::debug!("Debug: saved {filename}"),
            Err(e) => log::warn!("Failed to save debug image {}: {e}", path.display()),
        }
    }
}

/// Run one stage, turning a panic inside it into `PipelineError::Processing`.
fn run_stage<T>(stage: Stage, f: impl FnOnce() -> T) -> Result<T, PipelineError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = panic_reason(payload.as_ref());
        log::warn!("{stage} stage panicked: {reason}");
        PipelineError::Processing { stage, reason }
    })
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Detect external contours in an encoded image and return a PNG with the
/// contours drawn over its grayscale version.
pub fn process(bytes: &[u8]) -> Result<Vec<u8>, PipelineError> {
    Pipeline::new().run(bytes)
}

/// Boundary name for [`process`] used by host integrations.
pub fn detect_contours(input_bytes: &[u8]) -> Result<Vec<u8>, PipelineError> {
    process(input_bytes)
}
