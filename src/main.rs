use clap::Parser;
use std::path::{Path, PathBuf};

use contourlay::Pipeline;

#[derive(Parser)]
#[command(name = "contourlay")]
#[command(about = "Trace external contours and draw them over a grayscale copy of an image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Output PNG path (defaults to <IMAGE>_contours.png)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}_contours.png"))
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    log::debug!("Loading image: {:?}", args.image_path);
    let bytes = std::fs::read(&args.image_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.image_path.display(), e))?;

    let mut pipeline = Pipeline::new();
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }
    if let Some(dir) = pipeline.debug_dir() {
        log::info!("Saving debug outputs to {}", dir.display());
    }

    let detection = pipeline
        .run_detailed(&bytes)
        .map_err(|e| anyhow::anyhow!("{}: {}", e.code(), e))?;

    let output = args.output.unwrap_or_else(|| default_output_path(&args.image_path));
    std::fs::write(&output, &detection.image)?;

    println!(
        "Detected {} contour(s) in {}x{} image",
        detection.contours.len(),
        detection.width,
        detection.height
    );
    println!("Saved overlay to: {}", output.display());

    Ok(())
}
