//! Compute the edge mask of a grayscale image.
//!
//! # Usage
//!
//! ```bash
//! # Default parameters (3x3 blur, thresholds 100/300)
//! cargo run --release --bin edge_detect -- input.png edges.png
//!
//! # Wider blur and lower thresholds
//! cargo run --release --bin edge_detect -- input.png edges.png -k 5 --low 40 --high 120
//!
//! # Dump every intermediate matrix as CSV
//! cargo run --release --bin edge_detect -- input.png edges.png --dump-dir stages/
//!
//! # Start from a JSON config; flags override its values
//! cargo run --release --bin edge_detect -- input.png edges.png --config tuned.json --high 250
//! ```
//!
//! Set `RUST_LOG=debug` for per-stage timings.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use edgemap::{BorderMode, CsvDumpObserver, EdgePipeline, NoopObserver, PipelineConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BorderArg {
    /// Mirror without repeating the edge pixel
    #[value(name = "reflect101")]
    Reflect101,
    /// Repeat the edge pixel
    Clamp,
    /// Treat outside pixels as zero
    Zero,
}

impl From<BorderArg> for BorderMode {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::Reflect101 => BorderMode::Reflect101,
            BorderArg::Clamp => BorderMode::Clamp,
            BorderArg::Zero => BorderMode::Zero,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute the edge mask of a grayscale image")]
struct Args {
    /// Input image (any format the image crate decodes)
    input: PathBuf,

    /// Output mask image; format follows the extension
    output: PathBuf,

    /// JSON pipeline configuration to start from
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gaussian kernel size (odd)
    #[arg(short, long)]
    kernel_size: Option<usize>,

    /// Low hysteresis threshold on gradient magnitude
    #[arg(long)]
    low: Option<f64>,

    /// High hysteresis threshold on gradient magnitude
    #[arg(long)]
    high: Option<f64>,

    /// Border handling for blur and gradient
    #[arg(short, long, value_enum)]
    border: Option<BorderArg>,

    /// Directory for per-stage CSV dumps, created once decoding succeeds
    #[arg(short, long)]
    dump_dir: Option<PathBuf>,
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("Loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(k) = self.kernel_size {
            config.kernel_size = k;
        }
        if let Some(low) = self.low {
            config.low_threshold = low;
        }
        if let Some(high) = self.high {
            config.high_threshold = high;
        }
        if let Some(border) = self.border {
            config.border = border.into();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.pipeline_config()?;
    let pipeline = EdgePipeline::new(&config).context("Invalid pipeline parameters")?;

    let mask = match &args.dump_dir {
        Some(dir) => {
            let mut observer = CsvDumpObserver::new(dir);
            let mask = pipeline.run_path(&args.input, &mut observer)?;
            if observer.failures() > 0 {
                log::warn!(
                    "{} stage dumps could not be written to {}",
                    observer.failures(),
                    dir.display()
                );
            }
            mask
        }
        None => pipeline.run_path(&args.input, &mut NoopObserver)?,
    };

    edgemap::io::save_mask(&mask.view(), &args.output)?;

    let edge_pixels = mask.iter().filter(|&&v| v == edgemap::image_proc::EDGE).count();
    log::info!(
        "Wrote {} ({} edge pixels of {})",
        args.output.display(),
        edge_pixels,
        mask.len()
    );

    Ok(())
}
