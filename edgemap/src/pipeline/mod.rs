//! End-to-end edge detection pipeline.
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//!
//! ```text
//! intensity (u8) -> gaussian blur -> scharr gradient -> non-maximum suppression
//!     -> double threshold -> hysteresis -> dilate -> erode -> mask (u8)
//! ```
//!
//! Parameters are validated when an [`EdgePipeline`] is built, and the input
//! matrix is validated before the first stage runs, so a failing call never
//! reaches an observer and never produces partial dumps.

pub mod observer;

use ndarray::{Array2, ArrayView2};
use std::path::Path;
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::error::{ConfigError, PipelineError};
use crate::image_proc::{
    close_stages, double_threshold, gaussian_blur, hysteresis, non_maximum_suppression,
    scharr_gradients, to_float, validate_matrix, BorderMode, DoubleThreshold, GaussianKernel,
    EDGE,
};
use crate::io::load_intensity;

pub use observer::{
    CsvDumpObserver, NoopObserver, RecordedMatrix, RecordingObserver, Stage, StageMatrix,
    StageObserver,
};

/// A validated, reusable edge detector.
#[derive(Debug, Clone)]
pub struct EdgePipeline {
    kernel: GaussianKernel,
    thresholds: DoubleThreshold,
    border: BorderMode,
}

impl EdgePipeline {
    /// Validate `config` and build a pipeline.
    ///
    /// # Errors
    /// Any [`ConfigError`] from the kernel size or thresholds.
    pub fn new(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let (kernel, thresholds) = config.validate()?;
        log::debug!(
            "Edge pipeline: kernel {}x{} (sigma {:.3}), thresholds [{}, {}], border {}",
            kernel.size(),
            kernel.size(),
            kernel.sigma(),
            thresholds.low(),
            thresholds.high(),
            config.border
        );
        Ok(Self {
            kernel,
            thresholds,
            border: config.border,
        })
    }

    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    pub fn thresholds(&self) -> &DoubleThreshold {
        &self.thresholds
    }

    pub fn border(&self) -> BorderMode {
        self.border
    }

    /// Compute the edge mask of an intensity matrix.
    ///
    /// The result has the same shape as `image` and holds only 0 and 255.
    pub fn run(&self, image: &ArrayView2<u8>) -> Result<Array2<u8>, PipelineError> {
        self.run_with_observer(image, &mut NoopObserver)
    }

    /// Compute the edge mask, reporting every intermediate matrix to `observer`.
    pub fn run_with_observer(
        &self,
        image: &ArrayView2<u8>,
        observer: &mut dyn StageObserver,
    ) -> Result<Array2<u8>, PipelineError> {
        let size = validate_matrix(image)?;
        let started = Instant::now();
        log::info!("Detecting edges in {size} image");

        observer.observe(Stage::Input, StageMatrix::Byte(image.view()));

        let stage_start = Instant::now();
        let smoothed = gaussian_blur(&to_float(image).view(), &self.kernel, self.border);
        log::debug!("Gaussian blur took {:?}", stage_start.elapsed());
        observer.observe(Stage::Smoothed, StageMatrix::Float(smoothed.view()));

        let stage_start = Instant::now();
        let gradient = scharr_gradients(&smoothed.view(), self.border);
        log::debug!("Scharr gradient took {:?}", stage_start.elapsed());
        observer.observe(
            Stage::GradientMagnitude,
            StageMatrix::Float(gradient.magnitude.view()),
        );
        observer.observe(
            Stage::GradientAngle,
            StageMatrix::Float(gradient.angle.view()),
        );

        let stage_start = Instant::now();
        let suppressed = non_maximum_suppression(&gradient);
        log::debug!("Non-maximum suppression took {:?}", stage_start.elapsed());
        observer.observe(Stage::Suppressed, StageMatrix::Float(suppressed.view()));

        let classes = double_threshold(&suppressed.view(), &self.thresholds);
        observer.observe(Stage::Classified, StageMatrix::Byte(classes.view()));

        let stage_start = Instant::now();
        let linked = hysteresis(&classes.view());
        log::debug!("Hysteresis took {:?}", stage_start.elapsed());
        observer.observe(Stage::Linked, StageMatrix::Byte(linked.view()));

        let closing = close_stages(&linked.view());
        observer.observe(Stage::Dilated, StageMatrix::Byte(closing.dilated.view()));
        observer.observe(Stage::Closed, StageMatrix::Byte(closing.closed.view()));
        let closed = closing.closed;

        let edge_pixels = closed.iter().filter(|&&v| v == EDGE).count();
        log::info!(
            "Found {} edge pixels ({:.2}%) in {:?}",
            edge_pixels,
            100.0 * edge_pixels as f64 / size.pixel_count() as f64,
            started.elapsed()
        );

        Ok(closed)
    }

    /// Decode an image file and compute its edge mask.
    ///
    /// Decoding failures surface as [`PipelineError::Input`] before `observer`
    /// sees anything.
    pub fn run_path(
        &self,
        path: &Path,
        observer: &mut dyn StageObserver,
    ) -> Result<Array2<u8>, PipelineError> {
        let image = load_intensity(path)?;
        self.run_with_observer(&image.view(), observer)
    }
}

/// Validate `config` and compute the edge mask of `image` in one call.
pub fn detect_edges(
    image: &ArrayView2<u8>,
    config: &PipelineConfig,
) -> Result<Array2<u8>, PipelineError> {
    EdgePipeline::new(config)?.run(image)
}
