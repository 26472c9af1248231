//! Edge map extraction for 8-bit grayscale images.
//!
//! The crate turns an intensity matrix into a binary mask of edge pixels
//! (0 = background, 255 = edge) through a fixed chain of stages:
//!
//! 1. Gaussian smoothing ([`image_proc::convolve2d`])
//! 2. Scharr gradient magnitude and direction ([`image_proc::gradient`])
//! 3. Non-maximum suppression along the gradient ([`image_proc::nms`])
//! 4. Double thresholding into strong/weak/none ([`image_proc::threshold`])
//! 5. Hysteresis linking of weak pixels to strong ones ([`image_proc::hysteresis`])
//! 6. Morphological closing ([`image_proc::morphology`])
//!
//! [`pipeline::EdgePipeline`] runs the chain and can report every intermediate
//! matrix to a [`pipeline::StageObserver`]. [`io`] decodes input images,
//! encodes masks and writes CSV dumps.
//!
//! ```no_run
//! use edgemap::{EdgePipeline, PipelineConfig};
//! use ndarray::Array2;
//!
//! let image = Array2::<u8>::zeros((64, 64));
//! let pipeline = EdgePipeline::new(&PipelineConfig::default())?;
//! let mask = pipeline.run(&image.view())?;
//! assert_eq!(mask.dim(), (64, 64));
//! # Ok::<(), edgemap::PipelineError>(())
//! ```

pub mod config;
pub mod error;
pub mod image_proc;
pub mod io;
pub mod pipeline;

pub use config::{ConfigFileError, PipelineConfig};
pub use error::{ConfigError, InputError, OutputError, PipelineError};
pub use image_proc::{BorderMode, ImageSize, PixelClass};
pub use pipeline::{
    detect_edges, CsvDumpObserver, EdgePipeline, NoopObserver, RecordingObserver, Stage,
    StageMatrix, StageObserver,
};
