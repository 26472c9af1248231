//! Pipeline configuration.
//!
//! All tunable parameters live in a single [`PipelineConfig`] value passed to
//! the pipeline entry point. Nothing is read from the environment; callers
//! build the value in code or load it from a JSON file they name explicitly.
//!
//! # Example file
//!
//! ```json
//! {
//!   "kernel_size": 5,
//!   "low_threshold": 100.0,
//!   "high_threshold": 300.0,
//!   "border": "clamp"
//! }
//! ```
//!
//! Missing fields take their [`Default`] values.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::image_proc::{BorderMode, DoubleThreshold, GaussianKernel};

/// Parameters for one edge-detection run.
///
/// Thresholds apply to raw Scharr magnitudes. For 8-bit input these range
/// from 0 up to about 16 * 255 * sqrt(2) (roughly 5770).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Gaussian kernel width/height (odd, >= 1)
    pub kernel_size: usize,
    /// Magnitudes at or above this are weak edge candidates
    pub low_threshold: f64,
    /// Magnitudes at or above this are strong edges
    pub high_threshold: f64,
    /// Border policy for the smoothing and gradient convolutions
    pub border: BorderMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            low_threshold: 100.0,
            high_threshold: 300.0,
            border: BorderMode::Reflect101,
        }
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PipelineConfig {
    /// Convenience constructor with the default border policy.
    pub fn new(kernel_size: usize, low_threshold: f64, high_threshold: f64) -> Self {
        Self {
            kernel_size,
            low_threshold,
            high_threshold,
            ..Default::default()
        }
    }

    /// Check every parameter and build the validated stage parameters.
    pub fn validate(&self) -> Result<(GaussianKernel, DoubleThreshold), ConfigError> {
        let kernel = GaussianKernel::new(self.kernel_size)?;
        let thresholds = DoubleThreshold::new(self.low_threshold, self.high_threshold)?;
        Ok((kernel, thresholds))
    }

    /// Load a configuration from a JSON file.
    ///
    /// The loaded values are not validated here; building a pipeline does that.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigFileError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
