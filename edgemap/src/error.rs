//! Error types for the edge map pipeline.
//!
//! Fallibility is concentrated at three boundaries:
//!
//! - **Configuration**: kernel size and threshold validation, checked when a
//!   pipeline is built and before any pixel is touched.
//! - **Input**: empty, ragged or undecodable images, checked before the first
//!   stage runs.
//! - **Output**: failures to encode the final mask or write diagnostic dumps.
//!
//! The numeric stages themselves never fail on validated input.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid pipeline parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Gaussian kernel size must be odd and at least 1, got {0}")]
    InvalidKernelSize(usize),
    #[error("Threshold {name} must be finite and non-negative, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("Low threshold {low} must be strictly below high threshold {high}")]
    InvertedThresholds { low: f64, high: f64 },
}

/// Unusable input image or matrix.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input matrix is empty ({rows} rows x {cols} columns)")]
    Empty { rows: usize, cols: usize },
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failure to persist a matrix or image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Any failure surfaced by a pipeline invocation.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Input error: {0}")]
    Input(#[from] InputError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}
