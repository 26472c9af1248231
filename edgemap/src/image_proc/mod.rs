//! Image processing stages of the edge pipeline
//!
//! This module provides the numerical kernels that turn an intensity matrix
//! into a binary edge mask: Gaussian convolution, Scharr gradients,
//! non-maximum suppression, double thresholding, hysteresis linking and
//! morphological closing, plus the shared matrix types they exchange.

pub mod border;
pub mod convolve2d;
pub mod gradient;
pub mod hysteresis;
pub mod image_size;
pub mod matrix;
pub mod morphology;
pub mod nms;
pub mod threshold;

// Re-export key functionality for easier access
pub use border::BorderMode;
pub use convolve2d::{convolve2d, gaussian_blur, gaussian_kernel, ConvolveOptions, GaussianKernel};
pub use gradient::{scharr_gradients, EdgeResult};
pub use hysteresis::hysteresis;
pub use image_size::ImageSize;
pub use matrix::{matrix_from_rows, to_float, validate_matrix, PixelClass, BACKGROUND, EDGE};
pub use morphology::{close, close_stages, dilate, erode, Closing};
pub use nms::{non_maximum_suppression, Direction};
pub use threshold::{double_threshold, DoubleThreshold};
