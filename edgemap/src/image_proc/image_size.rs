//! Image dimensions and size utilities

use ndarray::ArrayView2;
use std::fmt;

/// Image dimensions structure
///
/// Represents the width and height of a matrix flowing through the pipeline.
/// Every stage preserves it, so it doubles as the shape contract between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
}

impl ImageSize {
    /// Create a new ImageSize
    pub fn from_width_height(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Size of an existing matrix view
    ///
    /// ndarray shapes are (rows, cols), i.e. (height, width).
    pub fn of<T>(view: &ArrayView2<'_, T>) -> Self {
        let (height, width) = view.dim();
        Self { width, height }
    }

    /// Get total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
