//! Matrix construction and validation at the pipeline boundary.
//!
//! Stages pass `ndarray` arrays directly; this module holds the checks that
//! make those arrays acceptable as pipeline input, plus the pixel-class
//! constants shared by the classifier, linker and closer.

use ndarray::{Array2, ArrayView2};
use num_traits::AsPrimitive;

use super::image_size::ImageSize;
use crate::error::InputError;

/// Three-valued pixel classes written by the double threshold stage.
///
/// `STRONG` doubles as the "on" value of binary masks.
pub struct PixelClass;

impl PixelClass {
    pub const NONE: u8 = 0;
    pub const WEAK: u8 = 128;
    pub const STRONG: u8 = 255;
}

/// Value of a set pixel in a binary mask.
pub const EDGE: u8 = PixelClass::STRONG;

/// Value of a cleared pixel in a binary mask.
pub const BACKGROUND: u8 = PixelClass::NONE;

/// Build a matrix from nested rows, rejecting ragged input.
///
/// # Arguments
/// * `rows` - Row-major samples; every row must have the same length
///
/// # Returns
/// * `Ok(Array2<T>)` with shape (rows.len(), rows[0].len())
/// * `Err(InputError::Empty)` for zero rows or zero-length rows
/// * `Err(InputError::RaggedRows)` naming the first row with a different length
pub fn matrix_from_rows<T: Clone>(rows: &[Vec<T>]) -> Result<Array2<T>, InputError> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());

    if height == 0 || width == 0 {
        return Err(InputError::Empty {
            rows: height,
            cols: width,
        });
    }

    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(InputError::RaggedRows {
                row,
                expected: width,
                actual: values.len(),
            });
        }
    }

    let flat: Vec<T> = rows.iter().flat_map(|r| r.iter().cloned()).collect();
    // Lengths were checked above, so the shape always matches
    Array2::from_shape_vec((height, width), flat).map_err(|_| InputError::Empty {
        rows: height,
        cols: width,
    })
}

/// Check that a matrix can enter the pipeline (H >= 1 and W >= 1).
pub fn validate_matrix<T>(view: &ArrayView2<'_, T>) -> Result<ImageSize, InputError> {
    let size = ImageSize::of(view);
    if size.is_empty() {
        return Err(InputError::Empty {
            rows: size.height,
            cols: size.width,
        });
    }
    Ok(size)
}

/// Widen an integer intensity matrix to floating point.
pub fn to_float<T>(view: &ArrayView2<'_, T>) -> Array2<f64>
where
    T: AsPrimitive<f64>,
{
    view.mapv(|v| v.as_())
}

/// True if every cell holds one of the given values.
pub fn all_in_domain(view: &ArrayView2<'_, u8>, domain: &[u8]) -> bool {
    view.iter().all(|v| domain.contains(v))
}
