//! Image gradients with the Scharr kernel pair.
//!
//! - Correlates a 3x3 kernel pair (`X` and `Y`) with the smoothed image,
//!   resolving out-of-range taps with the configured [`BorderMode`].
//! - Outputs per-pixel `magnitude = sqrt(gx^2 + gy^2)` and
//!   `angle = atan2(gy, gx)` in radians, range [-pi, pi].
//!
//! `gx` grows to the right and `gy` grows downward. Each response is formed
//! as (sum of positive taps) - (sum of negative taps), so a region that is
//! constant along one axis yields an exactly zero response on that axis.

use ndarray::{Array2, ArrayView2, Zip};

use super::border::BorderMode;

type Kernel3 = [[f64; 3]; 3];

pub const SCHARR_KERNEL_X: Kernel3 = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];
pub const SCHARR_KERNEL_Y: Kernel3 = [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]];

/// Co-indexed gradient magnitude and direction.
///
/// Both matrices share the input's shape. `angle` carries no meaning where
/// `magnitude` is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeResult {
    /// Euclidean norm of the directional responses
    pub magnitude: Array2<f64>,
    /// `atan2(gy, gx)` in radians
    pub angle: Array2<f64>,
}

impl EdgeResult {
    pub fn dim(&self) -> (usize, usize) {
        self.magnitude.dim()
    }
}

#[inline]
fn correlate3(
    image: &ArrayView2<f64>,
    y: usize,
    x: usize,
    kernel: &Kernel3,
    border: BorderMode,
) -> f64 {
    let mut positive = 0.0;
    let mut negative = 0.0;
    for (ky, row) in kernel.iter().enumerate() {
        for (kx, &weight) in row.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let sy = y as isize + ky as isize - 1;
            let sx = x as isize + kx as isize - 1;
            let v = border.sample(image, sy, sx);
            if weight > 0.0 {
                positive += weight * v;
            } else {
                negative += -weight * v;
            }
        }
    }
    positive - negative
}

/// Compute Scharr gradient magnitude and angle.
///
/// # Arguments
/// * `image` - Smoothed intensity image
/// * `border` - Border policy for taps outside the image
///
/// # Returns
/// [`EdgeResult`] with the same dimensions as `image`
pub fn scharr_gradients(image: &ArrayView2<f64>, border: BorderMode) -> EdgeResult {
    let mut magnitude = Array2::<f64>::zeros(image.dim());
    let mut angle = Array2::<f64>::zeros(image.dim());

    Zip::indexed(&mut magnitude)
        .and(&mut angle)
        .par_for_each(|(y, x), mag, ang| {
            let gx = correlate3(image, y, x, &SCHARR_KERNEL_X, border);
            let gy = correlate3(image, y, x, &SCHARR_KERNEL_Y, border);
            *mag = gx.hypot(gy);
            *ang = gy.atan2(gx);
        });

    EdgeResult { magnitude, angle }
}
