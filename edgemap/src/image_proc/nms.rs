//! Non-maximum suppression on gradient magnitude.
//!
//! Each pixel's gradient angle is folded modulo 180 degrees and quantized to
//! one of four principal directions. The pixel keeps its magnitude only if it
//! is at least as large as both neighbors along that direction, where "at
//! least" means `>=` or within 4096 ULPs of the neighbor.
//!
//! # Quantization
//!
//! With the angle `d` in degrees folded into [0, 180):
//!
//! | sector           | direction | neighbors compared (row, col)       |
//! |------------------|-----------|-------------------------------------|
//! | [0, 22.5)        | 0         | (y, x-1), (y, x+1)                  |
//! | [22.5, 67.5)     | 45        | (y-1, x-1), (y+1, x+1)              |
//! | [67.5, 112.5)    | 90        | (y-1, x), (y+1, x)                  |
//! | [112.5, 157.5)   | 135       | (y+1, x-1), (y-1, x+1)              |
//! | [157.5, 180)     | 0         | (y, x-1), (y, x+1)                  |
//!
//! Sectors are half-open, so an angle exactly on a boundary belongs to the
//! sector above it.
//!
//! # Ties and borders
//!
//! Equal magnitudes count as a local maximum, so flat ridges survive. Equality
//! is judged within `TIE_ULPS` (4096) units in the last place, since the two
//! flanks of a symmetric ridge are computed through different rounding paths.
//! A neighbor larger than that margin suppresses the pixel. A pixel whose
//! neighbor along its direction lies outside the image is suppressed.

use float_cmp::{ApproxEq, F64Margin};
use ndarray::{Array2, Zip};

use super::gradient::EdgeResult;

/// ULP distance under which two magnitudes are treated as equal.
const TIE_ULPS: i64 = 4096;

/// Quantized gradient direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Deg0,
    Deg45,
    Deg90,
    Deg135,
}

impl Direction {
    /// Quantize an angle in radians.
    pub fn from_angle(angle: f64) -> Self {
        Self::from_degrees(angle.to_degrees())
    }

    /// Quantize an angle in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        let degrees = degrees.rem_euclid(180.0);
        if degrees < 22.5 {
            Direction::Deg0
        } else if degrees < 67.5 {
            Direction::Deg45
        } else if degrees < 112.5 {
            Direction::Deg90
        } else if degrees < 157.5 {
            Direction::Deg135
        } else {
            Direction::Deg0
        }
    }

    /// Row/column offsets of the two neighbors along this direction.
    pub fn neighbor_offsets(self) -> [(isize, isize); 2] {
        match self {
            Direction::Deg0 => [(0, -1), (0, 1)],
            Direction::Deg45 => [(-1, -1), (1, 1)],
            Direction::Deg90 => [(-1, 0), (1, 0)],
            Direction::Deg135 => [(1, -1), (-1, 1)],
        }
    }
}

#[inline]
fn at_least(value: f64, neighbor: f64) -> bool {
    value >= neighbor
        || value.approx_eq(
            neighbor,
            F64Margin {
                epsilon: 0.0,
                ulps: TIE_ULPS,
            },
        )
}

/// Thin gradient magnitude to one-pixel ridges.
///
/// # Arguments
/// * `gradient` - Magnitude and angle from the gradient stage
///
/// # Returns
/// Thinned magnitude, same shape as the input; every value is either the
/// original magnitude or 0
pub fn non_maximum_suppression(gradient: &EdgeResult) -> Array2<f64> {
    let magnitude = gradient.magnitude.view();
    let (height, width) = magnitude.dim();
    let mut out = Array2::<f64>::zeros((height, width));

    Zip::indexed(&mut out)
        .and(&gradient.angle)
        .par_for_each(|(y, x), thinned, &angle| {
            let mag = magnitude[[y, x]];
            if mag == 0.0 {
                return;
            }

            let mut keep = true;
            for (dy, dx) in Direction::from_angle(angle).neighbor_offsets() {
                let ny = y as isize + dy;
                let nx = x as isize + dx;
                if ny < 0 || nx < 0 || ny >= height as isize || nx >= width as isize {
                    keep = false;
                    break;
                }
                if !at_least(mag, magnitude[[ny as usize, nx as usize]]) {
                    keep = false;
                    break;
                }
            }

            if keep {
                *thinned = mag;
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn edge_result(magnitude: Array2<f64>, angle: f64) -> EdgeResult {
        let angle = Array2::from_elem(magnitude.dim(), angle);
        EdgeResult { magnitude, angle }
    }

    #[test]
    fn test_direction_quantization() {
        assert_eq!(Direction::from_angle(0.0), Direction::Deg0);
        assert_eq!(Direction::from_angle(PI), Direction::Deg0);
        assert_eq!(Direction::from_angle(-PI), Direction::Deg0);
        assert_eq!(Direction::from_angle(FRAC_PI_4), Direction::Deg45);
        assert_eq!(Direction::from_angle(FRAC_PI_2), Direction::Deg90);
        assert_eq!(Direction::from_angle(-FRAC_PI_2), Direction::Deg90);
        assert_eq!(Direction::from_angle(3.0 * FRAC_PI_4), Direction::Deg135);
        // -45 degrees folds to 135
        assert_eq!(Direction::from_angle(-FRAC_PI_4), Direction::Deg135);
        assert_eq!(Direction::from_angle(170f64.to_radians()), Direction::Deg0);
    }

    #[test]
    fn test_boundary_angles_round_up() {
        assert_eq!(Direction::from_degrees(22.5), Direction::Deg45);
        assert_eq!(Direction::from_degrees(67.5), Direction::Deg90);
        assert_eq!(Direction::from_degrees(112.5), Direction::Deg135);
        assert_eq!(Direction::from_degrees(157.5), Direction::Deg0);
        assert_eq!(Direction::from_degrees(-22.5), Direction::Deg0);
        assert_eq!(Direction::from_degrees(202.5), Direction::Deg45);
    }

    #[test]
    fn test_keeps_horizontal_peak() {
        let mag = arr2(&[[1.0, 5.0, 2.0], [1.0, 5.0, 2.0], [1.0, 5.0, 2.0]]);
        let out = non_maximum_suppression(&edge_result(mag, 0.0));

        for y in 0..3 {
            assert_eq!(out[[y, 1]], 5.0);
            // Outer columns lack a neighbor along the direction
            assert_eq!(out[[y, 0]], 0.0);
            assert_eq!(out[[y, 2]], 0.0);
        }
    }

    #[test]
    fn test_suppresses_non_maximum() {
        let mag = arr2(&[
            [0.0, 0.0, 0.0, 0.0],
            [1.0, 3.0, 4.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ]);
        let out = non_maximum_suppression(&edge_result(mag, 0.0));
        assert_eq!(out[[1, 1]], 0.0);
        assert_eq!(out[[1, 2]], 4.0);
    }

    #[test]
    fn test_flat_ridge_survives() {
        let mag = arr2(&[[0.0, 7.0, 7.0, 0.0]]);
        let out = non_maximum_suppression(&edge_result(mag, 0.0));
        assert_eq!(out, arr2(&[[0.0, 7.0, 7.0, 0.0]]));
    }

    #[test]
    fn test_near_equal_ridge_counts_as_tie() {
        let a = 2961.123456789;
        let b = a * (1.0 + 4.0 * f64::EPSILON);
        let mag = arr2(&[[0.0, a, b, 0.0]]);
        let out = non_maximum_suppression(&edge_result(mag, 0.0));
        assert_eq!(out[[0, 1]], a);
        assert_eq!(out[[0, 2]], b);
    }

    #[test]
    fn test_neighbor_beyond_tie_margin_suppresses() {
        let a = 2961.123456789;
        let b = a * (1.0 + 1e-9);
        assert!(!a.approx_eq(b, F64Margin { epsilon: 0.0, ulps: TIE_ULPS }));

        let mag = arr2(&[[0.0, a, b, 0.0]]);
        let out = non_maximum_suppression(&edge_result(mag, 0.0));
        assert_eq!(out[[0, 1]], 0.0);
        assert_eq!(out[[0, 2]], b);
    }

    #[test]
    fn test_vertical_and_diagonal_directions() {
        let mag = arr2(&[[1.0, 1.0, 1.0], [1.0, 9.0, 1.0], [1.0, 1.0, 1.0]]);

        for angle in [FRAC_PI_2, FRAC_PI_4, 3.0 * FRAC_PI_4] {
            let out = non_maximum_suppression(&edge_result(mag.clone(), angle));
            assert_eq!(out[[1, 1]], 9.0);
            // Perimeter pixels have at least one neighbor outside along these directions
            assert_eq!(out[[0, 1]], 0.0);
        }

        // Diagonal comparison uses the diagonal neighbors, not the row
        let mut diag = mag.clone();
        diag[[0, 0]] = 20.0;
        let out = non_maximum_suppression(&edge_result(diag.clone(), FRAC_PI_4));
        assert_eq!(out[[1, 1]], 0.0);
        let out = non_maximum_suppression(&edge_result(diag, 3.0 * FRAC_PI_4));
        assert_eq!(out[[1, 1]], 9.0);
    }

    #[test]
    fn test_never_increases_magnitude() {
        let mag = Array2::from_shape_fn((9, 9), |(y, x)| ((x * 31 + y * 17) % 23) as f64);
        let angle = Array2::from_shape_fn((9, 9), |(y, x)| ((x * 5 + y * 3) as f64).sin() * PI);
        let grad = EdgeResult {
            magnitude: mag.clone(),
            angle,
        };
        let out = non_maximum_suppression(&grad);

        assert_eq!(out.dim(), mag.dim());
        for (thin, orig) in out.iter().zip(mag.iter()) {
            assert!(*thin <= *orig);
            assert!(*thin == 0.0 || *thin == *orig);
        }
    }
}
