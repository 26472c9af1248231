//! Hysteresis edge linking.
//!
//! Every `STRONG` pixel becomes an edge. A `WEAK` pixel becomes an edge only
//! if it is 8-connected, directly or through other promoted `WEAK` pixels, to
//! some `STRONG` pixel. Everything else is cleared.
//!
//! The traversal is a flood fill seeded from all strong pixels, driven by an
//! explicit stack so large connected components cannot exhaust the call
//! stack. A pixel is marked when it is pushed, so each one enters the stack at
//! most once and the whole pass is O(H·W).

use ndarray::{Array2, ArrayView2};

use super::matrix::{PixelClass, BACKGROUND, EDGE};

/// 8-connectivity neighboring offsets
pub const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Promote weak pixels connected to strong pixels.
///
/// # Arguments
/// * `classes` - Strong/weak map from the double threshold stage
///
/// # Returns
/// Binary mask with values in {0, 255}, same shape as the input
pub fn hysteresis(classes: &ArrayView2<u8>) -> Array2<u8> {
    let (rows, cols) = classes.dim();
    let mut mask = Array2::from_elem((rows, cols), BACKGROUND);

    // Seed with every strong pixel
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for ((y, x), &class) in classes.indexed_iter() {
        if class == PixelClass::STRONG {
            mask[[y, x]] = EDGE;
            stack.push((y, x));
        }
    }

    while let Some((y, x)) = stack.pop() {
        for &(dy, dx) in &NEIGHBORS_8 {
            let ny = y as isize + dy;
            let nx = x as isize + dx;

            // Check bounds
            if ny < 0 || ny >= rows as isize || nx < 0 || nx >= cols as isize {
                continue;
            }
            let (ny, nx) = (ny as usize, nx as usize);

            if classes[[ny, nx]] == PixelClass::WEAK && mask[[ny, nx]] == BACKGROUND {
                mask[[ny, nx]] = EDGE;
                stack.push((ny, nx));
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const N: u8 = PixelClass::NONE;
    const W: u8 = PixelClass::WEAK;
    const S: u8 = PixelClass::STRONG;

    #[test]
    fn test_weak_chain_connected_to_strong_is_promoted() {
        // Diagonal and orthogonal steps both count as connected
        let classes = arr2(&[
            [S, N, N, N, N],
            [N, W, N, N, N],
            [N, W, N, N, N],
            [N, N, W, W, N],
            [N, N, N, N, W],
        ]);

        let mask = hysteresis(&classes.view());
        let expected = arr2(&[
            [255u8, 0, 0, 0, 0],
            [0, 255, 0, 0, 0],
            [0, 255, 0, 0, 0],
            [0, 0, 255, 255, 0],
            [0, 0, 0, 0, 255],
        ]);
        assert_eq!(mask, expected);
    }

    #[test]
    fn test_isolated_weak_is_dropped() {
        let classes = arr2(&[
            [S, W, N, N, N],
            [N, N, N, N, N],
            [N, N, N, W, W],
            [N, N, N, W, N],
        ]);

        let mask = hysteresis(&classes.view());
        assert_eq!(mask[[0, 0]], 255);
        assert_eq!(mask[[0, 1]], 255);
        assert_eq!(mask[[2, 3]], 0);
        assert_eq!(mask[[2, 4]], 0);
        assert_eq!(mask[[3, 3]], 0);
    }

    #[test]
    fn test_none_pixels_break_chains() {
        let classes = arr2(&[[S, N, W]]);
        let mask = hysteresis(&classes.view());
        assert_eq!(mask, arr2(&[[255u8, 0, 0]]));
    }

    #[test]
    fn test_large_component_does_not_overflow() {
        // A serpentine of weak pixels covering most of a large image
        let (rows, cols) = (512, 512);
        let mut classes = Array2::from_elem((rows, cols), W);
        for y in (1..rows).step_by(2) {
            for x in 0..cols {
                classes[[y, x]] = N;
            }
            let gap = if (y / 2) % 2 == 0 { cols - 1 } else { 0 };
            classes[[y, gap]] = W;
        }
        classes[[0, 0]] = S;

        let mask = hysteresis(&classes.view());
        for ((y, x), &c) in classes.indexed_iter() {
            let expected = if c == N { 0 } else { 255 };
            assert_eq!(mask[[y, x]], expected, "pixel ({y}, {x})");
        }
    }

    #[test]
    fn test_output_between_strong_and_strong_or_weak() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);

        for _ in 0..40 {
            let h = rng.gen_range(1..20);
            let w = rng.gen_range(1..20);
            let classes = Array2::from_shape_fn((h, w), |_| match rng.gen_range(0..10) {
                0 => S,
                1..=4 => W,
                _ => N,
            });
            let mask = hysteresis(&classes.view());

            assert_eq!(mask.dim(), classes.dim());
            for (&c, &m) in classes.iter().zip(mask.iter()) {
                assert!(m == 0 || m == 255);
                if c == S {
                    assert_eq!(m, 255);
                }
                if c == N {
                    assert_eq!(m, 0);
                }
            }
        }
    }
}
