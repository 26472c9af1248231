//! Binary morphology with a 3x3 square structuring element.
//!
//! Masks hold {0, 255}; any non-zero input counts as set. The standalone
//! [`dilate`] and [`erode`] ignore neighbors outside the image.
//!
//! [`close`] (dilation then erosion) runs on a canvas padded with one ring of
//! background, which is closing of the mask extended by zeros. The result
//! always contains the input, including set pixels on the image perimeter,
//! and nothing grows out of the image border. Closing fills one-pixel gaps and
//! holes along edge chains; away from them the mask is unchanged.

use ndarray::{s, Array2, ArrayView2, Zip};

use super::matrix::{BACKGROUND, EDGE};

/// Half-size of the square structuring element.
const RADIUS: isize = 1;

fn neighborhood_any(mask: &ArrayView2<u8>, y: usize, x: usize) -> bool {
    let (rows, cols) = mask.dim();
    for dy in -RADIUS..=RADIUS {
        let ny = y as isize + dy;
        if ny < 0 || ny >= rows as isize {
            continue;
        }
        for dx in -RADIUS..=RADIUS {
            let nx = x as isize + dx;
            if nx < 0 || nx >= cols as isize {
                continue;
            }
            if mask[[ny as usize, nx as usize]] != BACKGROUND {
                return true;
            }
        }
    }
    false
}

fn neighborhood_all(mask: &ArrayView2<u8>, y: usize, x: usize) -> bool {
    let (rows, cols) = mask.dim();
    for dy in -RADIUS..=RADIUS {
        let ny = y as isize + dy;
        if ny < 0 || ny >= rows as isize {
            continue;
        }
        for dx in -RADIUS..=RADIUS {
            let nx = x as isize + dx;
            if nx < 0 || nx >= cols as isize {
                continue;
            }
            if mask[[ny as usize, nx as usize]] == BACKGROUND {
                return false;
            }
        }
    }
    true
}

/// Set every pixel with at least one set pixel in its 3x3 neighborhood.
pub fn dilate(mask: &ArrayView2<u8>) -> Array2<u8> {
    let mut out = Array2::from_elem(mask.dim(), BACKGROUND);
    Zip::indexed(&mut out).par_for_each(|(y, x), pixel| {
        if neighborhood_any(mask, y, x) {
            *pixel = EDGE;
        }
    });
    out
}

/// Keep only pixels whose whole 3x3 neighborhood is set.
pub fn erode(mask: &ArrayView2<u8>) -> Array2<u8> {
    let mut out = Array2::from_elem(mask.dim(), BACKGROUND);
    Zip::indexed(&mut out).par_for_each(|(y, x), pixel| {
        if neighborhood_all(mask, y, x) {
            *pixel = EDGE;
        }
    });
    out
}

/// Intermediate and final masks of a closing.
#[derive(Debug, Clone, PartialEq)]
pub struct Closing {
    /// Input after dilation
    pub dilated: Array2<u8>,
    /// Dilated mask after erosion
    pub closed: Array2<u8>,
}

/// Morphological closing keeping the dilated mask.
///
/// Both masks have the shape of `mask`.
pub fn close_stages(mask: &ArrayView2<u8>) -> Closing {
    let (rows, cols) = mask.dim();
    let pad = RADIUS as usize;

    let mut canvas = Array2::from_elem((rows + 2 * pad, cols + 2 * pad), BACKGROUND);
    canvas
        .slice_mut(s![pad..pad + rows, pad..pad + cols])
        .assign(mask);

    let dilated = dilate(&canvas.view());
    let closed = erode(&dilated.view());

    Closing {
        dilated: dilated
            .slice(s![pad..pad + rows, pad..pad + cols])
            .to_owned(),
        closed: closed.slice(s![pad..pad + rows, pad..pad + cols]).to_owned(),
    }
}

/// Morphological closing: dilation followed by erosion.
pub fn close(mask: &ArrayView2<u8>) -> Array2<u8> {
    close_stages(mask).closed
}
