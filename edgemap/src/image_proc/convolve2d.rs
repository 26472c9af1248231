//! 2D convolution and Gaussian smoothing.
//!
//! The smoothing stage of the edge pipeline is a plain 2D convolution of the
//! intensity matrix with a normalized `k x k` Gaussian kernel. Output always
//! has the same shape as the input ("same" mode); taps falling outside the
//! image are resolved through an explicit [`BorderMode`].
//!
//! # Gaussian parameterization
//!
//! The kernel standard deviation is tied to the kernel size with the fixed
//! mapping `sigma = size / 3`, so the kernel spans roughly +/-1.5 sigma.
//! A size of 1 produces the identity kernel.
//!
//! # Parallelism
//!
//! Output pixels are computed in parallel with rayon. Each pixel accumulates
//! its taps in the same fixed order as a serial loop would, so the result is
//! bit-identical for any thread count.

use ndarray::{Array2, ArrayView2, Zip};

use super::border::BorderMode;
use crate::error::ConfigError;

/// Options controlling [`convolve2d`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvolveOptions {
    /// How taps outside the image are resolved
    pub border: BorderMode,
}

/// Convolve an image with a kernel, producing an output of the same shape.
///
/// This is true convolution (the kernel is flipped), so
/// `out[y, x] = sum k[i, j] * image[y + ry - i, x + rx - j]` where `ry`, `rx`
/// are the kernel half-sizes.
///
/// # Arguments
/// * `image` - Input image
/// * `kernel` - Kernel with odd height and width
/// * `options` - Border handling; `None` uses [`BorderMode::default`]
///
/// # Returns
/// Convolved image with the same dimensions as `image`
///
/// # Panics
/// If either kernel dimension is even.
pub fn convolve2d(
    image: &ArrayView2<f64>,
    kernel: &ArrayView2<f64>,
    options: Option<ConvolveOptions>,
) -> Array2<f64> {
    let border = options.unwrap_or_default().border;
    let (kh, kw) = kernel.dim();
    assert!(
        kh % 2 == 1 && kw % 2 == 1,
        "kernel dimensions must be odd, got {kh}x{kw}"
    );

    let ry = (kh / 2) as isize;
    let rx = (kw / 2) as isize;

    let mut out = Array2::<f64>::zeros(image.dim());
    if out.is_empty() {
        return out;
    }

    Zip::indexed(&mut out).par_for_each(|(y, x), pixel| {
        let mut acc = 0.0;
        for ((i, j), &weight) in kernel.indexed_iter() {
            let sy = y as isize + ry - i as isize;
            let sx = x as isize + rx - j as isize;
            acc += weight * border.sample(image, sy, sx);
        }
        *pixel = acc;
    });

    out
}

/// Build a normalized 2D Gaussian kernel.
///
/// # Arguments
/// * `size` - Width and height of the kernel (should be odd)
/// * `sigma` - Standard deviation in pixels
///
/// # Returns
/// A `size x size` kernel whose weights sum to 1
pub fn gaussian_kernel(size: usize, sigma: f64) -> Array2<f64> {
    let center = (size / 2) as f64;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel = Array2::from_shape_fn((size, size), |(y, x)| {
        let dy = y as f64 - center;
        let dx = x as f64 - center;
        (-(dx * dx + dy * dy) / two_sigma_sq).exp()
    });

    let sum = kernel.sum();
    if sum > 0.0 {
        kernel.mapv_inplace(|w| w / sum);
    }
    kernel
}

/// Validated Gaussian smoothing kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    size: usize,
    sigma: f64,
    weights: Array2<f64>,
}

impl GaussianKernel {
    /// Create a kernel of the given odd size with `sigma = size / 3`.
    ///
    /// # Errors
    /// `ConfigError::InvalidKernelSize` if `size` is zero or even.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 || size % 2 == 0 {
            return Err(ConfigError::InvalidKernelSize(size));
        }

        let sigma = size as f64 / 3.0;
        Ok(Self {
            size,
            sigma,
            weights: gaussian_kernel(size, sigma),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }
}

/// Smooth an intensity matrix with a Gaussian kernel.
pub fn gaussian_blur(
    image: &ArrayView2<f64>,
    kernel: &GaussianKernel,
    border: BorderMode,
) -> Array2<f64> {
    convolve2d(image, &kernel.weights(), Some(ConvolveOptions { border }))
}
