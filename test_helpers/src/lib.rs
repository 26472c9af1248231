//! Shared test infrastructure for the edge map workspace.
//!
//! Provides project root discovery, a persistent `test_output/` directory for
//! artifacts worth inspecting by eye, and deterministic synthetic intensity
//! images used across unit tests, integration tests and benchmarks.
//!
//! ```rust
//! use test_helpers::{output_path, vertical_step};
//!
//! let image = vertical_step(5, 5, 2, 0, 255);
//! assert_eq!(image[[0, 2]], 255);
//!
//! let path = output_path("step_edges.png");
//! assert!(path.ends_with("test_output/step_edges.png"));
//! ```

use ndarray::Array2;
use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::env;
use std::path::{Path, PathBuf};

/// Errors from test infrastructure setup.
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// No ancestor of the working directory holds a workspace Cargo.toml.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Locate the workspace root by walking up from the current directory until
/// a Cargo.toml containing `[workspace]` is found.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<project_root>/test_output/`, created on first use.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path of an artifact inside the test output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// Image whose columns `< split` hold `left` and the rest hold `right`.
pub fn vertical_step(rows: usize, cols: usize, split: usize, left: u8, right: u8) -> Array2<u8> {
    Array2::from_shape_fn((rows, cols), |(_, x)| if x < split { left } else { right })
}

/// Image whose rows `< split` hold `top` and the rest hold `bottom`.
pub fn horizontal_step(rows: usize, cols: usize, split: usize, top: u8, bottom: u8) -> Array2<u8> {
    Array2::from_shape_fn((rows, cols), |(y, _)| if y < split { top } else { bottom })
}

/// Uniform `background` with an axis-aligned square of `foreground`.
///
/// The square spans `[top, top + side)` by `[left, left + side)`, clipped to
/// the image.
pub fn filled_square(
    rows: usize,
    cols: usize,
    top: usize,
    left: usize,
    side: usize,
    background: u8,
    foreground: u8,
) -> Array2<u8> {
    Array2::from_shape_fn((rows, cols), |(y, x)| {
        let inside = (top..top + side).contains(&y) && (left..left + side).contains(&x);
        if inside {
            foreground
        } else {
            background
        }
    })
}

/// Uniform random intensities, reproducible for a given seed.
pub fn random_intensity(rows: usize, cols: usize, seed: u64) -> Array2<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen())
}

/// Add bounded uniform noise to an image, saturating at 0 and 255.
pub fn add_noise(image: &Array2<u8>, amplitude: u8, seed: u64) -> Array2<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let amplitude = amplitude as i16;
    image.mapv(|v| {
        let delta = rng.gen_range(-amplitude..=amplitude);
        (v as i16 + delta).clamp(0, 255) as u8
    })
}
