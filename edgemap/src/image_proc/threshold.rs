//! Double thresholding of thinned gradient magnitude.
//!
//! Each pixel is bucketed into one of three [`PixelClass`] values:
//!
//! - `value >= high` → `STRONG` (255)
//! - `low <= value < high` → `WEAK` (128)
//! - `value < low` → `NONE` (0)

use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use super::matrix::PixelClass;
use crate::error::ConfigError;

/// Validated low/high threshold pair.
///
/// Construction guarantees `0 <= low < high` with both values finite.
/// Deserialization goes through [`DoubleThreshold::new`] and fails on the
/// same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThreshold")]
pub struct DoubleThreshold {
    low: f64,
    high: f64,
}

/// Unchecked wire form of [`DoubleThreshold`].
#[derive(Deserialize)]
struct RawThreshold {
    low: f64,
    high: f64,
}

impl TryFrom<RawThreshold> for DoubleThreshold {
    type Error = ConfigError;

    fn try_from(raw: RawThreshold) -> Result<Self, Self::Error> {
        Self::new(raw.low, raw.high)
    }
}

impl DoubleThreshold {
    /// Create a threshold pair.
    ///
    /// # Errors
    /// * `ConfigError::InvalidThreshold` - a threshold is negative, NaN or infinite
    /// * `ConfigError::InvertedThresholds` - `low >= high`
    pub fn new(low: f64, high: f64) -> Result<Self, ConfigError> {
        for (name, value) in [("low", low), ("high", high)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if low >= high {
            return Err(ConfigError::InvertedThresholds { low, high });
        }

        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Classify a single magnitude.
    #[inline]
    pub fn classify(&self, value: f64) -> u8 {
        if value >= self.high {
            PixelClass::STRONG
        } else if value >= self.low {
            PixelClass::WEAK
        } else {
            PixelClass::NONE
        }
    }
}

/// Classify every pixel of a thinned magnitude image.
///
/// # Arguments
/// * `magnitude` - Output of non-maximum suppression
/// * `thresholds` - Validated threshold pair
///
/// # Returns
/// Strong/weak map with values in {0, 128, 255}
pub fn double_threshold(magnitude: &ArrayView2<f64>, thresholds: &DoubleThreshold) -> Array2<u8> {
    let mut classes = Array2::<u8>::zeros(magnitude.dim());
    Zip::from(&mut classes)
        .and(magnitude)
        .par_for_each(|class, &value| *class = thresholds.classify(value));
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_proc::matrix::all_in_domain;
    use ndarray::arr2;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_threshold_validation() {
        assert!(DoubleThreshold::new(20.0, 50.0).is_ok());
        assert_eq!(
            DoubleThreshold::new(100.0, 50.0),
            Err(ConfigError::InvertedThresholds {
                low: 100.0,
                high: 50.0
            })
        );
        assert_eq!(
            DoubleThreshold::new(50.0, 50.0),
            Err(ConfigError::InvertedThresholds {
                low: 50.0,
                high: 50.0
            })
        );
        assert!(matches!(
            DoubleThreshold::new(-1.0, 50.0),
            Err(ConfigError::InvalidThreshold { name: "low", .. })
        ));
        assert!(matches!(
            DoubleThreshold::new(1.0, f64::NAN),
            Err(ConfigError::InvalidThreshold { name: "high", .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let t: DoubleThreshold = serde_json::from_str(r#"{"low": 20.0, "high": 50.0}"#).unwrap();
        assert_eq!(t, DoubleThreshold::new(20.0, 50.0).unwrap());

        let inverted = serde_json::from_str::<DoubleThreshold>(r#"{"low": 100.0, "high": 50.0}"#);
        let err = inverted.unwrap_err().to_string();
        assert!(err.contains("100"), "{err}");
        assert!(serde_json::from_str::<DoubleThreshold>(r#"{"low": -5.0, "high": -1.0}"#).is_err());
        assert!(serde_json::from_str::<DoubleThreshold>(r#"{"low": 5.0, "high": 5.0}"#).is_err());

        let text = serde_json::to_string(&t).unwrap();
        assert_eq!(serde_json::from_str::<DoubleThreshold>(&text).unwrap(), t);
    }

    #[test]
    fn test_classification_boundaries() {
        let t = DoubleThreshold::new(20.0, 50.0).unwrap();
        let mag = arr2(&[[0.0, 19.999, 20.0], [49.999, 50.0, 1e6]]);
        let classes = double_threshold(&mag.view(), &t);
        assert_eq!(classes, arr2(&[[0u8, 0, 128], [128, 255, 255]]));
    }

    #[test]
    fn test_zero_low_threshold_marks_everything_weak_or_strong() {
        let t = DoubleThreshold::new(0.0, 1.0).unwrap();
        let mag = arr2(&[[0.0, 0.5, 1.0]]);
        assert_eq!(double_threshold(&mag.view(), &t), arr2(&[[128u8, 128, 255]]));
    }

    #[test]
    fn test_random_magnitudes_stay_in_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let low = rng.gen_range(0.0..500.0);
            let high = low + rng.gen_range(0.001..500.0);
            let t = DoubleThreshold::new(low, high).unwrap();

            let h = rng.gen_range(1..12);
            let w = rng.gen_range(1..12);
            let mag = Array2::from_shape_fn((h, w), |_| rng.gen_range(0.0..1500.0));
            let classes = double_threshold(&mag.view(), &t);

            assert_eq!(classes.dim(), (h, w));
            assert!(all_in_domain(
                &classes.view(),
                &[PixelClass::NONE, PixelClass::WEAK, PixelClass::STRONG]
            ));
            for (&c, &m) in classes.iter().zip(mag.iter()) {
                assert_eq!(c, t.classify(m));
            }
        }
    }
}
