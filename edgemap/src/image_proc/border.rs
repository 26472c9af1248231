//! Border policy for neighborhood operations near the image perimeter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How out-of-range taps are resolved by convolution and gradient stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderMode {
    /// Mirror about the edge pixel without repeating it: `dcb|abcd|cba`
    #[default]
    Reflect101,
    /// Repeat the edge pixel: `aaa|abcd|ddd`
    Clamp,
    /// Out-of-range taps read as zero
    Zero,
}

impl BorderMode {
    /// Map a possibly out-of-range index onto `0..len`.
    ///
    /// Returns `None` when the tap should read as zero (`Zero` mode) or when
    /// `len` is zero.
    pub fn map_index(self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }

        match self {
            BorderMode::Zero => None,
            BorderMode::Clamp => {
                if i < 0 {
                    Some(0)
                } else {
                    Some(len - 1)
                }
            }
            BorderMode::Reflect101 => {
                if len == 1 {
                    return Some(0);
                }
                let period = (2 * len - 2) as isize;
                let r = i.rem_euclid(period) as usize;
                if r < len {
                    Some(r)
                } else {
                    Some(2 * len - 2 - r)
                }
            }
        }
    }

    /// Read `image[[y, x]]` under this border policy.
    #[inline]
    pub fn sample(self, image: &ndarray::ArrayView2<'_, f64>, y: isize, x: isize) -> f64 {
        let (height, width) = image.dim();
        match (self.map_index(y, height), self.map_index(x, width)) {
            (Some(yy), Some(xx)) => image[[yy, xx]],
            _ => 0.0,
        }
    }
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorderMode::Reflect101 => write!(f, "reflect101"),
            BorderMode::Clamp => write!(f, "clamp"),
            BorderMode::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for BorderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflect101" | "reflect" => Ok(BorderMode::Reflect101),
            "clamp" | "replicate" => Ok(BorderMode::Clamp),
            "zero" | "constant" => Ok(BorderMode::Zero),
            other => Err(format!(
                "Unknown border mode '{other}' (expected reflect101, clamp or zero)"
            )),
        }
    }
}
