use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ASINH_SOFTENING, DEFAULT_LOG_CURVATURE};
use crate::error::ConfigError;

/// Monotonic map from normalized intensity [0, 1] to display intensity [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Stretch {
    #[default]
    Linear,
    Log,
    Sqrt,
    Asinh,
}

/// Curvature constants shared by the non-linear stretches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StretchParams {
    /// `k` in `log(1 + k*t) / log(1 + k)`.
    pub log_curvature: f64,
    /// `a` in `asinh(t/a) / asinh(1/a)`.
    pub asinh_softening: f64,
}

impl Default for StretchParams {
    fn default() -> Self {
        Self {
            log_curvature: DEFAULT_LOG_CURVATURE,
            asinh_softening: DEFAULT_ASINH_SOFTENING,
        }
    }
}

impl Stretch {
    pub const ALL: [Stretch; 4] = [Stretch::Linear, Stretch::Log, Stretch::Sqrt, Stretch::Asinh];

    /// Apply the stretch to `t`, which must already lie in [0, 1].
    #[inline]
    pub fn apply(self, t: f64, params: &StretchParams) -> f64 {
        match self {
            Self::Linear => t,
            Self::Log => {
                let k = params.log_curvature;
                (k * t).ln_1p() / k.ln_1p()
            }
            Self::Sqrt => t.sqrt(),
            Self::Asinh => {
                let a = params.asinh_softening;
                (t / a).asinh() / (1.0 / a).asinh()
            }
        }
    }

    /// The next stretch in cycling order (linear → log → sqrt → asinh → linear).
    pub fn next(self) -> Self {
        match self {
            Self::Linear => Self::Log,
            Self::Log => Self::Sqrt,
            Self::Sqrt => Self::Asinh,
            Self::Asinh => Self::Linear,
        }
    }
}

impl std::fmt::Display for Stretch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Log => write!(f, "log"),
            Self::Sqrt => write!(f, "sqrt"),
            Self::Asinh => write!(f, "asinh"),
        }
    }
}

impl FromStr for Stretch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "log" => Ok(Self::Log),
            "sqrt" => Ok(Self::Sqrt),
            "asinh" => Ok(Self::Asinh),
            other => Err(ConfigError::UnknownStretch(other.to_string())),
        }
    }
}
