use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ASINH_SOFTENING, DEFAULT_CONTOUR_COLOR, DEFAULT_CONTRAST_STEP, DEFAULT_HIGH_PERCENTILE,
    DEFAULT_LOG_CURVATURE, DEFAULT_LOW_PERCENTILE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM,
    DEFAULT_ZOOM_STEP,
};
use crate::contour::PlotType;
use crate::error::ConfigError;
use crate::palette::{parse_color, Palette};
use crate::render::Interpolation;
use crate::stretch::{Stretch, StretchParams};
use crate::view::Origin;

/// Static startup configuration. Built once (command line and/or TOML file)
/// before a session starts and never changed afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub filename: PathBuf,
    /// HDU index to read the image plane from. Unset picks the first HDU
    /// holding image data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<usize>,
    pub palette: String,
    pub stretch: Stretch,
    pub contrast: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmax: Option<f64>,
    pub invert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Initial visible region `[xmin, xmax, ymin, ymax]` in image pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_region: Option<[f64; 4]>,
    pub origin: Origin,
    pub interpolation: Interpolation,
    pub plot_type: PlotType,
    /// Explicit contour levels. Unset spreads ten levels over the display
    /// limits of each render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contour_levels: Option<Vec<f64>>,
    pub contour_color: String,
    pub auto_limits: PercentileConfig,
    pub log_curvature: f64,
    pub asinh_softening: f64,
    /// Zoom multiplier per scroll notch.
    pub zoom_step: f64,
    /// Contrast multiplier per key press.
    pub contrast_step: f64,
    pub zoom_limits: ZoomLimits,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::new(),
            extension: None,
            palette: Palette::Gray.name().to_string(),
            stretch: Stretch::Linear,
            contrast: 1.0,
            vmin: None,
            vmax: None,
            invert: false,
            title: None,
            zoom_region: None,
            origin: Origin::default(),
            interpolation: Interpolation::default(),
            plot_type: PlotType::default(),
            contour_levels: None,
            contour_color: DEFAULT_CONTOUR_COLOR.to_string(),
            auto_limits: PercentileConfig::default(),
            log_curvature: DEFAULT_LOG_CURVATURE,
            asinh_softening: DEFAULT_ASINH_SOFTENING,
            zoom_step: DEFAULT_ZOOM_STEP,
            contrast_step: DEFAULT_CONTRAST_STEP,
            zoom_limits: ZoomLimits::default(),
        }
    }
}

/// Percentile bounds (0..=100) used for auto display limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentileConfig {
    pub low: f64,
    pub high: f64,
}

impl Default for PercentileConfig {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_PERCENTILE,
            high: DEFAULT_HIGH_PERCENTILE,
        }
    }
}

/// Zoom bounds relative to the zoom that fits the whole image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ViewConfig {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parsed palette identifier.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        self.palette.parse()
    }

    /// Parsed contour line colour.
    pub fn contour_color(&self) -> Result<[u8; 4], ConfigError> {
        parse_color(&self.contour_color)
    }

    pub fn stretch_params(&self) -> StretchParams {
        StretchParams {
            log_curvature: self.log_curvature,
            asinh_softening: self.asinh_softening,
        }
    }

    /// Window title: the configured one, or one derived from the file name.
    pub fn window_title(&self) -> String {
        match self.title {
            Some(ref title) => title.clone(),
            None => format!("FITS Image: {}", self.filename.display()),
        }
    }

    /// Reject invalid combinations. Unlike in-session adjustments, nothing
    /// here is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(vmin) = self.vmin {
            finite("vmin", vmin)?;
        }
        if let Some(vmax) = self.vmax {
            finite("vmax", vmax)?;
        }
        if let (Some(vmin), Some(vmax)) = (self.vmin, self.vmax) {
            if vmin >= vmax {
                return Err(ConfigError::InvertedLimits { vmin, vmax });
            }
        }

        finite("contrast", self.contrast)?;
        if self.contrast <= 0.0 {
            return Err(ConfigError::NonPositiveContrast(self.contrast));
        }

        self.palette()?;
        self.contour_color()?;
        if let Some(ref levels) = self.contour_levels {
            let increasing = levels.windows(2).all(|w| w[0] < w[1]);
            if levels.is_empty() || !increasing || levels.iter().any(|v| !v.is_finite()) {
                return Err(ConfigError::InvalidContourLevels(levels.clone()));
            }
        }

        let PercentileConfig { low, high } = self.auto_limits;
        if !(low.is_finite() && high.is_finite() && 0.0 <= low && low < high && high <= 100.0) {
            return Err(ConfigError::InvalidPercentiles { low, high });
        }

        positive("log_curvature", self.log_curvature)?;
        positive("asinh_softening", self.asinh_softening)?;
        positive("zoom_step", self.zoom_step)?;
        positive("contrast_step", self.contrast_step)?;

        let ZoomLimits { min, max } = self.zoom_limits;
        if !(min.is_finite() && max.is_finite() && 0.0 < min && min <= 1.0 && 1.0 <= max) {
            return Err(ConfigError::InvalidZoomLimits { min, max });
        }

        if let Some(region) = self.zoom_region {
            let [xmin, xmax, ymin, ymax] = region;
            if !(region.iter().all(|v| v.is_finite()) && xmin < xmax && ymin < ymax) {
                return Err(ConfigError::InvalidZoomRegion(region));
            }
        }

        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
