use std::path::PathBuf;

use thiserror::Error;

/// Invalid startup options. Reported before any window opens.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("vmin ({vmin}) must be less than vmax ({vmax})")]
    InvertedLimits { vmin: f64, vmax: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("contrast must be > 0, got {0}")]
    NonPositiveContrast(f64),

    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    #[error("unknown stretch: {0} (expected linear, log, sqrt or asinh)")]
    UnknownStretch(String),

    #[error("unknown plot type: {0} (expected image, contours or image-contours)")]
    UnknownPlotType(String),

    #[error("unknown colour: {0} (expected a name or #rrggbb)")]
    UnknownColor(String),

    #[error("contour levels must be finite and strictly increasing, got {0:?}")]
    InvalidContourLevels(Vec<f64>),

    #[error("percentile bounds must satisfy 0 <= low < high <= 100, got {low}..{high}")]
    InvalidPercentiles { low: f64, high: f64 },

    #[error("zoom region must satisfy xmin < xmax and ymin < ymax, got {0:?}")]
    InvalidZoomRegion([f64; 4]),

    #[error("zoom limits must satisfy 0 < min <= 1 <= max, got {min}..{max}")]
    InvalidZoomLimits { min: f64, max: f64 },

    #[error("{name} must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures of the image source. Fatal at startup.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FITS file: {0}")]
    InvalidFits(String),

    #[error("Unsupported BITPIX: {0}")]
    UnsupportedBitpix(i64),

    #[error("Extension {index} out of range (file has {total} HDUs)")]
    ExtensionOutOfRange { index: usize, total: usize },

    #[error("HDU {index} holds no 2D image data (NAXIS = {naxis})")]
    NotAnImage { index: usize, naxis: usize },

    #[error("No image data found in any of {total} HDUs")]
    NoImage { total: usize },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// Anything that can stop a session from starting.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

impl ViewerError {
    /// Process exit code: 2 for configuration errors, 3 for source errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Source(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
