/// Minimum output pixel count (h*w) to resample rows in parallel with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default lower percentile for auto display limits.
pub const DEFAULT_LOW_PERCENTILE: f64 = 1.0;

/// Default upper percentile for auto display limits.
pub const DEFAULT_HIGH_PERCENTILE: f64 = 99.0;

/// Upper bound on samples fed to the percentile computation. Larger visible
/// regions are decimated with a fixed stride so the result stays deterministic.
pub const MAX_STAT_SAMPLES: usize = 1_000_000;

/// Default curvature `k` of the log stretch, `log(1 + k*t) / log(1 + k)`.
pub const DEFAULT_LOG_CURVATURE: f64 = 1000.0;

/// Default softening `a` of the asinh stretch, `asinh(t/a) / asinh(1/a)`.
pub const DEFAULT_ASINH_SOFTENING: f64 = 0.1;

/// Zoom multiplier per scroll notch.
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Contrast multiplier per `[` / `]` key press.
pub const DEFAULT_CONTRAST_STEP: f64 = 1.1;

/// Smallest zoom, relative to the zoom that fits the whole image.
pub const DEFAULT_MIN_ZOOM: f64 = 1e-3;

/// Largest zoom, relative to the zoom that fits the whole image.
pub const DEFAULT_MAX_ZOOM: f64 = 1e3;

/// Number of contour levels spread over the display limits when none are given.
pub const DEFAULT_CONTOUR_LEVELS: usize = 10;

/// Contour line colour when none is configured.
pub const DEFAULT_CONTOUR_COLOR: &str = "white";

/// Intensity assigned to every finite pixel when vmin == vmax.
pub const DEGENERATE_INTENSITY: f32 = 0.5;

/// FITS logical record size in bytes.
pub const FITS_BLOCK_SIZE: usize = 2880;

/// FITS header card size in bytes.
pub const FITS_CARD_SIZE: usize = 80;
