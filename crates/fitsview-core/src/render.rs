use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_CONTOUR_LEVELS, DEGENERATE_INTENSITY, PARALLEL_PIXEL_THRESHOLD};
use crate::contour::{self, ContourOverlay};
use crate::image_data::Image;
use crate::palette::Palette;
use crate::stats::{finite_samples, robust_range};
use crate::stretch::{Stretch, StretchParams};
use crate::view::{Rect, ScreenSize, ViewState, ViewTransform};

/// Marker intensity for non-finite and off-image pixels.
pub const SENTINEL: f32 = f32::NAN;

/// How output pixels sample the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
}

/// Display bounds actually used for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayLimits {
    pub vmin: f64,
    pub vmax: f64,
    /// True when at least one bound came from the visible-pixel percentiles.
    pub auto: bool,
}

impl DisplayLimits {
    /// `vmax <= vmin`: every finite pixel maps to the mid intensity.
    pub fn is_degenerate(&self) -> bool {
        self.vmax <= self.vmin || !(self.vmax - self.vmin).is_finite()
    }
}

/// Rendered intensities in [0, 1], or [`SENTINEL`], shape = (height, width).
#[derive(Clone, Debug)]
pub struct Raster {
    data: Array2<f32>,
    limits: Option<DisplayLimits>,
    transform: ViewTransform,
    contours: Option<ContourOverlay>,
}

impl Raster {
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Intensity at output pixel `(col, row)`; `None` for sentinel pixels or
    /// coordinates outside the raster.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        self.data.get([row, col]).copied().filter(|v| !is_sentinel(*v))
    }

    /// Limits used for this render; `None` when nothing finite was visible.
    pub fn limits(&self) -> Option<DisplayLimits> {
        self.limits
    }

    /// The screen/image mapping this raster was rendered with.
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Contour lines to draw over the raster, in output pixel coordinates.
    pub fn contours(&self) -> Option<&ContourOverlay> {
        self.contours.as_ref()
    }

    pub fn is_all_sentinel(&self) -> bool {
        self.data.iter().all(|v| is_sentinel(*v))
    }

    /// Row-major RGBA pixels through `palette`.
    pub fn to_rgba(&self, palette: Palette) -> Vec<[u8; 4]> {
        self.data.iter().map(|&v| palette.lookup(v)).collect()
    }
}

/// Bitwise comparison, so two sentinel pixels compare equal.
impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.contours == other.contours
            && self.data.dim() == other.data.dim()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

#[inline]
pub fn is_sentinel(v: f32) -> bool {
    v.is_nan()
}

/// Normalize → stretch → contrast → invert, for finite samples.
#[derive(Clone, Copy, Debug)]
pub struct IntensityMap {
    pub limits: DisplayLimits,
    pub stretch: Stretch,
    pub params: StretchParams,
    pub contrast: f64,
    pub invert: bool,
}

impl IntensityMap {
    pub fn from_state(state: &ViewState, limits: DisplayLimits) -> Self {
        Self {
            limits,
            stretch: state.stretch(),
            params: *state.stretch_params(),
            contrast: state.contrast(),
            invert: state.invert(),
        }
    }

    #[inline]
    pub fn map(&self, s: f32) -> f32 {
        // A flat view shows mid-gray under every stretch, contrast and invert.
        if self.limits.is_degenerate() {
            return DEGENERATE_INTENSITY;
        }
        let DisplayLimits { vmin, vmax, .. } = self.limits;
        let t = ((s as f64 - vmin) / (vmax - vmin)).clamp(0.0, 1.0);
        let t = self.stretch.apply(t, &self.params);
        let t = (0.5 + self.contrast * (t - 0.5)).clamp(0.0, 1.0);
        let t = if self.invert { 1.0 - t } else { t };
        t as f32
    }
}

/// Render the current view at `width` x `height` output pixels.
///
/// Pure function of the view state: no caching and no dependence on the
/// event history. A view with no visible image yields an all-sentinel raster.
pub fn render(state: &ViewState, width: usize, height: usize) -> Raster {
    let screen = ScreenSize::new(width, height);
    let transform = state.transform(screen);
    let visible = state.viewport(screen);

    let limits = effective_limits(state, &visible);
    let image = state.image();
    let interpolation = state.interpolation();

    // x depends only on the column and y only on the row.
    let xs: Vec<f64> = (0..screen.width)
        .map(|col| transform.screen_to_image(col as f64 + 0.5, 0.0).0)
        .collect();
    let ys: Vec<f64> = (0..screen.height)
        .map(|row| transform.screen_to_image(0.0, row as f64 + 0.5).1)
        .collect();

    let plot_type = state.plot_type();
    let data = match limits {
        Some(limits) if plot_type.shows_image() => {
            let map = IntensityMap::from_state(state, limits);
            let render_row = |iy: f64| -> Vec<f32> {
                xs.iter()
                    .map(|&ix| match sample(image, ix, iy, interpolation) {
                        Some(s) => map.map(s),
                        None => SENTINEL,
                    })
                    .collect()
            };

            let rows: Vec<Vec<f32>> = if screen.width * screen.height >= PARALLEL_PIXEL_THRESHOLD {
                ys.par_iter().map(|&iy| render_row(iy)).collect()
            } else {
                ys.iter().map(|&iy| render_row(iy)).collect()
            };

            let flat: Vec<f32> = rows.into_iter().flatten().collect();
            Array2::from_shape_vec((screen.height, screen.width), flat)
                .unwrap_or_else(|_| Array2::from_elem((screen.height, screen.width), SENTINEL))
        }
        _ => Array2::from_elem((screen.height, screen.width), SENTINEL),
    };

    let contours = match limits {
        Some(limits) if plot_type.shows_contours() => {
            let levels = match state.contour_levels() {
                Some(levels) => levels.to_vec(),
                None => contour::default_levels(limits.vmin, limits.vmax, DEFAULT_CONTOUR_LEVELS),
            };
            let segments = contour::extract(image, &levels, &visible);
            Some(ContourOverlay::project(segments, &transform, state.contour_color()))
        }
        _ => None,
    };

    debug!(
        width = screen.width,
        height = screen.height,
        zoom = state.zoom(),
        limits = ?limits,
        contour_segments = contours.as_ref().map_or(0, |c| c.segments.len()),
        "Rendered view"
    );

    Raster {
        data,
        limits,
        transform,
        contours,
    }
}

/// Display limits for the region `visible`: explicit bounds where set,
/// percentiles of the visible finite samples otherwise. `None` if a bound
/// is needed but no finite sample is visible.
pub fn effective_limits(state: &ViewState, visible: &Rect) -> Option<DisplayLimits> {
    if let (Some(vmin), Some(vmax)) = state.limits() {
        return Some(DisplayLimits {
            vmin,
            vmax,
            auto: false,
        });
    }

    let image = state.image();
    let (cols, rows) = visible.pixel_span(image.width(), image.height());
    let mut samples = finite_samples(image, cols, rows);
    let percentiles = state.auto_limits();
    let (lo, hi) = robust_range(&mut samples, percentiles.low, percentiles.high)?;

    let (vmin, vmax) = state.limits();
    Some(DisplayLimits {
        vmin: vmin.unwrap_or(lo),
        vmax: vmax.unwrap_or(hi),
        auto: true,
    })
}

/// Finite source value at continuous image coordinate `(ix, iy)`, or `None`
/// off-image or on a non-finite sample.
#[inline]
pub fn sample(image: &Image, ix: f64, iy: f64, interpolation: Interpolation) -> Option<f32> {
    match interpolation {
        Interpolation::Nearest => nearest(image, ix, iy),
        Interpolation::Bilinear => bilinear(image, ix, iy).or_else(|| nearest(image, ix, iy)),
    }
}

#[inline]
fn nearest(image: &Image, ix: f64, iy: f64) -> Option<f32> {
    image
        .sample(ix.floor() as i64, iy.floor() as i64)
        .filter(|v| v.is_finite())
}

/// Bilinear interpolation between pixel centres. `None` if any of the four
/// taps is missing or non-finite.
fn bilinear(image: &Image, ix: f64, iy: f64) -> Option<f32> {
    let fx = ix - 0.5;
    let fy = iy - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let tap = |x: i64, y: i64| image.sample(x, y).filter(|v| v.is_finite()).map(f64::from);
    let v00 = tap(x0, y0)?;
    let v10 = tap(x0 + 1, y0)?;
    let v01 = tap(x0, y0 + 1)?;
    let v11 = tap(x0 + 1, y0 + 1)?;

    let top = v00 + (v10 - v00) * tx;
    let bottom = v01 + (v11 - v01) * tx;
    Some((top + (bottom - top) * ty) as f32)
}
