use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{PercentileConfig, ViewConfig, ZoomLimits};
use crate::contour::PlotType;
use crate::error::ConfigError;
use crate::image_data::Image;
use crate::palette::Palette;
use crate::render::Interpolation;
use crate::stretch::{Stretch, StretchParams};

/// Which image row is drawn at the bottom of the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Row 0 at the bottom (astronomical convention).
    #[default]
    Lower,
    /// Row 0 at the top (raster convention).
    Upper,
}

/// Axis-aligned rectangle in continuous image-pixel coordinates. Pixel
/// `(i, j)` covers `[i, i+1) x [j, j+1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn from_center_size(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x0: cx - width / 2.0,
            y0: cy - height / 2.0,
            x1: cx + width / 2.0,
            y1: cy + height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Integer pixel ranges `(cols, rows)` of an image of `width` x `height`
    /// that overlap this rectangle. Either range may be empty.
    pub fn pixel_span(
        &self,
        width: usize,
        height: usize,
    ) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let clip = |lo: f64, hi: f64, n: usize| {
            let start = lo.floor().clamp(0.0, n as f64) as usize;
            let end = hi.ceil().clamp(0.0, n as f64) as usize;
            start..end.max(start)
        };
        (
            clip(self.x0, self.x1, width),
            clip(self.y0, self.y1, height),
        )
    }
}

/// Output raster size in screen pixels. Both sides are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: usize,
    pub height: usize,
}

impl ScreenSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Adjustable view parameters. `reset()` restores a stored copy of these.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewParams {
    pub zoom: f64,
    pub pan_center: (f64, f64),
    pub stretch: Stretch,
    pub contrast: f64,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub invert: bool,
}

/// Current pan/zoom/intensity state plus the immutable source image.
#[derive(Clone, Debug)]
pub struct ViewState {
    image: Image,
    current: ViewParams,
    defaults: ViewParams,
    palette: Palette,
    origin: Origin,
    stretch_params: StretchParams,
    zoom_limits: ZoomLimits,
    interpolation: Interpolation,
    auto_limits: PercentileConfig,
    plot_type: PlotType,
    contour_levels: Option<Vec<f64>>,
    contour_color: [u8; 4],
}

impl ViewState {
    /// Build the initial state from a loaded image and validated startup
    /// configuration.
    pub fn new(image: Image, config: &ViewConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let w = image.width() as f64;
        let h = image.height() as f64;
        let zoom_limits = config.zoom_limits;

        let (zoom, pan_center) = match config.zoom_region {
            Some([xmin, xmax, ymin, ymax]) => {
                let zoom = (w / (xmax - xmin)).min(h / (ymax - ymin));
                (
                    zoom.clamp(zoom_limits.min, zoom_limits.max),
                    ((xmin + xmax) / 2.0, (ymin + ymax) / 2.0),
                )
            }
            None => (1.0, (w / 2.0, h / 2.0)),
        };

        let defaults = ViewParams {
            zoom,
            pan_center,
            stretch: config.stretch,
            contrast: config.contrast,
            vmin: config.vmin,
            vmax: config.vmax,
            invert: config.invert,
        };

        Ok(Self {
            image,
            current: defaults.clone(),
            defaults,
            palette: config.palette()?,
            origin: config.origin,
            stretch_params: config.stretch_params(),
            zoom_limits,
            interpolation: config.interpolation,
            auto_limits: config.auto_limits,
            plot_type: config.plot_type,
            contour_levels: config.contour_levels.clone(),
            contour_color: config.contour_color()?,
        })
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn params(&self) -> &ViewParams {
        &self.current
    }

    pub fn zoom(&self) -> f64 {
        self.current.zoom
    }

    pub fn pan_center(&self) -> (f64, f64) {
        self.current.pan_center
    }

    pub fn stretch(&self) -> Stretch {
        self.current.stretch
    }

    pub fn contrast(&self) -> f64 {
        self.current.contrast
    }

    /// Explicit display limits; `None` sides are computed automatically.
    pub fn limits(&self) -> (Option<f64>, Option<f64>) {
        (self.current.vmin, self.current.vmax)
    }

    pub fn invert(&self) -> bool {
        self.current.invert
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn stretch_params(&self) -> &StretchParams {
        &self.stretch_params
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        self.zoom_limits
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Percentile bounds used when a display limit is not set explicitly.
    pub fn auto_limits(&self) -> PercentileConfig {
        self.auto_limits
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }

    /// Explicit contour levels; `None` derives them from the display limits.
    pub fn contour_levels(&self) -> Option<&[f64]> {
        self.contour_levels.as_deref()
    }

    pub fn contour_color(&self) -> [u8; 4] {
        self.contour_color
    }

    /// Image region shown on an output of `screen` size. This is the
    /// region rendering samples and computes auto limits over; it follows
    /// the screen's aspect ratio, so letterbox margins are included.
    pub fn viewport(&self, screen: ScreenSize) -> Rect {
        self.transform(screen).visible_rect()
    }

    /// Screen/image mapping for an output of `screen` size.
    pub fn transform(&self, screen: ScreenSize) -> ViewTransform {
        let fit = (screen.width as f64 / self.image.width() as f64)
            .min(screen.height as f64 / self.image.height() as f64);
        ViewTransform {
            center: self.current.pan_center,
            scale: fit * self.current.zoom,
            screen,
            origin: self.origin,
        }
    }

    /// Multiply the zoom by `factor`, clamped to the configured limits.
    pub fn set_zoom(&mut self, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            warn!(factor, "Ignoring invalid zoom factor");
            return;
        }
        let zoom = (self.current.zoom * factor).clamp(self.zoom_limits.min, self.zoom_limits.max);
        debug!(zoom, "Zoom changed");
        self.current.zoom = zoom;
    }

    /// Move the view centre by `(dx, dy)` image pixels. The centre may leave
    /// the image; rendering shows background there.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.current.pan_center;
        let (nx, ny) = (cx + dx, cy + dy);
        if !(nx.is_finite() && ny.is_finite()) {
            warn!(dx, dy, "Ignoring invalid pan delta");
            return;
        }
        self.current.pan_center = (nx, ny);
    }

    pub fn set_stretch(&mut self, stretch: Stretch) {
        self.current.stretch = stretch;
    }

    /// Set the contrast multiplier. Non-positive or non-finite values are ignored.
    pub fn set_contrast(&mut self, contrast: f64) {
        if contrast.is_finite() && contrast > 0.0 {
            self.current.contrast = contrast;
        } else {
            warn!(contrast, "Ignoring invalid contrast");
        }
    }

    /// Set explicit display limits. Ignored unless `vmin < vmax`, both finite.
    pub fn set_limits(&mut self, vmin: f64, vmax: f64) {
        if vmin.is_finite() && vmax.is_finite() && vmin < vmax {
            self.current.vmin = Some(vmin);
            self.current.vmax = Some(vmax);
        } else {
            warn!(vmin, vmax, "Ignoring invalid display limits");
        }
    }

    /// Drop explicit limits and return to auto mode.
    pub fn clear_limits(&mut self) {
        self.current.vmin = None;
        self.current.vmax = None;
    }

    pub fn toggle_invert(&mut self) {
        self.current.invert = !self.current.invert;
    }

    /// Restore the state captured at construction.
    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }
}

/// Affine mapping between output (screen) pixels and image coordinates.
///
/// Screen coordinates have their origin at the top-left corner of the
/// output with y growing downward; the screen centre shows `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub center: (f64, f64),
    /// Screen pixels per image pixel.
    pub scale: f64,
    pub screen: ScreenSize,
    pub origin: Origin,
}

impl ViewTransform {
    /// Image coordinate under screen point `(sx, sy)`.
    #[inline]
    pub fn screen_to_image(&self, sx: f64, sy: f64) -> (f64, f64) {
        let dx = (sx - self.screen.width as f64 / 2.0) / self.scale;
        let dy = (sy - self.screen.height as f64 / 2.0) / self.scale;
        match self.origin {
            Origin::Upper => (self.center.0 + dx, self.center.1 + dy),
            Origin::Lower => (self.center.0 + dx, self.center.1 - dy),
        }
    }

    /// Screen point showing image coordinate `(ix, iy)`.
    pub fn image_to_screen(&self, ix: f64, iy: f64) -> (f64, f64) {
        let dx = (ix - self.center.0) * self.scale;
        let dy = match self.origin {
            Origin::Upper => (iy - self.center.1) * self.scale,
            Origin::Lower => (self.center.1 - iy) * self.scale,
        };
        (
            self.screen.width as f64 / 2.0 + dx,
            self.screen.height as f64 / 2.0 + dy,
        )
    }

    /// Convert a screen-space displacement into the image-space pan that
    /// keeps content under the cursor (dragging right moves the view left).
    pub fn drag_to_pan(&self, dx_screen: f64, dy_screen: f64) -> (f64, f64) {
        let dx = -dx_screen / self.scale;
        let dy = match self.origin {
            Origin::Upper => -dy_screen / self.scale,
            Origin::Lower => dy_screen / self.scale,
        };
        (dx, dy)
    }

    /// Image-space rectangle covered by the whole output.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_center_size(
            self.center.0,
            self.center.1,
            self.screen.width as f64 / self.scale,
            self.screen.height as f64 / self.scale,
        )
    }
}
