use fitsview_core::contour::ContourOverlay;
use fitsview_core::palette::Palette;
use fitsview_core::render::DisplayLimits;

/// Viewport display state.
#[derive(Default)]
pub struct ViewportState {
    pub texture: Option<egui::TextureHandle>,
    /// Size of the last presented raster, in output pixels.
    pub raster_size: Option<[usize; 2]>,
    /// Limits the last frame was rendered with.
    pub limits: Option<DisplayLimits>,
    /// Contour lines of the last frame, in output pixels.
    pub contours: Option<ContourOverlay>,
    pub palette: Palette,
    /// Pointer position relative to the viewport's top-left corner.
    pub cursor: Option<(f64, f64)>,
    pub frames_presented: usize,
}
