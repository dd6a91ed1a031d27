use fitsview_core::palette::Palette;
use fitsview_core::render::Raster;

/// Convert a rendered raster (intensities in [0.0, 1.0] or sentinel) to an
/// egui ColorImage through `palette`. Sentinel pixels become transparent.
pub fn raster_to_color_image(raster: &Raster, palette: Palette) -> egui::ColorImage {
    let pixels = raster
        .to_rgba(palette)
        .into_iter()
        .map(|[r, g, b, a]| egui::Color32::from_rgba_unmultiplied(r, g, b, a))
        .collect();

    egui::ColorImage {
        size: [raster.width(), raster.height()],
        pixels,
        source_size: Default::default(),
    }
}
