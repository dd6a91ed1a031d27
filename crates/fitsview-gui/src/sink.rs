use fitsview_core::palette::Palette;
use fitsview_core::render::Raster;
use fitsview_core::session::DisplaySink;

use crate::convert::raster_to_color_image;
use crate::state::ViewportState;

/// Uploads each presented raster into the viewport texture.
pub struct TextureSink<'a> {
    pub ctx: &'a egui::Context,
    pub viewport: &'a mut ViewportState,
}

impl DisplaySink for TextureSink<'_> {
    fn present(&mut self, raster: &Raster, palette: Palette) {
        let image = raster_to_color_image(raster, palette);
        let size = image.size;
        match self.viewport.texture {
            Some(ref mut texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.viewport.texture =
                    Some(self.ctx.load_texture("viewport", image, egui::TextureOptions::NEAREST));
            }
        }
        self.viewport.raster_size = Some(size);
        self.viewport.limits = raster.limits();
        self.viewport.contours = raster.contours().cloned();
        self.viewport.palette = palette;
        self.viewport.frames_presented += 1;
    }
}
