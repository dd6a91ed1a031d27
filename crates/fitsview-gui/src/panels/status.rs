use crate::app::FitsViewApp;

pub fn show(ctx: &egui::Context, app: &mut FitsViewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        let state = app.session.state();
        let image = state.image();

        ui.horizontal(|ui| {
            ui.label(format!("{}x{}", image.width(), image.height()));
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", state.zoom() * 100.0));
            ui.separator();
            ui.label(format!("Stretch: {}", state.stretch()));
            ui.separator();
            ui.label(format!("Contrast: {:.2}", state.contrast()));
            ui.separator();
            match app.viewport.limits {
                Some(limits) => {
                    let mode = if limits.auto { "auto" } else { "fixed" };
                    ui.label(format!("Limits: {:.4} .. {:.4} ({mode})", limits.vmin, limits.vmax));
                }
                None => {
                    ui.label("Limits: -");
                }
            }
            if state.invert() {
                ui.separator();
                ui.label("Inverted");
            }
            ui.separator();
            ui.label(format!("Palette: {}", app.viewport.palette));
            if let Some(ref overlay) = app.viewport.contours {
                ui.separator();
                ui.label(format!("Contours: {} segments", overlay.segments.len()));
            }

            // Image coordinate and value under the pointer.
            if let Some((x, y)) = app.viewport.cursor {
                let (ix, iy) = state.transform(app.session.screen()).screen_to_image(x, y);
                let (px, py) = (ix.floor() as i64, iy.floor() as i64);
                if let Some(value) = image.sample(px, py) {
                    ui.separator();
                    ui.label(format!("({px}, {py}) = {value:.6}"));
                }
            }
        });

        ui.add_space(2.0);
    });
}
