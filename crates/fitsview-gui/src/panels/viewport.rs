use fitsview_core::contour::ContourOverlay;
use fitsview_core::controller::{InputEvent, ScrollDirection};

use crate::app::FitsViewApp;

pub fn show(ctx: &egui::Context, app: &mut FitsViewApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            paint_background(ui, rect);

            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
            app.viewport.cursor = response
                .hover_pos()
                .map(|p| ((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64));

            for event in collect_events(ui, &response, rect, app) {
                app.dispatch(ctx, &event);
            }
            if app.viewport.texture.is_none() {
                app.present(ctx);
            }

            if let Some(ref texture) = app.viewport.texture {
                draw_image(ui, texture.id(), rect);
            }
            if let Some(ref overlay) = app.viewport.contours {
                draw_contours(ui, overlay, rect);
            }
            draw_viewing_label(ui, rect, app.session.title());
        });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

/// Translate this frame's pointer and keyboard input into session events,
/// in the order they should be applied.
fn collect_events(
    ui: &egui::Ui,
    response: &egui::Response,
    rect: egui::Rect,
    app: &FitsViewApp,
) -> Vec<InputEvent> {
    let mut events = Vec::new();

    let width = rect.width().round().max(1.0) as usize;
    let height = rect.height().round().max(1.0) as usize;
    let screen = app.session.screen();
    if (width, height) != (screen.width, screen.height) {
        events.push(InputEvent::Resize { width, height });
    }

    if response.double_clicked() {
        events.push(InputEvent::Reset);
    }

    let scroll = ui.input(|i| i.raw_scroll_delta.y);
    if scroll != 0.0 && response.hovered() {
        if let Some((x, y)) = app.viewport.cursor {
            let direction = if scroll > 0.0 {
                ScrollDirection::Up
            } else {
                ScrollDirection::Down
            };
            events.push(InputEvent::Scroll { x, y, direction });
        }
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            events.push(InputEvent::Drag {
                dx: delta.x as f64,
                dy: delta.y as f64,
            });
        }
    }

    let typed: String = ui.input(|i| {
        i.events
            .iter()
            .filter_map(|e| match e {
                egui::Event::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    });
    events.extend(typed.chars().map(InputEvent::Key));

    events
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Contour segments are in raster pixels, and the raster fills `rect` one
/// to one.
fn draw_contours(ui: &egui::Ui, overlay: &ContourOverlay, rect: egui::Rect) {
    let [r, g, b, a] = overlay.color;
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(r, g, b, a));
    let painter = ui.painter_at(rect);
    for segment in &overlay.segments {
        let start = rect.min + egui::vec2(segment.start.0 as f32, segment.start.1 as f32);
        let end = rect.min + egui::vec2(segment.end.0 as f32, segment.end.1 as f32);
        painter.line_segment([start, end], stroke);
    }
}

fn draw_viewing_label(ui: &egui::Ui, rect: egui::Rect, label: &str) {
    if label.is_empty() {
        return;
    }
    let label_pos = rect.left_top() + egui::vec2(8.0, 8.0);
    ui.painter().text(
        label_pos,
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}
