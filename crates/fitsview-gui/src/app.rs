use fitsview_core::controller::{InputEvent, Response};
use fitsview_core::session::Session;

use crate::panels;
use crate::sink::TextureSink;
use crate::state::ViewportState;

pub struct FitsViewApp {
    pub session: Session,
    pub viewport: ViewportState,
}

impl FitsViewApp {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            viewport: ViewportState::default(),
        }
    }

    /// Run one event through the session and upload the resulting frame.
    /// Closes the window when the session ends.
    pub fn dispatch(&mut self, ctx: &egui::Context, event: &InputEvent) {
        let mut sink = TextureSink {
            ctx,
            viewport: &mut self.viewport,
        };
        if self.session.dispatch(event, &mut sink) == Response::Quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Upload a frame of the current state without changing it.
    pub fn present(&mut self, ctx: &egui::Context) {
        let mut sink = TextureSink {
            ctx,
            viewport: &mut self.viewport,
        };
        self.session.present(&mut sink);
    }
}

impl eframe::App for FitsViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::status::show(ctx, self);
        panels::viewport::show(ctx, self);
    }
}
