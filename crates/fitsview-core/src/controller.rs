use tracing::debug;

use crate::config::ViewConfig;
use crate::view::{ScreenSize, ViewState};

/// Scroll wheel direction. `Up` zooms in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Discrete input forwarded by a display sink. Screen coordinates are
/// output pixels, origin top-left, y down.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// One wheel notch with the cursor at `(x, y)`.
    Scroll {
        x: f64,
        y: f64,
        direction: ScrollDirection,
    },
    /// Pointer moved by `(dx, dy)` with the button held.
    Drag { dx: f64, dy: f64 },
    Key(char),
    Reset,
    /// Output area changed size.
    Resize { width: usize, height: usize },
}

/// What the display sink should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// The state was updated; draw a fresh render.
    Render,
    /// Close the display and end the session.
    Quit,
}

/// Translates input events into [`ViewState`] updates.
///
/// Every transition is total: out-of-range gestures are clamped by the
/// state setters, and unknown keys leave the state unchanged.
#[derive(Clone, Debug)]
pub struct InteractionController {
    screen: ScreenSize,
    zoom_step: f64,
    contrast_step: f64,
}

impl InteractionController {
    pub fn new(config: &ViewConfig, screen: ScreenSize) -> Self {
        Self {
            screen,
            zoom_step: config.zoom_step,
            contrast_step: config.contrast_step,
        }
    }

    /// Current output size used to map screen coordinates.
    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Apply one event to `state`.
    pub fn handle(&mut self, event: &InputEvent, state: &mut ViewState) -> Response {
        debug!(?event, "Input event");
        match *event {
            InputEvent::Scroll { x, y, direction } => {
                let factor = match direction {
                    ScrollDirection::Up => self.zoom_step,
                    ScrollDirection::Down => 1.0 / self.zoom_step,
                };
                self.zoom_about(state, x, y, factor);
            }
            InputEvent::Drag { dx, dy } => {
                let (px, py) = state.transform(self.screen).drag_to_pan(dx, dy);
                state.pan(px, py);
            }
            InputEvent::Key(key) => return self.key(key, state),
            InputEvent::Reset => state.reset(),
            InputEvent::Resize { width, height } => {
                self.screen = ScreenSize::new(width, height);
            }
        }
        Response::Render
    }

    fn key(&mut self, key: char, state: &mut ViewState) -> Response {
        match key.to_ascii_lowercase() {
            'q' => return Response::Quit,
            'r' => state.reset(),
            'i' => state.toggle_invert(),
            's' => state.set_stretch(state.stretch().next()),
            'a' => state.clear_limits(),
            ']' => state.set_contrast(state.contrast() * self.contrast_step),
            '[' => state.set_contrast(state.contrast() / self.contrast_step),
            '+' | '=' => self.zoom_about_center(state, self.zoom_step),
            '-' => self.zoom_about_center(state, 1.0 / self.zoom_step),
            _ => {}
        }
        Response::Render
    }

    fn zoom_about_center(&self, state: &mut ViewState, factor: f64) {
        let x = self.screen.width as f64 / 2.0;
        let y = self.screen.height as f64 / 2.0;
        self.zoom_about(state, x, y, factor);
    }

    /// Zoom by `factor` keeping the image point under screen `(x, y)` fixed.
    fn zoom_about(&self, state: &mut ViewState, x: f64, y: f64, factor: f64) {
        let (ix, iy) = state.transform(self.screen).screen_to_image(x, y);
        state.set_zoom(factor);
        let (nx, ny) = state.transform(self.screen).screen_to_image(x, y);
        state.pan(ix - nx, iy - ny);
    }
}
