use tracing::info;

use crate::config::ViewConfig;
use crate::controller::{InputEvent, InteractionController, Response};
use crate::error::Result;
use crate::image_data::Image;
use crate::io::open_image;
use crate::palette::Palette;
use crate::render::{render, Raster};
use crate::view::{ScreenSize, ViewState};

/// Receives rendered rasters. Implemented by whatever draws to the screen
/// (or to a file, for headless use).
pub trait DisplaySink {
    fn present(&mut self, raster: &Raster, palette: Palette);
}

/// Sink that keeps the most recent raster, for headless rendering.
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub last: Option<(Raster, Palette)>,
    pub presented: usize,
}

impl DisplaySink for CaptureSink {
    fn present(&mut self, raster: &Raster, palette: Palette) {
        self.last = Some((raster.clone(), palette));
        self.presented += 1;
    }
}

/// One viewing session: the live view state and the controller that
/// updates it. Each dispatched event yields one update and one render.
#[derive(Debug)]
pub struct Session {
    state: ViewState,
    controller: InteractionController,
    title: String,
}

impl Session {
    /// Validate `config`, load the image it names and build the session.
    /// Configuration is checked before the file is touched.
    pub fn start(config: &ViewConfig, screen: ScreenSize) -> Result<Self> {
        config.validate()?;
        let image = open_image(&config.filename, config.extension)?;
        Self::with_image(image, config, screen)
    }

    /// Build a session around an already loaded image.
    pub fn with_image(image: Image, config: &ViewConfig, screen: ScreenSize) -> Result<Self> {
        let state = ViewState::new(image, config)?;
        let controller = InteractionController::new(config, screen);
        let title = config.window_title();
        info!(
            title = %title,
            width = state.image().width(),
            height = state.image().height(),
            stretch = %state.stretch(),
            palette = %state.palette(),
            "Session started"
        );
        Ok(Self {
            state,
            controller,
            title,
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Direct access for scripted adjustments outside the event loop.
    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn screen(&self) -> ScreenSize {
        self.controller.screen()
    }

    /// Render the current state at the current output size.
    pub fn render(&self) -> Raster {
        let screen = self.controller.screen();
        render(&self.state, screen.width, screen.height)
    }

    /// Render and hand the raster to `sink`.
    pub fn present(&self, sink: &mut impl DisplaySink) {
        sink.present(&self.render(), self.state.palette());
    }

    /// Apply `event`, then render and present once unless the event ends
    /// the session.
    pub fn dispatch(&mut self, event: &InputEvent, sink: &mut impl DisplaySink) -> Response {
        let response = self.controller.handle(event, &mut self.state);
        if response == Response::Render {
            self.present(sink);
        } else {
            info!("Session ended");
        }
        response
    }
}
