mod app;
mod convert;
mod panels;
mod sink;
mod state;

use std::process::ExitCode;

use clap::Parser;
use fitsview_core::args::ViewArgs;
use fitsview_core::error::ViewerError;
use fitsview_core::session::Session;
use fitsview_core::view::ScreenSize;

const INITIAL_SIZE: [f32; 2] = [1000.0, 800.0];

#[derive(Parser)]
#[command(name = "fitsview-gui", about = "Interactive FITS image viewer")]
#[command(version)]
struct GuiArgs {
    #[command(flatten)]
    view: ViewArgs,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = GuiArgs::parse();

    // Config and source errors end the process before any window opens.
    let session = match args
        .view
        .to_config()
        .map_err(ViewerError::from)
        .and_then(|config| Session::start(&config, initial_screen()))
    {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(err.exit_code() as u8);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(INITIAL_SIZE)
            .with_min_inner_size([320.0, 240.0])
            .with_title(session.title()),
        ..Default::default()
    };

    let result = eframe::run_native(
        "fitsview",
        options,
        Box::new(|_cc| Ok(Box::new(app::FitsViewApp::new(session)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn initial_screen() -> ScreenSize {
    ScreenSize::new(INITIAL_SIZE[0] as usize, INITIAL_SIZE[1] as usize)
}
