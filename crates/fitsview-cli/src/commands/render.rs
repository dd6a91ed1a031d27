use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fitsview_core::args::ViewArgs;
use fitsview_core::io::image_io::save_png;
use fitsview_core::session::{CaptureSink, Session};
use fitsview_core::view::ScreenSize;
use tracing::{debug, info};

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output width in pixels
    #[arg(long, default_value = "800")]
    pub width: usize,

    /// Output height in pixels
    #[arg(long, default_value = "800")]
    pub height: usize,

    /// Pan the initial view by DX DY image pixels
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_hyphen_values = true)]
    pub pan: Option<Vec<f64>>,

    /// Multiply the initial zoom by this factor
    #[arg(long)]
    pub zoom_factor: Option<f64>,

    /// Output PNG path
    #[arg(short, long, default_value = "view.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = args.view.to_config()?;
    debug!(
        file = %config.filename.display(),
        width = args.width,
        height = args.height,
        plot_type = %config.plot_type,
        "Rendering view"
    );
    let mut session = Session::start(&config, ScreenSize::new(args.width, args.height))
        .with_context(|| format!("Failed to open {}", config.filename.display()))?;

    let state = session.state_mut();
    if let Some(factor) = args.zoom_factor {
        state.set_zoom(factor);
    }
    if let Some([dx, dy]) = args.pan.as_deref().and_then(|p| <[f64; 2]>::try_from(p).ok()) {
        state.pan(dx, dy);
    }
    debug!(zoom = state.zoom(), center = ?state.pan_center(), "Initial view adjusted");

    let mut sink = CaptureSink::default();
    session.present(&mut sink);
    let (raster, palette) = sink
        .last
        .context("Renderer produced no frame")?;

    crate::summary::print_render_summary(&session, &raster, &args.output);

    save_png(&raster, palette, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        output = %args.output.display(),
        contour_segments = raster.contours().map_or(0, |c| c.segments.len()),
        "Saved rendered view"
    );
    println!("Saved to {}", args.output.display());

    Ok(())
}
