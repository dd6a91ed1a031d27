use std::path::PathBuf;

use clap::Args;

use crate::config::ViewConfig;
use crate::contour::PlotType;
use crate::error::ConfigError;
use crate::render::Interpolation;
use crate::stretch::Stretch;
use crate::view::Origin;

/// Startup view options shared by every front end that opens an image.
/// Anything given here overrides the `--config` file.
#[derive(Args, Clone, Debug)]
pub struct ViewArgs {
    /// Input FITS (or PNG/TIFF) file
    pub file: PathBuf,

    /// HDU index to display (default: first HDU holding image data)
    #[arg(short, long)]
    pub ext: Option<usize>,

    /// View config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Colour map (gray, viridis, magma, heat, cool)
    #[arg(long)]
    pub cmap: Option<String>,

    /// Intensity stretch
    #[arg(long, value_enum)]
    pub stretch: Option<Stretch>,

    /// Contrast multiplier around mid-gray
    #[arg(long)]
    pub contrast: Option<f64>,

    /// Lower display limit (default: 1st percentile of visible pixels)
    #[arg(long, allow_hyphen_values = true)]
    pub vmin: Option<f64>,

    /// Upper display limit (default: 99th percentile of visible pixels)
    #[arg(long, allow_hyphen_values = true)]
    pub vmax: Option<f64>,

    /// Invert the intensity scale
    #[arg(long)]
    pub invert: bool,

    /// Initial visible region in image pixels
    #[arg(
        long,
        num_args = 4,
        value_names = ["XMIN", "XMAX", "YMIN", "YMAX"],
        allow_hyphen_values = true
    )]
    pub zoom: Option<Vec<f64>>,

    /// Row 0 at the bottom (lower) or top (upper) of the display
    #[arg(long, value_enum)]
    pub origin: Option<Origin>,

    /// Resampling when zoomed
    #[arg(long, value_enum)]
    pub interpolation: Option<Interpolation>,

    /// Draw the image, its contours, or both
    #[arg(long, value_enum)]
    pub plot_type: Option<PlotType>,

    /// Comma-separated contour levels (default: ten levels spanning the display limits)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub contour_levels: Option<Vec<f64>>,

    /// Contour colour (name or #rrggbb)
    #[arg(long)]
    pub contour_color: Option<String>,

    /// Window title
    #[arg(long)]
    pub title: Option<String>,
}

impl ViewArgs {
    /// Build the startup configuration: TOML file first, then command-line
    /// overrides. Not validated here; the session does that.
    pub fn to_config(&self) -> Result<ViewConfig, ConfigError> {
        let mut config = match self.config {
            Some(ref path) => ViewConfig::from_toml_file(path)?,
            None => ViewConfig::default(),
        };

        config.filename = self.file.clone();
        if self.ext.is_some() {
            config.extension = self.ext;
        }
        if let Some(ref cmap) = self.cmap {
            config.palette = cmap.clone();
        }
        if let Some(stretch) = self.stretch {
            config.stretch = stretch;
        }
        if let Some(contrast) = self.contrast {
            config.contrast = contrast;
        }
        if self.vmin.is_some() {
            config.vmin = self.vmin;
        }
        if self.vmax.is_some() {
            config.vmax = self.vmax;
        }
        config.invert |= self.invert;
        if let Some(ref zoom) = self.zoom {
            config.zoom_region = <[f64; 4]>::try_from(zoom.as_slice()).ok();
        }
        if let Some(origin) = self.origin {
            config.origin = origin;
        }
        if let Some(interpolation) = self.interpolation {
            config.interpolation = interpolation;
        }
        if let Some(plot_type) = self.plot_type {
            config.plot_type = plot_type;
        }
        if self.contour_levels.is_some() {
            config.contour_levels = self.contour_levels.clone();
        }
        if let Some(ref color) = self.contour_color {
            config.contour_color = color.clone();
        }
        if self.title.is_some() {
            config.title = self.title.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        view: ViewArgs,
    }

    fn parse(args: &[&str]) -> ViewConfig {
        let cli = Cli::try_parse_from(std::iter::once("fitsview").chain(args.iter().copied()))
            .unwrap();
        cli.view.to_config().unwrap()
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let config = parse(&["m31.fits"]);
        assert_eq!(config.filename, PathBuf::from("m31.fits"));
        assert_eq!(config.extension, None);
        assert_eq!(config.stretch, Stretch::Linear);
        assert_eq!(config.plot_type, PlotType::ImageContours);
        assert_eq!(config.zoom_region, None);
    }

    #[test]
    fn flags_override_config() {
        let config = parse(&[
            "m31.fits",
            "--ext",
            "2",
            "--stretch",
            "asinh",
            "--origin",
            "upper",
            "--interpolation",
            "bilinear",
            "--vmin",
            "-5",
            "--zoom",
            "0",
            "10",
            "-2",
            "8",
            "--plot-type",
            "contours",
            "--contour-levels",
            "-1,0.5,3",
            "--contour-color",
            "#ff0000",
            "--invert",
        ]);
        assert_eq!(config.extension, Some(2));
        assert_eq!(config.stretch, Stretch::Asinh);
        assert_eq!(config.origin, Origin::Upper);
        assert_eq!(config.interpolation, Interpolation::Bilinear);
        assert_eq!(config.vmin, Some(-5.0));
        assert_eq!(config.zoom_region, Some([0.0, 10.0, -2.0, 8.0]));
        assert_eq!(config.plot_type, PlotType::Contours);
        assert_eq!(config.contour_levels, Some(vec![-1.0, 0.5, 3.0]));
        assert_eq!(config.contour_color().unwrap(), [255, 0, 0, 255]);
        assert!(config.invert);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_stretch_is_a_parse_error() {
        let result = Cli::try_parse_from(["fitsview", "a.fits", "--stretch", "gamma"]);
        assert!(result.is_err());
    }
}
