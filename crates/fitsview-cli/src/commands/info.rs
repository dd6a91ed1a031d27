use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fitsview_core::consts::{DEFAULT_HIGH_PERCENTILE, DEFAULT_LOW_PERCENTILE};
use fitsview_core::io::fits::list_hdus;
use fitsview_core::io::{is_fits, open_image};
use fitsview_core::stats::plane_stats;
use tracing::{debug, info};

#[derive(Args)]
pub struct InfoArgs {
    /// Input FITS (or PNG/TIFF) file
    pub file: PathBuf,

    /// HDU index to summarise (default: first HDU holding image data)
    #[arg(short, long)]
    pub ext: Option<usize>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    println!("File:        {}", args.file.display());

    let image = open_image(&args.file, args.ext).with_context(|| match args.ext {
        Some(ext) => format!("Failed to load extension {ext}"),
        None => format!("Failed to load an image from {}", args.file.display()),
    })?;
    let meta = &image.metadata;
    info!(extension = meta.extension, "Summarising image");

    if is_fits(&args.file) {
        let hdus = list_hdus(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?;
        debug!(count = hdus.len(), "Indexed HDUs");
        println!("HDUs:        {}", hdus.len());
        for hdu in &hdus {
            let shape: Vec<String> = hdu.shape.iter().map(|n| n.to_string()).collect();
            let marker = if hdu.index == meta.extension { "*" } else { " " };
            println!(
                "  {marker}{:>3}  {:<10} BITPIX={:<4} [{}]",
                hdu.index,
                hdu.kind.to_string(),
                hdu.bitpix,
                shape.join(" x ")
            );
        }
    }

    println!("Extension:   {}", meta.extension);
    println!("Dimensions:  {}x{}", image.width(), image.height());
    if let Some(bitpix) = meta.bitpix {
        println!("BITPIX:      {}", bitpix);
    }
    if let Some(ref obj) = meta.object {
        println!("Object:      {}", obj);
    }
    if let Some(ref tel) = meta.telescope {
        println!("Telescope:   {}", tel);
    }
    if let Some(ref inst) = meta.instrument {
        println!("Instrument:  {}", inst);
    }
    if let Some(ref unit) = meta.unit {
        println!("Unit:        {}", unit);
    }

    match plane_stats(&image, DEFAULT_LOW_PERCENTILE, DEFAULT_HIGH_PERCENTILE) {
        Some(stats) => {
            println!("Finite:      {} / {}", stats.finite, stats.total);
            println!("Min / max:   {:.6} / {:.6}", stats.min, stats.max);
            println!("Mean:        {:.6}", stats.mean);
            println!(
                "P{:.0} / P{:.0}:   {:.6} / {:.6}",
                DEFAULT_LOW_PERCENTILE, DEFAULT_HIGH_PERCENTILE, stats.low, stats.high
            );
        }
        None => println!("Finite:      0 / {}", image.width() * image.height()),
    }

    Ok(())
}
