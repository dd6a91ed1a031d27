mod commands;
mod summary;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fitsview_core::error::{ConfigError, SourceError, ViewerError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fitsview", about = "FITS image viewer (headless front end)")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show FITS/image file metadata and plane statistics
    Info(commands::info::InfoArgs),
    /// Render a view of an image to a PNG file
    Render(commands::render::RenderArgs),
    /// Print or save the default view configuration as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}

/// 2 for configuration errors, 3 for image source errors, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ViewerError>() {
            return e.exit_code() as u8;
        }
        if cause.is::<ConfigError>() {
            return 2;
        }
        if cause.is::<SourceError>() {
            return 3;
        }
    }
    1
}
