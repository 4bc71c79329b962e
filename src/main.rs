use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};

use secamiz0r::{
    backend::Libsecam,
    config::Config,
    frame::RgbaFrame,
    intensity::normalize_intensity,
    SecamFilter, SecamOptions,
};

#[derive(Parser)]
#[command(
    name = "secamiz0r",
    version,
    about = "Preview the secamiz0r SECAM Fire filter outside a video editor",
    long_about = "Runs still images through libsecam exactly as the frei0r plugin does, or prints the libsecam options an intensity maps to."
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the libsecam option block for an intensity
    Options {
        /// Effect intensity (0.0-1.0)
        #[arg(short, long, default_value_t = secamiz0r::DEFAULT_INTENSITY)]
        intensity: f64,
    },

    /// Filter an image through libsecam
    Render {
        /// Input image (PNG, JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG path; numbered when more than one frame is rendered
        #[arg(short, long)]
        output: PathBuf,

        /// Effect intensity (0.0-1.0); defaults to the configured value
        #[arg(long)]
        intensity: Option<f64>,

        /// Number of consecutive frames to render
        #[arg(short, long, default_value_t = 1)]
        frames: u32,

        /// Path to the libsecam shared library
        #[arg(short, long)]
        library: Option<PathBuf>,

        /// Configuration file (optional)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Options { intensity } => print_options(intensity),
        Command::Render { input, output, intensity, frames, library, config } => {
            render(&input, &output, intensity, frames, library, config)
        }
    }
}

fn print_options(intensity: f64) -> Result<()> {
    let intensity = normalize_intensity(intensity)
        .ok_or_else(|| anyhow::anyhow!("Intensity must be a finite number"))?;
    let options = SecamOptions::from_intensity(intensity);

    println!("# intensity = {}", intensity);
    print!("{}", toml::to_string_pretty(&options)?);
    Ok(())
}

fn render(
    input: &Path,
    output: &Path,
    intensity: Option<f64>,
    frames: u32,
    library: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    info!("Starting secamiz0r v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            let config = Config::from_file(&config_path).map_err(|e| anyhow::anyhow!(e.user_message()))?;
            config.validate()?;
            config
        }
        None => Config::discover()?,
    };
    if library.is_some() {
        config.library.path = library;
    }

    let libsecam = match &config.library.path {
        Some(path) => Libsecam::load(path),
        None => Libsecam::load_default(),
    }
    .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let libsecam = Arc::new(libsecam);

    let source = RgbaFrame::open(input).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let (width, height) = (source.width(), source.height());
    info!("Input: {:?} ({}x{})", input, width, height);

    let intensity = intensity.unwrap_or(config.filter.default_intensity);
    let mut filter = SecamFilter::with_intensity(libsecam.open(width, height)?, width, height, intensity)?;
    debug!("Options: {:?}", filter.options());

    let mut target = RgbaFrame::new_filled(width, height, [0, 0, 0, 255]);
    for index in 0..frames.max(1) {
        filter.update(source.as_bytes(), target.as_bytes_mut())?;

        let path = frame_path(output, index, frames);
        target
            .save_png(&path)
            .with_context(|| format!("writing frame {}", index))?;
        info!("Wrote {:?}", path);
    }

    Ok(())
}

/// `out.png` for a single frame, `out_0001.png`, `out_0002.png`, ... otherwise
fn frame_path(output: &Path, index: u32, frames: u32) -> PathBuf {
    if frames <= 1 {
        return output.to_path_buf();
    }

    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    output.with_file_name(format!("{}_{:04}.png", stem, index + 1))
}
