//! Windmap command line entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use windmap::{ConfigOverrides, Orchestrator, WindmapConfig};

#[derive(Parser, Debug)]
#[command(name = "windmap")]
#[command(about = "Render animated wind streamlines over a coastline map")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "WINDMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Wind texture path or URL
    #[arg(long, env = "WINDMAP_WIND")]
    wind: Option<String>,

    /// Coastline GeoJSON path or URL
    #[arg(long, env = "WINDMAP_COASTLINE")]
    coastline: Option<String>,

    /// Skip the coastline layer
    #[arg(long)]
    no_coastline: bool,

    /// Final PNG frame
    #[arg(short, long, env = "WINDMAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Write a numbered snapshot every n frames
    #[arg(long)]
    snapshot_every: Option<u64>,

    /// RNG seed for reproducible output
    #[arg(long, env = "WINDMAP_SEED")]
    seed: Option<u64>,

    /// Frame rate; 0 renders as fast as possible
    #[arg(long)]
    fps: Option<u32>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            wind: self.wind.clone(),
            coastline: self.coastline.clone(),
            no_coastline: self.no_coastline,
            output: self.output.clone(),
            width: self.width,
            height: self.height,
            frames: self.frames,
            snapshot_every: self.snapshot_every,
            seed: self.seed,
            fps: self.fps,
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.with_thread_ids(true).json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let mut config = match &args.config {
        Some(path) => WindmapConfig::load(path)?,
        None => WindmapConfig::default(),
    };
    args.overrides().apply(&mut config);

    info!(
        wind = %config.sources.wind,
        output = %config.output.path.display(),
        width = config.render.width,
        height = config.render.height,
        "Starting windmap"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let orchestrator = Orchestrator::new(config)?;
    match runtime.block_on(orchestrator.run()) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                streamlines = summary.streamlines,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Windmap failed");
            Err(e.into())
        }
    }
}
