use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments.
///
/// Flags that are given override the scene file and the render
/// configuration file.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "CPU path tracer for spheres, triangles and point lights")]
pub struct Args {
    /// Scene description (JSON). Renders the reference box when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Render configuration (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of path segments per sample
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,

    /// Base seed for the per-pixel random streams
    #[arg(long)]
    pub seed: Option<u64>,

    /// Trace samples in eight-wide packets
    #[arg(long)]
    pub packet: bool,

    /// Output file path (.ppm for plain text, .png and others via the image encoder)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
