use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line
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

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "glint_probe")]
#[command(about = "Intersect one ray with a sphere and report BSDF sampling statistics")]
pub struct Args {
    /// Probe description (JSON)
    pub config: PathBuf,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging level (RUST_LOG still applies per module)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Override the sample count from the description
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Override the seed from the description
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Args {
    pub fn level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            self.log_level.into()
        }
    }
}
