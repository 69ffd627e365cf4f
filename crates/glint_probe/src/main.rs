//! glint_probe - Intersection and BSDF sampling diagnostics.
//!
//! Usage: `glint_probe probe.json [-v] [--samples N] [--seed S]`

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

mod cli;
mod config;
mod probe;

use cli::Args;
use config::ProbeConfig;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.level_filter())
        .parse_default_env()
        .init();

    let mut config = ProbeConfig::load(&args.config)
        .with_context(|| format!("Failed to load probe {}", args.config.display()))?;
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("Invalid command line override")?;

    let sphere = config.sphere();
    let bsdf = config.bsdf();
    log::info!(
        "Probing sphere r={} with {:?}, {} samples, seed {}",
        config.sphere.radius,
        bsdf,
        config.samples,
        config.seed
    );

    let start = Instant::now();
    let report = probe::run_probe(&sphere, config.ray(), &bsdf, config.samples, config.seed);
    log::info!("Probe finished in {:?}", start.elapsed());

    if report.hit.is_none() {
        log::warn!("Ray missed the sphere; no BSDF samples drawn");
    }
    print!("{report}");

    Ok(())
}
