//! World-map exploration demo.
//!
//! Runs a seeded headless world where caravans and aircraft uncover the map,
//! printing exploration progress and optionally writing the final save.

use clap::Parser;
use fog_engine::{write_save, EngineConfig};
use fog_sim::{SimError, SimParams, Simulation};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the demo
#[derive(Parser, Debug)]
#[command(name = "fog_sim")]
#[command(about = "A headless world-map exploration demo")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Grid width in tiles
    #[arg(long, default_value_t = 48)]
    width: u32,

    /// Grid height in tiles
    #[arg(long, default_value_t = 32)]
    height: u32,

    /// Player caravans wandering from the home settlement
    #[arg(long, default_value_t = 3)]
    caravans: u32,

    /// Non-player settlements scattered across the map
    #[arg(long, default_value_t = 12)]
    settlements: u32,

    /// Player aircraft flying between random waypoints
    #[arg(long, default_value_t = 1)]
    aircraft: u32,

    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final exploration save to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Interval between progress reports (in ticks)
    #[arg(long, default_value_t = 2_500)]
    report_interval: u64,
}

impl Args {
    fn params(&self) -> SimParams {
        SimParams {
            seed: self.seed,
            ticks: self.ticks,
            width: self.width,
            height: self.height,
            caravans: self.caravans,
            settlements: self.settlements,
            aircraft: self.aircraft,
            report_interval: self.report_interval,
            ..SimParams::default()
        }
    }
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading engine configuration");
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };

    println!("World-Map Exploration Demo");
    println!("==========================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", args.ticks);
    println!("Grid: {} x {}", args.width, args.height);
    println!();

    let mut sim = Simulation::new(args.params(), config);
    let last = sim.run(|report| println!("{}", report.summary()));

    println!();
    println!("Simulation complete.");
    println!("{}", last.summary());

    if let Some(path) = &args.output {
        write_save(path, &sim.save())?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
