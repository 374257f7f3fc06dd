//! # Verdant Entry Point
//!
//! Generates an overworld, logs how it was built, prints it as text and
//! optionally writes a JSON snapshot of a fresh game on it.

use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use verdant::{
    render_ascii, GameState, GenerationConfig, TerrainSummary, VerdantError, VerdantResult,
    WorldGenerator,
};

/// Command line arguments for Verdant.
#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(about = "Procedurally generated overworlds with rivers, forests and treasure")]
#[command(version)]
struct Args {
    /// Random seed for world generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// World width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// World height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Number of chests to place
    #[arg(long)]
    chests: Option<usize>,

    /// JSON file with generation settings; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON game snapshot to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not print the map
    #[arg(long)]
    quiet: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(error) = run(&args) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> VerdantResult<()> {
    info!("Starting Verdant v{}", verdant::VERSION);

    let config = build_config(args)?;
    info!(
        "Generating {}x{} world with seed {}",
        config.width, config.height, config.seed
    );

    let mut generator = WorldGenerator::from_config(config)?;
    let state = GameState::new_game(&mut generator);
    let world = &state.world;

    info!("Spawn at {} via {:?}", world.spawn, world.report.spawn);
    info!("Terrain: {}", TerrainSummary::from_world(world));
    if world.report.disconnected_landmasses > 0 {
        warn!(
            "{} landmass(es) left without a bridge",
            world.report.disconnected_landmasses
        );
    }
    for chest in &world.chests {
        info!("Chest at {} holds {}", chest.position, chest.item);
    }

    if !args.quiet {
        println!("{}", render_ascii(world, Some(&state.hero)));
    }

    if let Some(path) = &args.output {
        state.save_to_file(path)?;
    }

    Ok(())
}

fn build_config(args: &Args) -> VerdantResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            serde_json::from_str::<GenerationConfig>(&json).map_err(|e| {
                VerdantError::InvalidConfig(format!("{}: {}", path.display(), e))
            })?
        }
        None => GenerationConfig::new(rand::random()),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(chests) = args.chests {
        config.chest_count = chests;
    }

    config.validate()?;
    Ok(config)
}
