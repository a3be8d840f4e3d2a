//! Formicary - headless runner
//!
//! Generates (or loads) a session, runs it for a number of ticks and prints
//! a summary. Snapshots are read and written as JSON.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use formicary::core::error::Result;
use formicary::simulation::{ColonyOrchestrator, SimEvent, SimulationSnapshot};
use formicary::SimulationConfig;

/// Headless ant colony simulation
#[derive(Parser, Debug)]
#[command(name = "formicary")]
#[command(about = "Run an ant colony foraging simulation and report the outcome")]
struct Args {
    /// Random seed for world generation and the tick RNG
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to run
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Simulated time per tick
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// TOML config file (missing keys keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resume from a JSON snapshot instead of generating a world
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a JSON snapshot after the run
    #[arg(long)]
    save: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Print the final terrain as text
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.quiet { "formicary=warn" } else { "formicary=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut sim = match &args.load {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let snapshot = SimulationSnapshot::from_json(&json)?;
            ColonyOrchestrator::from_snapshot(config, snapshot)?
        }
        None => ColonyOrchestrator::new(args.seed, config)?,
    };

    let mut collected = 0.0;
    let mut births = 0;
    let mut deaths = 0;
    for _ in 0..args.ticks {
        sim.tick(args.dt);
        for event in sim.drain_events() {
            match event {
                SimEvent::FoodCollected { amount, .. } => collected += amount,
                SimEvent::AntBorn { .. } => births += 1,
                SimEvent::AntDied { .. } => deaths += 1,
                _ => {}
            }
        }
    }

    print_summary(&sim, collected, births, deaths);
    if args.map {
        println!();
        print!("{}", sim.world().render_ascii());
    }

    if let Some(path) = &args.save {
        std::fs::write(path, sim.to_snapshot().to_json()?)?;
        tracing::info!("Saved snapshot to {}", path.display());
    }
    Ok(())
}

fn print_summary(sim: &ColonyOrchestrator, collected: f32, births: u32, deaths: u32) {
    let calendar = sim.calendar();
    println!("=== FORMICARY ===");
    println!(
        "Tick {} (day {}, {:?}, year {})",
        calendar.current_tick(),
        calendar.current_day(),
        calendar.current_season(),
        calendar.current_year()
    );
    println!(
        "Food collected this run: {:.1}   births: {}   deaths: {}",
        collected, births, deaths
    );
    for colony in sim.colonies() {
        println!(
            "  {:<12} nest {}  ants {:>4}  stock {:>7.1}  total {:>8.1}",
            colony.name,
            colony.nest,
            colony.population(),
            colony.food_stock,
            colony.total_collected
        );
    }
    for bp in sim.rooms().blueprints() {
        println!(
            "  {} {}: {:.0}% dug",
            bp.room_type,
            bp.id,
            bp.build_progress(sim.world()) * 100.0
        );
    }
}
