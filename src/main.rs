use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lattice_astar::config::Config;
use lattice_astar::simulation::Simulation;

fn main() -> Result<()> {
    init_tracing();
    let config = Config::parse();

    if !config.quiet {
        println!("Starting A* search...");
        println!("Grid size: {:?}", config.size());
        println!(
            "Diagonals: {}, Walls: {}",
            if config.diagonals { "on" } else { "off" },
            config.num_walls
        );
        if config.no_visualization {
            println!("Visualization disabled - running to completion");
        } else {
            println!("Visualization enabled with {}ms delay per step", config.delay_ms);
        }
        println!();
    }

    let mut simulation = Simulation::new(config.clone()).context("failed to set up the search")?;
    let stats = simulation.run().context("search failed")?;

    println!("=== FINAL RESULTS ===");
    println!("{}", stats);
    if !stats.solvable {
        println!("Goal is unreachable; showing the closest approach.");
        println!("Try reducing --num-walls or enabling --diagonals");
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
