//! TROPHIC - CLI entry point
//!
//! Food-web simulator driver: seeds a world, runs the monthly loop and
//! forwards snapshots to the console and the time-series export.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use trophic::{benchmark, Config, World};

#[derive(Parser)]
#[command(name = "trophic")]
#[command(version)]
#[command(about = "Agent-based plants vs. herbivores vs. carnivores simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of months to simulate (overrides the config value)
        #[arg(short, long)]
        months: Option<u32>,

        /// Output directory for the time series
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of months
        #[arg(short, long, default_value = "512")]
        months: u32,

        /// Square grid size
        #[arg(short, long, default_value = "100")]
        grid: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            months,
            output,
            seed,
            quiet,
        } => run_simulation(config, months, output, seed, quiet),

        Commands::Benchmark { months, grid } => run_benchmark(months, grid),

        Commands::Init { output } => generate_config(output),
    }
}

fn run_simulation(
    config_path: PathBuf,
    months: Option<u32>,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };
    init_logging(&config.run.log_level);

    let max_months = months.unwrap_or(config.run.max_months);
    let stats_interval = config.run.stats_interval;

    // Create output directory
    std::fs::create_dir_all(&output)?;

    // Create world
    let mut world = if let Some(s) = seed {
        println!("Using seed: {}", s);
        World::new_with_seed(config.clone(), s)?
    } else {
        World::new(config.clone())?
    };

    println!("Simulation with:");
    println!("  {} territory area", world.territory.area());
    println!("  {} plants", world.stats.plants);
    println!("  {} herbivores", world.stats.herbivores);
    println!("  {} carnivores", world.stats.carnivores);
    println!("Timespan: {:.1} years", max_months as f64 / 12.0);
    println!();

    // Dump the map only for small grids; anything bigger floods the console
    let show_map = world.territory.area() < 4096;

    let start = Instant::now();
    let reason = world.run_with_callback(max_months, |w| {
        if quiet {
            return;
        }
        if w.month % stats_interval == 0 {
            println!("{}", w.stats.summary());
            if show_map {
                println!("{}", w.territory);
            }
        }
    })?;
    let elapsed = start.elapsed();

    println!();
    println!("=== Simulation Complete ===");
    println!("Stopped: {}", reason);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Months: {}", world.month);
    println!(
        "Speed: {:.1} months/s",
        world.month as f64 / elapsed.as_secs_f64()
    );
    println!(
        "Final counts: {} plants, {} herbivores, {} carnivores",
        world.stats.plants, world.stats.herbivores, world.stats.carnivores
    );

    // Time-series export
    let csv_path = output.join("lvts.csv");
    world.history.export_csv(&csv_path)?;
    println!("Time series dumped on file {:?}", csv_path);

    let history_path = output.join("stats_history.json");
    world.history.save_json(&history_path)?;
    println!("Stats history: {:?}", history_path);

    Ok(())
}

fn run_benchmark(months: u32, grid: usize) -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");
    println!("=== TROPHIC Benchmark ===");
    println!("Months: {}", months);
    println!("Grid: {}x{}", grid, grid);
    println!();

    let result = benchmark(months, grid)?;
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
