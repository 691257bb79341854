//! # TROPHIC
//!
//! Agent-based three-tier food-web simulator: plants, herbivores and
//! carnivores on a bounded grid, advancing in monthly ticks.
//!
//! ## Features
//!
//! - **Local rules**: foraging, predation, mating windows, aging, death
//!   and plant spreading, all decided per cell neighborhood
//! - **Emergent dynamics**: population counts trace Lotka-Volterra-like
//!   cycles without any global coupling
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: seeded random number generation, single-threaded
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trophic::{Config, World};
//!
//! let mut config = Config::default();
//! config.territory.rows = 40;
//! config.territory.cols = 40;
//!
//! let mut world = World::new_with_seed(config, 42).unwrap();
//! let reason = world.run(512).unwrap();
//!
//! println!("stopped: {}", reason);
//! println!("plants: {}", world.stats.plants);
//! ```
//!
//! ## Exporting the time series
//!
//! ```rust,no_run
//! # use trophic::{Config, World};
//! let mut world = World::new_with_seed(Config::default(), 42).unwrap();
//! world.run(512).unwrap();
//! world.history.export_csv("lvts.csv").unwrap();
//! ```

pub mod animal;
pub mod config;
pub mod stats;
pub mod territory;
pub mod world;

// Re-export main types
pub use animal::{Animal, Species};
pub use config::Config;
pub use stats::{Stats, StatsHistory};
pub use territory::{Occupant, OccupantKind, Territory, TerritoryError};
pub use world::{StopReason, World};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(months: u32, grid_size: usize) -> Result<BenchmarkResult, TerritoryError> {
    use std::time::Instant;

    let mut config = Config::default();
    config.territory.rows = grid_size;
    config.territory.cols = grid_size;

    let mut world = World::new(config)?;

    let start = Instant::now();
    let stop_reason = world.run(months)?;
    let elapsed = start.elapsed();

    Ok(BenchmarkResult {
        months: world.month,
        stop_reason,
        plants: world.stats.plants,
        herbivores: world.stats.herbivores,
        carnivores: world.stats.carnivores,
        elapsed_secs: elapsed.as_secs_f64(),
        months_per_second: world.month as f64 / elapsed.as_secs_f64(),
    })
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub months: u32,
    pub stop_reason: StopReason,
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
    pub elapsed_secs: f64,
    pub months_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Months: {} ({})", self.months, self.stop_reason)?;
        writeln!(
            f,
            "Final counts: {} plants, {} herbivores, {} carnivores",
            self.plants, self.herbivores, self.carnivores
        )?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} months/s", self.months_per_second)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut config = Config::default();
        config.territory.rows = 30;
        config.territory.cols = 30;

        let mut world = World::new_with_seed(config, 1).unwrap();
        world.run(24).unwrap();

        assert!(world.month <= 24);
        assert_eq!(world.history.len() as u32, world.month + 1);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(12, 30).unwrap();

        assert!(result.months <= 12);
        assert!(result.months_per_second > 0.0);
    }
}
