//! Configuration system for the food-web simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub territory: TerritoryConfig,
    pub seeding: SeedingConfig,
    pub plants: PlantConfig,
    pub herbivores: SpeciesConfig,
    pub carnivores: SpeciesConfig,
    pub run: RunConfig,
}

/// Territory dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerritoryConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
}

/// Initial population ratios, as fractions of the grid area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    pub plant_ratio: f64,
    pub herbivore_ratio: f64,
    pub carnivore_ratio: f64,
}

/// Plant growth parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Minimum count of plant neighbors an empty cell must exceed before a
    /// plant grows there (0 means any single plant neighbor suffices)
    pub growth_threshold: usize,
}

/// Per-species lifecycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Energy of a newborn animal
    pub initial_energy: i32,
    /// Base lifespan in years; each animal gets base +/- 1 year, in months
    pub base_lifespan_years: i32,
    /// First month-of-year (0-11) of the mating window, inclusive
    pub mate_start: u32,
    /// Last month-of-year (0-11) of the mating window, inclusive
    pub mate_end: u32,
    /// Minimum energy required to spawn a cub
    pub mate_threshold: i32,
    /// Basic move steps performed per tick
    pub move_intensity: u32,
}

/// Run length and reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of simulated months
    pub max_months: u32,
    /// Months between console stat lines
    pub stats_interval: u32,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            territory: TerritoryConfig::default(),
            seeding: SeedingConfig::default(),
            plants: PlantConfig::default(),
            herbivores: SpeciesConfig::herbivore_defaults(),
            carnivores: SpeciesConfig::carnivore_defaults(),
            run: RunConfig::default(),
        }
    }
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self { rows: 100, cols: 100 }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            plant_ratio: 0.5,
            herbivore_ratio: 0.03,
            carnivore_ratio: 0.01,
        }
    }
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self { growth_threshold: 0 }
    }
}

impl SpeciesConfig {
    /// Herbivore defaults: modest energy, spring mating window
    pub fn herbivore_defaults() -> Self {
        Self {
            initial_energy: 8,
            base_lifespan_years: 8,
            mate_start: 1,
            mate_end: 4,
            mate_threshold: 3,
            move_intensity: 1,
        }
    }

    /// Carnivore defaults: longer-lived, late mating window, wider roaming
    pub fn carnivore_defaults() -> Self {
        Self {
            initial_energy: 12,
            base_lifespan_years: 12,
            mate_start: 6,
            mate_end: 11,
            mate_threshold: 6,
            move_intensity: 4,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_months: 512,
            stats_interval: 12,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.territory.rows < 4 || self.territory.rows > 512 {
            return Err("territory rows must be between 4 and 512".to_string());
        }
        if self.territory.cols < 4 || self.territory.cols > 512 {
            return Err("territory cols must be between 4 and 512".to_string());
        }
        let ratios = [
            self.seeding.plant_ratio,
            self.seeding.herbivore_ratio,
            self.seeding.carnivore_ratio,
        ];
        if ratios.iter().any(|r| !(0.0..=1.0).contains(r)) {
            return Err("seeding ratios must be between 0.0 and 1.0".to_string());
        }
        if ratios.iter().sum::<f64>() > 1.0 {
            return Err("seeding ratios must not sum above 1.0".to_string());
        }
        for (name, species) in [("herbivores", &self.herbivores), ("carnivores", &self.carnivores)] {
            if species.mate_start > 11 || species.mate_end > 11 {
                return Err(format!("{}: mate window months must be in 0-11", name));
            }
            if species.mate_start > species.mate_end {
                return Err(format!("{}: mate_start must not exceed mate_end", name));
            }
            if species.base_lifespan_years < 2 {
                return Err(format!("{}: base_lifespan_years must be at least 2", name));
            }
            if species.move_intensity == 0 {
                return Err(format!("{}: move_intensity must be at least 1", name));
            }
        }
        if self.run.max_months == 0 {
            return Err("max_months must be > 0".to_string());
        }
        if self.run.stats_interval == 0 {
            return Err("stats_interval must be > 0".to_string());
        }
        Ok(())
    }
}
