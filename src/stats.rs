//! Population statistics and time-series export.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Population snapshot for one simulation month.
///
/// The three counts are always consistent with the live rosters and the
/// grid plant occupancy at the moment the snapshot is taken.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Current month
    pub month: u32,
    /// Plant-occupied cells (grid scan)
    pub plants: usize,
    /// Live herbivores (roster size)
    pub herbivores: usize,
    /// Live carnivores (roster size)
    pub carnivores: usize,
    /// Cubs born this month
    pub births: usize,
    /// Animals swept this month (starved, aged out or eaten)
    pub deaths: usize,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "M:{:5} | Plants:{:6} | Herb:{:5} | Carn:{:5} | B:{:3} D:{:3}",
            self.month, self.plants, self.herbivores, self.carnivores, self.births, self.deaths
        )
    }
}

/// Per-month history of population snapshots
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    pub snapshots: Vec<Stats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Plant count over time
    pub fn plant_series(&self) -> Vec<(u32, usize)> {
        self.snapshots.iter().map(|s| (s.month, s.plants)).collect()
    }

    /// Herbivore count over time
    pub fn herbivore_series(&self) -> Vec<(u32, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.month, s.herbivores))
            .collect()
    }

    /// Carnivore count over time
    pub fn carnivore_series(&self) -> Vec<(u32, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.month, s.carnivores))
            .collect()
    }

    /// Save history to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Export the population time series as semicolon-separated CSV
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "Time; Plants; Herbivores; Carnivores")?;
        for s in &self.snapshots {
            writeln!(
                file,
                "{}; {}; {}; {}",
                s.month, s.plants, s.herbivores, s.carnivores
            )?;
        }
        Ok(())
    }
}
