//! Animal lifecycle rules, shared by herbivores and carnivores.
//!
//! Both species run the same per-tick decision chain (age, die-check,
//! mate-check, eat-check, random move); they differ only in eating target
//! and move intensity, dispatched on the `Species` tag.

use crate::config::SpeciesConfig;
use crate::territory::{AnimalId, Occupant, OccupantKind, Territory, TerritoryError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Animal species tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Herbivore,
    Carnivore,
}

/// A live animal: mutable per-instance state referenced from the grid by id.
///
/// Every live animal appears exactly once in its species roster and exactly
/// once as the occupant of its `(x, y)` cell; moves, births and deaths keep
/// the two in lock-step.
#[derive(Clone, Debug, PartialEq)]
pub struct Animal {
    pub id: AnimalId,
    pub species: Species,
    pub x: usize,
    pub y: usize,
    pub energy: i32,
    /// Remaining lifespan in months; negative means dead
    pub lifespan: i32,
    pub mate_start: u32,
    pub mate_end: u32,
    pub mate_threshold: i32,
}

impl Animal {
    /// Create a newborn animal from species defaults.
    ///
    /// The caller is responsible for placing `occupant()` on the grid.
    pub fn new<R: Rng>(
        id: AnimalId,
        species: Species,
        x: usize,
        y: usize,
        cfg: &SpeciesConfig,
        rng: &mut R,
    ) -> Self {
        let years = cfg.base_lifespan_years + rng.gen_range(-1..=1);
        Self {
            id,
            species,
            x,
            y,
            energy: cfg.initial_energy,
            lifespan: years * 12,
            mate_start: cfg.mate_start,
            mate_end: cfg.mate_end,
            mate_threshold: cfg.mate_threshold,
        }
    }

    /// Grid occupant referencing this animal
    #[inline]
    pub fn occupant(&self) -> Occupant {
        match self.species {
            Species::Herbivore => Occupant::Herbivore(self.id),
            Species::Carnivore => Occupant::Carnivore(self.id),
        }
    }

    /// One month of metabolism: both energy and remaining lifespan drop by 1
    pub fn age(&mut self) {
        self.energy -= 1;
        self.lifespan -= 1;
    }

    /// Die-check. A dead animal gets the energy sentinel forced to -1 and
    /// its grid cell emptied immediately; removal from the roster is
    /// deferred to the compaction sweep so the roster can keep being
    /// iterated while corpses accumulate.
    pub fn is_dead(&mut self, territory: &mut Territory) -> Result<bool, TerritoryError> {
        if self.energy < 0 || self.lifespan < 0 {
            self.energy = -1;
            territory.put(self.x, self.y, Occupant::Empty)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Mate-check: spawns a cub on a random empty neighbor cell when the
    /// energy threshold is met and the month falls inside the mating window.
    ///
    /// The cub is default-constructed from species defaults, never copied
    /// from the parent, and is placed on the grid right away; the caller
    /// appends it to the spawn list so it only starts acting next month.
    /// The parent pays no energy cost.
    pub fn try_spawn<R: Rng>(
        &self,
        month: u32,
        territory: &mut Territory,
        cfg: &SpeciesConfig,
        child_id: AnimalId,
        rng: &mut R,
    ) -> Result<Option<Animal>, TerritoryError> {
        let m = month % 12;
        if self.energy < self.mate_threshold || m < self.mate_start || m > self.mate_end {
            return Ok(None);
        }
        let open = territory.find_near(self.x, self.y, OccupantKind::Empty);
        if let Some(&(x, y)) = open.choose(rng) {
            let cub = Animal::new(child_id, self.species, x, y, cfg, rng);
            territory.put(x, y, cub.occupant())?;
            Ok(Some(cub))
        } else {
            Ok(None)
        }
    }

    /// Eat-check, dispatched on species.
    ///
    /// Herbivores graze any neighboring plant. Carnivores hunt only when at
    /// least two herbivores are adjacent; the chosen prey's energy is forced
    /// to -1 and it stays in its roster as a corpse until the sweep, while
    /// the carnivore moves onto its cell.
    pub fn can_eat<R: Rng>(
        &mut self,
        territory: &mut Territory,
        prey: &mut [Animal],
        rng: &mut R,
    ) -> Result<bool, TerritoryError> {
        match self.species {
            Species::Herbivore => {
                let plants = territory.find_near(self.x, self.y, OccupantKind::Plant);
                if let Some(&(x, y)) = plants.choose(rng) {
                    self.move_to(territory, x, y)?;
                    self.energy += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Species::Carnivore => {
                let targets = territory.find_near(self.x, self.y, OccupantKind::Herbivore);
                // Predation requires a minimum local prey density, not mere
                // presence of one herbivore.
                if targets.len() < 2 {
                    return Ok(false);
                }
                if let Some(&(x, y)) = targets.choose(rng) {
                    if let Occupant::Herbivore(prey_id) = territory.get(x, y)? {
                        if let Some(victim) = prey.iter_mut().find(|a| a.id == prey_id) {
                            victim.energy = -1;
                        }
                    }
                    self.move_to(territory, x, y)?;
                    self.energy += 1;
                }
                Ok(true)
            }
        }
    }

    /// Random move: prefer a random empty neighbor, else trample a random
    /// neighboring plant without gaining energy. Carnivores repeat the basic
    /// step `move_intensity` times, roaming further per tick.
    pub fn move_random<R: Rng>(
        &mut self,
        territory: &mut Territory,
        cfg: &SpeciesConfig,
        rng: &mut R,
    ) -> Result<(), TerritoryError> {
        for _ in 0..cfg.move_intensity {
            self.step_random(territory, rng)?;
        }
        Ok(())
    }

    fn step_random<R: Rng>(
        &mut self,
        territory: &mut Territory,
        rng: &mut R,
    ) -> Result<(), TerritoryError> {
        let open = territory.find_near(self.x, self.y, OccupantKind::Empty);
        if let Some(&(x, y)) = open.choose(rng) {
            return self.move_to(territory, x, y);
        }
        let plants = territory.find_near(self.x, self.y, OccupantKind::Plant);
        if let Some(&(x, y)) = plants.choose(rng) {
            return self.move_to(territory, x, y);
        }
        Ok(())
    }

    /// Relocate on the grid, vacating the old cell and claiming the new one
    fn move_to(
        &mut self,
        territory: &mut Territory,
        x: usize,
        y: usize,
    ) -> Result<(), TerritoryError> {
        territory.put(self.x, self.y, Occupant::Empty)?;
        self.x = x;
        self.y = y;
        territory.put(x, y, self.occupant())
    }
}
