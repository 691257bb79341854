//! Territory grid: cell occupancy, neighbor queries and empty-cell search.
//!
//! The territory owns who sits on which cell and nothing else. Lifecycle
//! rules (who may overwrite whom, roster bookkeeping) are the caller's
//! responsibility; `put` is an unconditional overwrite.

use rand::Rng;
use std::fmt;

/// Unique animal identifier
pub type AnimalId = u64;

/// Content of a single territory cell.
///
/// Exactly one occupant per cell at all times. Animals are referenced by
/// id; their mutable state lives in the species rosters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Plant,
    Herbivore(AnimalId),
    Carnivore(AnimalId),
}

impl Occupant {
    /// Kind of this occupant, ignoring animal identity
    #[inline]
    pub fn kind(&self) -> OccupantKind {
        match self {
            Occupant::Empty => OccupantKind::Empty,
            Occupant::Plant => OccupantKind::Plant,
            Occupant::Herbivore(_) => OccupantKind::Herbivore,
            Occupant::Carnivore(_) => OccupantKind::Carnivore,
        }
    }
}

/// Occupant kind without identity, used for neighborhood queries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OccupantKind {
    Empty,
    Plant,
    Herbivore,
    Carnivore,
}

/// Rectangular sub-region of the territory: rows `[x0, x1)`, cols `[y0, y1)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Region {
    pub fn new(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// True if the region covers no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// The simulation grid: `rows` x `cols` cells, fixed size, never resized
#[derive(Clone, Debug)]
pub struct Territory {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Occupant>>,
}

impl Territory {
    /// Create an all-empty territory with the given dimensions
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![Occupant::Empty; cols]; rows],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    #[inline]
    pub fn area(&self) -> usize {
        self.rows * self.cols
    }

    /// Region covering the whole grid
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.rows, self.cols)
    }

    /// Occupant at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Result<Occupant, TerritoryError> {
        if x < self.rows && y < self.cols {
            Ok(self.cells[x][y])
        } else {
            Err(TerritoryError::OutOfBounds { x, y })
        }
    }

    /// Overwrite the occupant at `(x, y)`.
    ///
    /// The previous occupant is discarded without lifecycle side effects;
    /// the caller must have already removed it from any roster.
    pub fn put(&mut self, x: usize, y: usize, occupant: Occupant) -> Result<(), TerritoryError> {
        if x < self.rows && y < self.cols {
            self.cells[x][y] = occupant;
            Ok(())
        } else {
            Err(TerritoryError::OutOfBounds { x, y })
        }
    }

    /// Coordinates of the Moore-neighborhood cells of `(x, y)` holding an
    /// occupant of the given kind, bounds-clipped, in row-major offset order.
    pub fn find_near(&self, x: usize, y: usize, kind: OccupantKind) -> Vec<(usize, usize)> {
        let mut neighbors = Vec::new();
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= self.rows as i64 || ny >= self.cols as i64 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if self.cells[nx][ny].kind() == kind {
                    neighbors.push((nx, ny));
                }
            }
        }
        neighbors
    }

    /// Find an empty cell inside `region` by random sampling.
    ///
    /// Draws up to `rows * cols` coordinates (with replacement) and returns
    /// the first empty one. The search is probabilistic by design: on a
    /// near-full grid it can exhaust its budget and report
    /// `NoSpaceAvailable` even though space exists. Callers skip the
    /// placement attempt in that case rather than retrying.
    pub fn find_empty<R: Rng>(
        &self,
        region: Region,
        rng: &mut R,
    ) -> Result<(usize, usize), TerritoryError> {
        if region.is_empty() {
            return Err(TerritoryError::NoSpaceAvailable);
        }
        for _ in 0..self.area() {
            let x = rng.gen_range(region.x0..region.x1);
            let y = rng.gen_range(region.y0..region.y1);
            if self.cells[x][y] == Occupant::Empty {
                return Ok((x, y));
            }
        }
        Err(TerritoryError::NoSpaceAvailable)
    }

    /// Count cells holding an occupant of the given kind (full scan)
    pub fn count_kind(&self, kind: OccupantKind) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|o| o.kind() == kind)
            .count()
    }
}

/// ASCII map of the grid, matching the CLI's small-grid console dump
impl fmt::Display for Territory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(self.cols))?;
        for row in &self.cells {
            for occupant in row {
                let c = match occupant.kind() {
                    OccupantKind::Empty => ' ',
                    OccupantKind::Plant => 'P',
                    OccupantKind::Herbivore => 'H',
                    OccupantKind::Carnivore => 'C',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", "-".repeat(self.cols))
    }
}

/// Errors reported by territory operations
#[derive(Debug)]
pub enum TerritoryError {
    /// Coordinate outside the grid extents. Never expected to surface from
    /// the engine; when it does, treat it as a fatal invariant violation.
    OutOfBounds { x: usize, y: usize },
    /// The random empty-cell search exhausted its sampling budget.
    /// Recoverable: skip the placement attempt.
    NoSpaceAvailable,
}

impl fmt::Display for TerritoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { x, y } => write!(f, "coordinates ({}, {}) out of bounds", x, y),
            Self::NoSpaceAvailable => write!(f, "no empty cell found within sampling budget"),
        }
    }
}

impl std::error::Error for TerritoryError {}
