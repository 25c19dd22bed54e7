use crate::error::*;

/// Default search depth in plies
pub const DEFAULT_DEPTH: usize = 8;

/// Default number of transposition table entries
pub const DEFAULT_TABLE_SIZE: usize = 1 << 19;

/// Static evaluation used at the search horizon
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Open threats of the player to move minus open threats of the opponent
    #[default]
    ThreatCount,
    /// Every unresolved position is worth 0
    Neutral,
}

/// Settings for a [`Solver`](crate::solver::Solver)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    depth: usize,
    parallel: bool,
    table_size: usize,
    heuristic: Heuristic,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            parallel: false,
            table_size: DEFAULT_TABLE_SIZE,
            heuristic: Heuristic::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a config searching `depth` plies ahead
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Search the root moves on the rayon thread pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of transposition table entries, 0 disables the table
    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn table_size(&self) -> usize {
        self.table_size
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::InvalidDepth);
        }
        Ok(())
    }
}
