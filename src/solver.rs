//! A depth limited game tree search for Connect 4

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    config::SearchConfig,
    error::*,
    evaluation::evaluate,
    moves::Moves,
    position::{Position, CELLS},
    threats::forced_move,
    transposition_table::*,
};

/// Base score of a forced win
///
/// A win completed `n` plies into the search scores `WIN_SCORE - n`, so faster
/// wins and slower losses are preferred.
pub const WIN_SCORE: i32 = 100;

/// A bound beyond any possible score
pub const INFINITY: i32 = WIN_SCORE + 1;

/// Scores at least this far from 0 are forced results rather than evaluations
const MIN_WIN_SCORE: i32 = WIN_SCORE - CELLS as i32;

/// Whether a score comes from a forced win or loss
pub fn is_win_score(score: i32) -> bool {
    score.abs() >= MIN_WIN_SCORE
}

/// The result of a top-level search
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    /// The 0-indexed column to play
    pub column: usize,
    /// The score of the move for the player to move
    pub value: i32,
    /// The number of positions searched
    pub nodes: usize,
}

impl Choice {
    pub fn is_forced_win(&self) -> bool {
        self.value >= MIN_WIN_SCORE
    }

    pub fn is_forced_loss(&self) -> bool {
        self.value <= -MIN_WIN_SCORE
    }

    /// The number of plies until the game is decided, if the result is forced
    pub fn win_distance(&self) -> Option<usize> {
        if is_win_score(self.value) {
            Some((WIN_SCORE - self.value.abs()) as usize)
        } else {
            None
        }
    }
}

/// An agent to pick moves in Connect 4 positions
///
/// # Notes
/// The search is a negamax with alpha-beta pruning to a fixed depth. Forced
/// wins and blocks found by the threat tracker replace the full list of moves,
/// positions reached through different move orders are looked up in a
/// transposition table, and positions at the depth limit are scored by the
/// configured [`Heuristic`](crate::config::Heuristic).
///
/// # Position Scoring
/// Scores are given for the player to move. A win completed `n` plies after
/// the searched position scores `WIN_SCORE - n`, a loss the negation, and
/// a draw 0. Evaluations at the depth limit are always closer to 0 than any
/// forced result.
pub struct Solver {
    config: SearchConfig,

    /// The number of nodes searched by this `Solver` in its last search (for diagnostics only)
    pub node_count: usize,
    transposition_table: TranspositionTable,
}

impl Solver {
    /// Creates a new `Solver`, the transposition table is allocated per search
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            node_count: 0,
            transposition_table: TranspositionTable::with_capacity(0),
        }
    }

    /// The table of the last sequential search, parallel searches keep
    /// their tables per subtree
    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.transposition_table
    }

    /// Finds the best column to play and its score
    ///
    /// Among equally scored columns the first in move order is chosen.
    /// Fails with [`Error::GameOver`] if the position is already won or drawn.
    pub fn choose_move(&mut self, position: &Position) -> Result<Choice> {
        self.config.validate()?;
        if position.is_terminal_win() || position.is_draw() {
            return Err(Error::GameOver);
        }

        self.node_count = 0;
        // the table only lives for one top-level search
        let table_size = if self.config.parallel() {
            0
        } else {
            self.config.table_size()
        };
        self.transposition_table = TranspositionTable::with_capacity(table_size);

        let (choice, table_entries) = if self.config.parallel() {
            self.parallel_search(position)?
        } else {
            let choice = self.top_level_search(position)?;
            (choice, self.transposition_table.len())
        };

        debug!(
            "depth {}: column {} scores {} after {} nodes, {} table entries",
            self.config.depth(),
            choice.column,
            choice.value,
            choice.nodes,
            table_entries
        );
        Ok(choice)
    }

    /// Performs game tree search
    ///
    /// Returns the score of the position (see [Position Scoring]) if it lies
    /// strictly between `alpha` and `beta`, otherwise a bound on the score
    /// on the side of the window it fell.
    ///
    /// [Position Scoring]: #position-scoring
    fn negamax(&mut self, position: &Position, ply: usize, mut alpha: i32, mut beta: i32) -> i32 {
        self.node_count += 1;

        // the player who just moved has won
        if position.is_terminal_win() {
            return -(WIN_SCORE - ply as i32);
        }
        if position.is_draw() {
            return 0;
        }
        if ply >= self.config.depth() {
            return evaluate(position, self.config.heuristic());
        }

        let key = position.key();
        if let Some(entry) = self.transposition_table.get(key) {
            match entry.bound {
                Bound::Exact => return entry.value,
                Bound::Lower => alpha = alpha.max(entry.value),
                Bound::Upper => beta = beta.min(entry.value),
            }
            if alpha >= beta {
                // prune the exploration
                return entry.value;
            }
        }
        let alpha_original = alpha;

        let mut best = -INFINITY;
        for column in Self::candidate_moves(position) {
            let next = position.play(column);
            // the search window is flipped for the other player
            let score = -self.negamax(&next, ply + 1, -beta, -alpha);
            best = best.max(score);
            alpha = alpha.max(best);
            // a perfect opponent will not pick this branch
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_original {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.transposition_table.set(key, best, bound);
        best
    }

    /// The forced move if there is one, otherwise every open column
    fn candidate_moves(position: &Position) -> Moves {
        match forced_move(position) {
            Some(forced) => {
                trace!("forced move {:?} after {} moves", forced, position.num_moves());
                Moves::single(forced.column())
            }
            None => Moves::new(position),
        }
    }

    /// Performs a top-level search, bypassing the transposition table
    fn top_level_search(&mut self, position: &Position) -> Result<Choice> {
        self.node_count += 1;

        let mut alpha = -INFINITY;
        let mut best: Option<(usize, i32)> = None;
        for column in Self::candidate_moves(position) {
            let next = position.drop(column)?;
            let score = -self.negamax(&next, 1, -INFINITY, -alpha);
            // a later column has to be strictly better to replace an earlier one
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((column, score));
            }
            alpha = alpha.max(score);
        }

        let (column, value) = best.ok_or(Error::GameOver)?;
        Ok(Choice {
            column,
            value,
            nodes: self.node_count,
        })
    }

    /// Searches every root move on its own thread with its own table
    ///
    /// Each subtree is searched with a full window, so the result is the same
    /// as the sequential search. Returns the choice and the number of entries
    /// stored across all subtree tables.
    fn parallel_search(&mut self, position: &Position) -> Result<(Choice, usize)> {
        let config = self.config;
        let columns: Vec<usize> = Self::candidate_moves(position).collect();

        let results = columns
            .par_iter()
            .map(|&column| {
                let next = position.drop(column)?;
                let mut solver = Solver::new(config);
                solver.transposition_table = TranspositionTable::with_capacity(config.table_size());
                let score = -solver.negamax(&next, 1, -INFINITY, INFINITY);
                Ok((column, score, solver.node_count, solver.transposition_table.len()))
            })
            .collect::<Result<Vec<_>>>()?;

        self.node_count += 1 + results.iter().map(|&(_, _, nodes, _)| nodes).sum::<usize>();
        let table_entries = results.iter().map(|&(_, _, _, entries)| entries).sum();

        // results come back in move order
        let mut best: Option<(usize, i32)> = None;
        for &(column, score, _, _) in results.iter() {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((column, score));
            }
        }

        let (column, value) = best.ok_or(Error::GameOver)?;
        let choice = Choice {
            column,
            value,
            nodes: self.node_count,
        };
        Ok((choice, table_entries))
    }
}
