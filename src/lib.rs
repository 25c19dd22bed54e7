//! A game tree search engine for the board game 'Connect 4'
//!
//! Positions are stored as bitboards together with the open threats of both
//! players. Moves are chosen by a depth limited negamax search with
//! alpha-beta pruning, a transposition table and an early exit for forced
//! wins and blocks.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::{choose_move, Position};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // the first player has three tiles along the bottom row
//! let position = Position::from_moves("112233")?;
//! let choice = choose_move(&position, 6)?;
//!
//! assert_eq!(choice.column, 3);
//! assert!(choice.is_forced_win());
//!# Ok(())
//!# }
//! ```

use static_assertions::*;

pub mod config;

pub mod error;

pub mod evaluation;

pub mod moves;

pub mod position;

pub mod solver;

pub mod threats;

pub mod transposition_table;


pub use config::{Heuristic, SearchConfig};
pub use error::{Error, Result};
pub use position::{Player, Position};
pub use solver::{Choice, Solver};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// the tiles of one player and 3 bits of height per column form the table key
const_assert!(WIDTH * HEIGHT + 3 * WIDTH <= 64);
const_assert!(HEIGHT < 8);
// the move generator keeps one bit per column
const_assert!(WIDTH <= 16);

/// Searches `depth` plies ahead and returns the best column with its score
pub fn choose_move(position: &Position, depth: usize) -> Result<Choice> {
    Solver::new(SearchConfig::new(depth)).choose_move(position)
}

/// Plays the 0-indexed `column` for the player to move
pub fn apply_move(position: &Position, column: usize) -> Result<Position> {
    position.drop(column)
}

/// Whether the last move won the game
pub fn is_win(position: &Position) -> bool {
    position.is_terminal_win()
}

/// Whether the board is full without a winner
pub fn is_draw(position: &Position) -> bool {
    position.is_draw()
}
