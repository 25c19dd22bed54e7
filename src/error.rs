use crate::WIDTH;

/// Errors returned by the engine
///
/// Every variant is recoverable: the engine refuses to produce a new position
/// or a move and leaves it to the caller to try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid move, column {column} out of range. Columns must be between 0 and {}", WIDTH - 1)]
    ColumnOutOfRange { column: usize },

    #[error("Invalid move, column {column} full")]
    ColumnFull { column: usize },

    #[error("the game is already over")]
    GameOver,

    #[error("search depth must be at least 1")]
    InvalidDepth,

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("could not parse '{0}' as a valid move")]
    Parse(char),
}

impl Error {
    /// True for the errors caused by asking for a column that can't be played
    pub fn is_invalid_move(&self) -> bool {
        matches!(self, Error::ColumnOutOfRange { .. } | Error::ColumnFull { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
