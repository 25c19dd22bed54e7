use std::fmt;

use crate::{error::*, threats, HEIGHT, WIDTH};

/// The number of cells on the board
pub const CELLS: usize = WIDTH * HEIGHT;

pub(crate) mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn full_board_mask() -> u64 {
        (1 << (WIDTH * HEIGHT)) - 1
    }
    pub const fn column_mask(column: usize) -> u64 {
        let mut mask = 0;
        let mut row = 0;
        while row < HEIGHT {
            mask |= 1 << (row * WIDTH + column);
            row += 1;
        }
        mask
    }
    // the lowest `height` cells of a column
    pub const fn column_base_mask(column: usize, height: usize) -> u64 {
        column_mask(column) & ((1 << (height * WIDTH)) - 1)
    }
}

/// One of the two sides of a game
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

/// Returns the cell `steps` cells away from `cell` along the direction
/// `(column_step, row_step)`, or `None` past the edge of the board
pub(crate) fn offset_cell(cell: usize, column_step: isize, row_step: isize, steps: isize) -> Option<usize> {
    let column = (cell % WIDTH) as isize + column_step * steps;
    let row = (cell / WIDTH) as isize + row_step * steps;
    if column < 0 || column >= WIDTH as isize || row < 0 || row >= HEIGHT as isize {
        None
    } else {
        Some(row as usize * WIDTH + column as usize)
    }
}

/// Whether `mask` holds four tiles in a row along any axis
pub(crate) fn has_alignment(mask: u64) -> bool {
    let mut remaining = mask;
    while remaining != 0 {
        let cell = remaining.trailing_zeros() as usize;
        remaining &= remaining - 1;
        let aligned = threats::AXES.iter().any(|&(column_step, row_step)| {
            (1..4).all(|steps| {
                offset_cell(cell, column_step, row_step, steps)
                    .map_or(false, |next| mask & (1 << next) != 0)
            })
        });
        if aligned {
            return true;
        }
    }
    false
}

/// A Connect 4 position
///
/// Cell `(column, row)`, counting rows from the bottom, is bit `row * WIDTH + column`
/// of the masks, so a vertical step is a shift by `WIDTH`, a horizontal step a
/// shift by 1 and the diagonals shifts by `WIDTH + 1` and `WIDTH - 1`.
///
/// Positions are never modified: playing a move creates a new `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    // mask of the tiles of the player to move
    mover_mask: u64,
    // mask of the tiles of the player who moved last
    other_mask: u64,
    side_to_move: Player,
    last_cell: Option<usize>,
    heights: [u8; WIDTH],
    // open threats of the player to move and of the opponent
    mover_threats: u64,
    opponent_threats: u64,
}

impl Position {
    /// The empty board with the first player to move
    pub fn new() -> Self {
        Self {
            mover_mask: 0,
            other_mask: 0,
            side_to_move: Player::One,
            last_cell: None,
            heights: [0; WIDTH],
            mover_threats: 0,
            opponent_threats: 0,
        }
    }

    /// Plays a sequence of 1-indexed column digits from the empty board, e.g. `"4453"`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut position = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    // abort if the position is won at any point
                    if position.is_terminal_win() {
                        return Err(Error::GameOver);
                    }
                    position = position.drop(column - 1)?;
                }
                _ => return Err(Error::Parse(column_char)),
            }
        }
        Ok(position)
    }

    /// Builds a position from the masks of both players
    ///
    /// The masks must be disjoint, respect gravity and hold as many tiles as
    /// the players can have placed with `side_to_move` to play. `last_cell`,
    /// if given, must be the top tile of its column and belong to the player
    /// who is not to move. A finished game is only accepted when `last_cell`
    /// completed the alignment. Threats are recomputed from scratch.
    pub fn from_masks(
        mover_mask: u64,
        other_mask: u64,
        side_to_move: Player,
        last_cell: Option<usize>,
    ) -> Result<Self> {
        if mover_mask & other_mask != 0 {
            return Err(Error::InvalidPosition("the players' tiles overlap".into()));
        }
        let occupied = mover_mask | other_mask;
        if occupied & !static_masks::full_board_mask() != 0 {
            return Err(Error::InvalidPosition("tiles outside of the board".into()));
        }

        let mut heights = [0; WIDTH];
        for (column, height) in heights.iter_mut().enumerate() {
            let column_tiles = occupied & static_masks::column_mask(column);
            let count = column_tiles.count_ones() as usize;
            // tiles fall, so every column is filled from the bottom up
            if column_tiles != static_masks::column_base_mask(column, count) {
                return Err(Error::InvalidPosition(format!(
                    "floating tile in column {}",
                    column
                )));
            }
            *height = count as u8;
        }

        // player 1 moves first, so it is never behind and at most one tile ahead
        let (mover_count, other_count) = (mover_mask.count_ones(), other_mask.count_ones());
        let balanced = match side_to_move {
            Player::One => mover_count == other_count,
            Player::Two => other_count == mover_count + 1,
        };
        if !balanced {
            return Err(Error::InvalidPosition(format!(
                "{} tiles against {} with {} to move",
                mover_count, other_count, side_to_move
            )));
        }

        if let Some(cell) = last_cell {
            let top_of_column = cell < CELLS && cell / WIDTH + 1 == heights[cell % WIDTH] as usize;
            if !top_of_column || other_mask & (1 << cell) == 0 {
                return Err(Error::InvalidPosition(format!(
                    "cell {} can't be the last move played",
                    cell
                )));
            }
        }

        // the game ends with the first alignment, which can only be the last move
        let last_bit = last_cell.map_or(0, |cell| 1 << cell);
        if has_alignment(mover_mask) || has_alignment(other_mask & !last_bit) {
            return Err(Error::InvalidPosition("the game is already over".into()));
        }

        Ok(Self {
            mover_mask,
            other_mask,
            side_to_move,
            last_cell,
            heights,
            mover_threats: threats::threats_of(mover_mask, occupied),
            opponent_threats: threats::threats_of(other_mask, occupied),
        })
    }

    pub fn cell_index(column: usize, row: usize) -> usize {
        row * WIDTH + column
    }

    pub fn mover_mask(&self) -> u64 {
        self.mover_mask
    }

    pub fn other_mask(&self) -> u64 {
        self.other_mask
    }

    pub fn board_mask(&self) -> u64 {
        self.mover_mask | self.other_mask
    }

    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub fn last_cell(&self) -> Option<usize> {
        self.last_cell
    }

    /// Empty cells that would complete an alignment for the player to move
    pub fn mover_threats(&self) -> u64 {
        self.mover_threats
    }

    /// Empty cells that would complete an alignment for the opponent
    pub fn opponent_threats(&self) -> u64 {
        self.opponent_threats
    }

    pub fn mask_of(&self, player: Player) -> u64 {
        if player == self.side_to_move {
            self.mover_mask
        } else {
            self.other_mask
        }
    }

    /// The owner of the tile at `(column, row)`, if any
    ///
    /// Cells outside of the board are always empty.
    pub fn cell(&self, column: usize, row: usize) -> Option<Player> {
        if column >= WIDTH || row >= HEIGHT {
            return None;
        }
        let bit = 1 << Self::cell_index(column, row);
        if self.mover_mask & bit != 0 {
            Some(self.side_to_move)
        } else if self.other_mask & bit != 0 {
            Some(self.side_to_move.other())
        } else {
            None
        }
    }

    pub fn num_moves(&self) -> usize {
        self.board_mask().count_ones() as usize
    }

    /// The number of tiles in `column`
    ///
    /// # Panics
    /// If `column` is not less than `WIDTH`, see [`is_open`](Self::is_open)
    /// for a checked query.
    pub fn height(&self, column: usize) -> usize {
        self.heights[column] as usize
    }

    pub fn is_open(&self, column: usize) -> bool {
        column < WIDTH && (self.heights[column] as usize) < HEIGHT
    }

    /// The cells that can be filled this turn, one per open column
    pub fn playable_cells(&self) -> u64 {
        (0..WIDTH)
            .filter(|&column| self.is_open(column))
            .fold(0, |cells, column| {
                cells | 1 << Self::cell_index(column, self.heights[column] as usize)
            })
    }

    /// Drops a tile of the player to move into `column`
    pub fn drop(&self, column: usize) -> Result<Self> {
        if column >= WIDTH {
            return Err(Error::ColumnOutOfRange { column });
        }
        if !self.is_open(column) {
            return Err(Error::ColumnFull { column });
        }
        Ok(self.play(column))
    }

    // assumes the column is open
    pub(crate) fn play(&self, column: usize) -> Self {
        let cell = Self::cell_index(column, self.heights[column] as usize);
        let move_bitmap = 1 << cell;
        let placed = self.mover_mask | move_bitmap;
        let mut heights = self.heights;
        heights[column] += 1;

        // a filled cell is no longer open for either player
        let placed_threats = (self.mover_threats & !move_bitmap)
            | threats::threats_created(placed, placed | self.other_mask, cell);
        let remaining_threats = self.opponent_threats & !move_bitmap;

        // switch the current player
        Self {
            mover_mask: self.other_mask,
            other_mask: placed,
            side_to_move: self.side_to_move.other(),
            last_cell: Some(cell),
            heights,
            mover_threats: remaining_threats,
            opponent_threats: placed_threats,
        }
    }

    /// Checks whether the last tile placed completed an alignment of four
    pub fn is_terminal_win(&self) -> bool {
        let cell = match self.last_cell {
            Some(cell) => cell,
            None => return false,
        };
        let owner = self.other_mask;
        let run = |column_step, row_step| {
            (1..4)
                .map_while(|steps| offset_cell(cell, column_step, row_step, steps))
                .take_while(|&next| owner & (1 << next) != 0)
                .count()
        };

        threats::AXES.iter().any(|&(column_step, row_step)| {
            1 + run(column_step, row_step) + run(-column_step, -row_step) >= 4
        })
    }

    /// A full board without a win
    pub fn is_draw(&self) -> bool {
        self.num_moves() == CELLS && !self.is_terminal_win()
    }

    /// The same position with the players' labels exchanged
    pub fn with_colors_swapped(&self) -> Self {
        Self {
            side_to_move: self.side_to_move.other(),
            ..*self
        }
    }

    /// Key for the transposition table
    ///
    /// The mover's tiles and the column heights determine the opponent's
    /// tiles, so the key is unique per position.
    pub fn key(&self) -> u64 {
        self.heights
            .iter()
            .enumerate()
            .fold(self.mover_mask, |key, (column, &height)| {
                key | (height as u64) << (CELLS + 3 * column)
            })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                let glyph = match self.cell(column, row) {
                    Some(Player::One) => 'X',
                    Some(Player::Two) => 'O',
                    None => '.',
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
