use crate::{position::Position, WIDTH};

/// Returns the columns ordered from the middle outwards, left before right, as
/// the middle columns take part in more alignments and are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (1 - i % 2) * (i / 2) - (i % 2) * (i / 2 + 1);
        i += 1;
    }
    move_order
}

const MOVE_ORDER: [usize; WIDTH] = move_order();

/// The playable columns of a position in `move_order`
#[derive(Clone, Debug)]
pub struct Moves {
    // bit i is set if column i may be played
    columns: u16,
    index: usize,
}

impl Moves {
    pub fn new(position: &Position) -> Self {
        let columns = (0..WIDTH)
            .filter(|&column| position.is_open(column))
            .fold(0, |columns, column| columns | 1 << column);
        Self { columns, index: 0 }
    }

    /// Only the given column, for positions with a forced move
    pub fn single(column: usize) -> Self {
        Self {
            columns: 1 << column,
            index: 0,
        }
    }
}

impl Iterator for Moves {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < WIDTH {
            let column = MOVE_ORDER[self.index];
            self.index += 1;
            if self.columns & (1 << column) != 0 {
                return Some(column);
            }
        }
        None
    }
}
