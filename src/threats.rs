//! Open threat tracking
//!
//! A threat is an empty cell that would complete an alignment of four for one
//! player. Threats are kept up to date incrementally as tiles are placed: only
//! lines through the new tile can gain a threat, and a filled cell stops being
//! a threat for both players.

use crate::{
    moves::move_order,
    position::{offset_cell, static_masks, Position},
};

/// Directions of alignment as (column step, row step): vertical, horizontal
/// and the two diagonals
pub(crate) const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Returns the threats created for the owner of `own` by its tile on `cell`
///
/// Each axis through `cell` is walked up to three cells in both directions,
/// then every window of four cells containing `cell` is checked: three of
/// the owner's tiles and one empty cell make that cell a threat. This covers
/// `XXX_`, `XX_X` and their mirrors; opponent tiles and the board edge end
/// a line.
pub fn threats_created(own: u64, occupied: u64, cell: usize) -> u64 {
    let mut threats = 0;

    for &(column_step, row_step) in AXES.iter() {
        let mut line = [0; 7];
        let mut len = 0;
        let mut center = 0;
        // out of range offsets only ever occur at the ends of the line
        for steps in -3..=3 {
            if let Some(next) = offset_cell(cell, column_step, row_step, steps) {
                if steps == 0 {
                    center = len;
                }
                line[len] = next;
                len += 1;
            }
        }

        for start in center.saturating_sub(3)..=center {
            if start + 4 > len {
                break;
            }
            let mut own_count = 0;
            let mut open = 0;
            for &window_cell in &line[start..start + 4] {
                let bit = 1 << window_cell;
                if own & bit != 0 {
                    own_count += 1;
                } else if occupied & bit == 0 {
                    open = bit;
                } else {
                    // blocked by the opponent
                    own_count = 0;
                    break;
                }
            }
            if own_count == 3 {
                threats |= open;
            }
        }
    }
    threats
}

/// Computes all open threats of the owner of `own` from scratch
pub fn threats_of(own: u64, occupied: u64) -> u64 {
    let mut threats = 0;
    let mut remaining = own;
    while remaining != 0 {
        let cell = remaining.trailing_zeros() as usize;
        remaining &= remaining - 1;
        threats |= threats_created(own, occupied, cell);
    }
    threats
}

/// A move that has to be played this turn
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Forced {
    /// The player to move completes an alignment
    Win(usize),
    /// The opponent would complete an alignment here next turn
    Block(usize),
}

impl Forced {
    pub fn column(self) -> usize {
        match self {
            Forced::Win(column) | Forced::Block(column) => column,
        }
    }
}

/// Looks for a threat that can be filled this turn
///
/// Winning takes priority over blocking. If the opponent has more than one
/// playable threat the first block in move order is returned; the game is
/// lost either way.
pub fn forced_move(position: &Position) -> Option<Forced> {
    let playable = position.playable_cells();

    if let Some(column) = first_column(position.mover_threats() & playable) {
        return Some(Forced::Win(column));
    }
    first_column(position.opponent_threats() & playable).map(Forced::Block)
}

fn first_column(cells: u64) -> Option<usize> {
    move_order()
        .iter()
        .copied()
        .find(|&column| cells & static_masks::column_mask(column) != 0)
}
