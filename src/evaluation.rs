use crate::{config::Heuristic, position::Position};

/// Scores a non-terminal position at the search horizon for the player to move
///
/// The magnitude never exceeds the number of cells, so it always stays below
/// the score of a forced win.
pub fn evaluate(position: &Position, heuristic: Heuristic) -> i32 {
    match heuristic {
        Heuristic::ThreatCount => {
            position.mover_threats().count_ones() as i32
                - position.opponent_threats().count_ones() as i32
        }
        Heuristic::Neutral => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn threat_count() -> Result<()> {
        assert_eq!(evaluate(&Position::new(), Heuristic::ThreatCount), 0);

        // player 2 to move, each player threatens both ends of a row of three
        let position = Position::from_moves("2233447")?;
        assert_eq!(evaluate(&position, Heuristic::ThreatCount), 0);
        // player 2 blocks one end of player 1's row
        let position = Position::from_moves("22334475")?;
        assert_eq!(evaluate(&position, Heuristic::ThreatCount), 1 - 2);
        Ok(())
    }

    #[test]
    fn neutral() -> Result<()> {
        let position = Position::from_moves("2233447")?;
        assert_eq!(evaluate(&position, Heuristic::Neutral), 0);
        Ok(())
    }
}
