use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{Coordinate, Occupant};
use crate::cards::{RoomCard, Solution, Suspect, Weapon};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Solved { winner: usize, solution: Solution },
    Unsolved { solution: Solution },
}

impl GameOutcome {
    pub fn solution(&self) -> &Solution {
        match self {
            GameOutcome::Solved { solution, .. } | GameOutcome::Unsolved { solution } => solution,
        }
    }

    pub fn winner(&self) -> Option<usize> {
        match self {
            GameOutcome::Solved { winner, .. } => Some(*winner),
            GameOutcome::Unsolved { .. } => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameOutcome::Solved { winner, solution } => {
                write!(f, "Player {winner} solved the crime! {solution}")
            }
            GameOutcome::Unsolved { solution } => {
                write!(f, "No one solved the crime... {solution}")
            }
        }
    }
}

/// One observable change to the game, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    Rolled {
        player: usize,
        dice: (u8, u8),
    },
    Moved {
        player: usize,
        from: Coordinate,
        to: Coordinate,
    },
    Relocated {
        occupant: Occupant,
        from: Option<Coordinate>,
        to: Coordinate,
    },
    Suggested {
        player: usize,
        suspect: Suspect,
        weapon: Weapon,
        room: RoomCard,
    },
    Eliminated {
        player: usize,
    },
    TurnPassed {
        from: usize,
        to: usize,
    },
    Finished(GameOutcome),
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Change::Rolled { player, dice } => write!(
                f,
                "Player {player} rolled {} and {} ({} steps)",
                dice.0,
                dice.1,
                u32::from(dice.0) + u32::from(dice.1)
            ),
            Change::Moved { player, from, to } => {
                write!(f, "Player {player} moved from {from} to {to}")
            }
            Change::Relocated {
                occupant,
                from: Some(from),
                to,
            } => write!(f, "{occupant} was moved from {from} to {to}"),
            Change::Relocated {
                occupant,
                from: None,
                to,
            } => write!(f, "{occupant} was placed at {to}"),
            Change::Suggested {
                player,
                suspect,
                weapon,
                room,
            } => write!(
                f,
                "Player {player} suggested {suspect} with the {weapon} in the {room}"
            ),
            Change::Eliminated { player } => write!(f, "Player {player} made a wrong accusation"),
            Change::TurnPassed { from, to } => {
                write!(f, "Player {from} ended their turn, player {to} is up")
            }
            Change::Finished(outcome) => write!(f, "{outcome}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_changes() {
        assert_eq!(
            Change::Rolled {
                player: 1,
                dice: (3, 4)
            }
            .to_string(),
            "Player 1 rolled 3 and 4 (7 steps)"
        );
        assert_eq!(
            Change::Rolled {
                player: 0,
                dice: (200, 150)
            }
            .to_string(),
            "Player 0 rolled 200 and 150 (350 steps)"
        );
        assert_eq!(
            Change::Relocated {
                occupant: Occupant::Weapon(Weapon::Rope),
                from: Some(Coordinate::new(1, 2)),
                to: Coordinate::new(3, 4),
            }
            .to_string(),
            "the Rope was moved from (1, 2) to (3, 4)"
        );
        assert_eq!(
            Change::Suggested {
                player: 0,
                suspect: Suspect::ProfessorPlum,
                weapon: Weapon::Candlestick,
                room: RoomCard::Study,
            }
            .to_string(),
            "Player 0 suggested Professor Plum with the Candlestick in the Study"
        );
    }

    #[test]
    fn outcomes_reveal_the_solution() {
        let solution = Solution::new(Suspect::MissScarlett, Weapon::Rope, RoomCard::Library);
        let won = GameOutcome::Solved {
            winner: 2,
            solution,
        };
        assert_eq!(won.winner(), Some(2));
        assert_eq!(
            won.to_string(),
            "Player 2 solved the crime! Miss Scarlett committed the crime with the Rope in the Library"
        );
        let lost = GameOutcome::Unsolved { solution };
        assert_eq!(lost.winner(), None);
        assert_eq!(lost.solution(), &solution);
    }
}
