use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Each of the two dice rolls uniformly in `1..=die_faces`.
    pub die_faces: u8,
    pub min_players: usize,
    pub max_players: usize,
    /// A suggestion spends whatever steps the suggester had left.
    pub suggestion_ends_movement: bool,
    /// Lift an eliminated player's token off the board, freeing its tile.
    pub remove_eliminated_tokens: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            die_faces: 6,
            min_players: 2,
            max_players: 6,
            suggestion_ends_movement: true,
            remove_eliminated_tokens: true,
        }
    }
}
