pub mod board;
pub mod cards;
pub mod error;
pub mod game;
pub mod movement;
pub mod player;
pub mod reporting;
pub mod resolver;
pub mod rules;
pub mod turn;

pub use board::{Board, Coordinate, Direction, Tile};
pub use cards::{Card, RoomCard, Solution, Suspect, Weapon};
pub use game::GameState;
pub use movement::MoveResult;
pub use player::{Hand, Player, PlayerSetup};
pub use reporting::{Change, GameOutcome};
pub use resolver::{AccusationResult, SuggestionResult};
pub use rules::GameRules;
pub use turn::TurnPhase;
