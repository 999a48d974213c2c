use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Coordinate;
use crate::cards::Suspect;

#[derive(Clone, Error, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParseError {
    #[error("The board map is empty")]
    Empty,
    #[error("Row {row} has {found} columns but the board is {expected} wide")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unrecognised symbol '{symbol}' at {position}")]
    UnknownSymbol { symbol: char, position: Coordinate },
    #[error("Start marker '{digit}' at {position} is not bound to any suspect")]
    UnboundStartMarker { digit: char, position: Coordinate },
    #[error("Doorway at {position} does not lead into any room")]
    DetachedDoorway { position: Coordinate },
    #[error("Doorway at {position} opens onto more than one room")]
    AmbiguousDoorway { position: Coordinate },
}

#[derive(Clone, Error, Debug, PartialEq, Serialize, Deserialize)]
pub enum SetupError {
    #[error("The board has no start tile for {character}")]
    NoStartTileForCharacter { character: Suspect },
    #[error("{character} was chosen by more than one player")]
    DuplicateCharacter { character: Suspect },
    #[error("At least {min} players are needed, found {found}")]
    TooFewPlayers { min: usize, found: usize },
    #[error("At most {max} players can join, found {found}")]
    TooManyPlayers { max: usize, found: usize },
    #[error("The board has no named rooms to hold the weapons")]
    NoRooms,
}

/// Reasons a single step is refused. A refused step never changes any state.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRejection {
    #[error("Eliminated players cannot move")]
    PlayerEliminated,
    #[error("No steps remaining this turn")]
    NoStepsRemaining,
    #[error("Cannot move off the edge of the board")]
    OutOfBounds,
    #[error("Cannot move into a wall")]
    Wall,
    #[error("That tile is already occupied")]
    Occupied,
    #[error("Rooms can only be entered or left through a doorway")]
    NotThroughDoorway,
    #[error("Cannot walk directly from one room into another")]
    BetweenRooms,
    #[error("Can only move to a neighbouring tile")]
    NotAdjacent,
    #[error("The game is over")]
    GameOver,
}

#[derive(Clone, Copy, Error, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidSuggestion {
    #[error("You must be in a room to make a suggestion")]
    NotInRoom,
    #[error("You have already made a suggestion this turn")]
    AlreadySuggested,
    #[error("This room cannot be named in a suggestion")]
    UnnamedRoom,
    #[error("Eliminated players cannot make suggestions")]
    PlayerEliminated,
    #[error("The game is over")]
    GameOver,
}

#[derive(Clone, Copy, Error, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidAccusation {
    #[error("Eliminated players cannot make accusations")]
    PlayerEliminated,
    #[error("The game is over")]
    GameOver,
}

#[derive(Clone, Copy, Error, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnError {
    #[error("The dice have already been rolled this turn")]
    AlreadyRolled,
    #[error("The game is over")]
    GameOver,
}

#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum CardError {
    #[error("There is no {category} card called '{name}'")]
    UnknownCard { category: &'static str, name: String },
}
