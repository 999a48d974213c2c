use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{Board, Coordinate, Occupant, RoomRegion};
use crate::cards::{Card, Suspect, Weapon};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Hand(pub Vec<Card>);

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Hand {
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0.contains(&card)
    }
}

/// What a player picks before the game starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSetup {
    pub name: String,
    pub character: Suspect,
}

impl PlayerSetup {
    pub fn new<S: Into<String>>(name: S, character: Suspect) -> Self {
        Self {
            name: name.into(),
            character,
        }
    }
}

/// A player and the character token they move around the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: String,
    pub index: usize,
    pub character: Suspect,
    /// `None` before setup, and after elimination when tokens leave the board.
    pub position: Option<Coordinate>,
    pub steps_remaining: u32,
    pub active: bool,
    pub suggested_this_turn: bool,
    pub hand: Hand,
}

impl Player {
    pub fn new(name: String, index: usize, character: Suspect) -> Self {
        Self {
            name,
            index,
            character,
            position: None,
            steps_remaining: 0,
            active: true,
            suggested_this_turn: false,
            hand: Hand::default(),
        }
    }

    pub fn occupant(&self) -> Occupant {
        Occupant::Character(self.character)
    }

    pub fn room<'a>(&self, board: &'a Board) -> Option<&'a RoomRegion> {
        self.position.and_then(|position| board.room_at(position))
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.character)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeaponToken {
    pub weapon: Weapon,
    pub position: Coordinate,
}

impl WeaponToken {
    pub fn occupant(&self) -> Occupant {
        Occupant::Weapon(self.weapon)
    }
}
