use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};

use crate::error::CardError;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Suspect {
    #[strum(to_string = "Miss Scarlett", serialize = "Scarlett", serialize = "Scarlet")]
    MissScarlett,
    #[strum(to_string = "Colonel Mustard", serialize = "Mustard")]
    ColonelMustard,
    #[strum(
        to_string = "The Reverend Green",
        serialize = "Reverend Green",
        serialize = "Green"
    )]
    ReverendGreen,
    #[strum(to_string = "Mrs Peacock", serialize = "Peacock")]
    MrsPeacock,
    #[strum(to_string = "Professor Plum", serialize = "Plum")]
    ProfessorPlum,
    #[strum(to_string = "Mrs White", serialize = "White")]
    MrsWhite,
}

impl Suspect {
    /// The suspect whose start tile is marked with `digit` on a board map.
    pub fn from_start_marker(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)? as usize;
        Self::iter().nth(index)
    }

    pub fn start_marker(self) -> char {
        let index = Self::iter()
            .position(|s| s == self)
            .expect("Every suspect is in the iterator");
        char::from_digit(index as u32, 10).expect("There are fewer than ten suspects")
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Weapon {
    Candlestick,
    Dagger,
    #[strum(to_string = "Lead Pipe", serialize = "LeadPipe", serialize = "Pipe")]
    LeadPipe,
    Revolver,
    Rope,
    Spanner,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum RoomCard {
    Kitchen,
    Ballroom,
    Conservatory,
    #[strum(to_string = "Dining Room", serialize = "DiningRoom", serialize = "Dining")]
    DiningRoom,
    #[strum(
        to_string = "Billiard Room",
        serialize = "BilliardRoom",
        serialize = "Billiard"
    )]
    BilliardRoom,
    Library,
    Lounge,
    Hall,
    Study,
}

impl RoomCard {
    /// The uppercase letter used for this room's tiles in a board map.
    pub fn code(self) -> char {
        match self {
            RoomCard::Kitchen => 'K',
            RoomCard::Ballroom => 'B',
            RoomCard::Conservatory => 'C',
            RoomCard::DiningRoom => 'D',
            RoomCard::BilliardRoom => 'I',
            RoomCard::Library => 'L',
            RoomCard::Lounge => 'O',
            RoomCard::Hall => 'A',
            RoomCard::Study => 'S',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::iter().find(|room| room.code() == code)
    }
}

fn parse_card<T: FromStr>(category: &'static str, name: &str) -> Result<T, CardError> {
    T::from_str(name.trim()).map_err(|_| CardError::UnknownCard {
        category,
        name: name.to_string(),
    })
}

impl Suspect {
    pub fn from_name(name: &str) -> Result<Self, CardError> {
        parse_card("suspect", name)
    }
}

impl Weapon {
    pub fn from_name(name: &str) -> Result<Self, CardError> {
        parse_card("weapon", name)
    }
}

impl RoomCard {
    pub fn from_name(name: &str) -> Result<Self, CardError> {
        parse_card("room", name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Suspect(Suspect),
    Weapon(Weapon),
    Room(RoomCard),
}

impl Card {
    /// Every card in the game, suspects first, then weapons, then rooms.
    pub fn all() -> Vec<Card> {
        Suspect::iter()
            .map(Card::Suspect)
            .chain(Weapon::iter().map(Card::Weapon))
            .chain(RoomCard::iter().map(Card::Room))
            .collect()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Card::Suspect(s) => write!(f, "{s}"),
            Card::Weapon(w) => write!(f, "{w}"),
            Card::Room(r) => write!(f, "{r}"),
        }
    }
}

/// One card from each category. Used both for the hidden solution and for accusations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: RoomCard,
}

impl Solution {
    pub fn new(suspect: Suspect, weapon: Weapon, room: RoomCard) -> Self {
        Self {
            suspect,
            weapon,
            room,
        }
    }

    pub fn from_names(suspect: &str, weapon: &str, room: &str) -> Result<Self, CardError> {
        Ok(Self {
            suspect: Suspect::from_name(suspect)?,
            weapon: Weapon::from_name(weapon)?,
            room: RoomCard::from_name(room)?,
        })
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let suspects: Vec<_> = Suspect::iter().collect();
        let weapons: Vec<_> = Weapon::iter().collect();
        let rooms: Vec<_> = RoomCard::iter().collect();
        Self {
            suspect: *suspects.choose(rng).expect("There are suspects"),
            weapon: *weapons.choose(rng).expect("There are weapons"),
            room: *rooms.choose(rng).expect("There are rooms"),
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        match card {
            Card::Suspect(s) => s == self.suspect,
            Card::Weapon(w) => w == self.weapon,
            Card::Room(r) => r == self.room,
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} committed the crime with the {} in the {}",
            self.suspect, self.weapon, self.room
        )
    }
}

/// Holds the hidden solution for the lifetime of a game.
///
/// The solution can only be compared against, never read, until the game has ended.
#[derive(Clone)]
pub struct SolutionVault {
    solution: Solution,
}

impl SolutionVault {
    pub fn new(solution: Solution) -> Self {
        Self { solution }
    }

    /// Category by category comparison; all three must match.
    pub fn check(&self, accusation: &Solution) -> bool {
        self.solution.suspect == accusation.suspect
            && self.solution.weapon == accusation.weapon
            && self.solution.room == accusation.room
    }

    pub fn check_names(&self, suspect: &str, weapon: &str, room: &str) -> Result<bool, CardError> {
        Ok(self.check(&Solution::from_names(suspect, weapon, room)?))
    }

    pub(crate) fn reveal(&self) -> Solution {
        self.solution
    }

    /// Deals every card outside the solution to exactly one hand, round robin.
    pub fn deal<R: Rng>(&self, hands: usize, rng: &mut R) -> Vec<Vec<Card>> {
        let mut deck: Vec<Card> = Card::all()
            .into_iter()
            .filter(|card| !self.solution.contains(*card))
            .collect();
        deck.shuffle(rng);

        let mut dealt = vec![Vec::new(); hands];
        if hands == 0 {
            return dealt;
        }
        for (i, card) in deck.into_iter().enumerate() {
            dealt[i % hands].push(card);
        }
        dealt
    }
}

impl fmt::Debug for SolutionVault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SolutionVault { .. }")
    }
}
