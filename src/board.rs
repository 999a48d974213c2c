use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use strum_macros::{EnumIter, EnumString};

use crate::cards::{RoomCard, Suspect, Weapon};
use crate::error::{MoveRejection, ParseError, SetupError};
use crate::player::Player;

const STANDARD_MAP: &str = include_str!("../maps/standard.txt");

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    #[strum(serialize = "north", serialize = "n", serialize = "up")]
    North,
    #[strum(serialize = "east", serialize = "e", serialize = "right")]
    East,
    #[strum(serialize = "south", serialize = "s", serialize = "down")]
    South,
    #[strum(serialize = "west", serialize = "w", serialize = "left")]
    West,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// One step in `direction`, or `None` when that would leave the top or left edge.
    pub fn step(self, direction: Direction) -> Option<Coordinate> {
        // We use the computer graphics convention of (0,0) in the top left
        Some(match direction {
            Direction::North => Coordinate::new(self.x, self.y.checked_sub(1)?),
            Direction::South => Coordinate::new(self.x, self.y + 1),
            Direction::East => Coordinate::new(self.x + 1, self.y),
            Direction::West => Coordinate::new(self.x.checked_sub(1)?, self.y),
        })
    }

    /// The cardinal direction that leads from `self` to `other`, if they are neighbours.
    pub fn direction_to(self, other: Coordinate) -> Option<Direction> {
        use strum::IntoEnumIterator;

        Direction::iter().find(|&direction| self.step(direction) == Some(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The map letter identifying a room region.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Deserialize, Serialize)]
pub struct RoomCode(pub char);

impl RoomCode {
    pub fn card(self) -> Option<RoomCard> {
        RoomCard::from_code(self.0)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.card() {
            Some(card) => write!(f, "{card}"),
            None => write!(f, "room {}", self.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Character(Suspect),
    Weapon(Weapon),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Occupant::Character(s) => write!(f, "{s}"),
            Occupant::Weapon(w) => write!(f, "the {w}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Hallway {
        start: Option<Suspect>,
        occupant: Option<Occupant>,
    },
    Doorway {
        room: RoomCode,
        occupant: Option<Occupant>,
    },
    Room(RoomCode),
    /// A room tile directly inside one of the room's doorways.
    RoomEntry(RoomCode),
}

impl Tile {
    /// Walls never are, hallways and doorways are while empty. Room tiles always are,
    /// since rooms track their occupants as a whole rather than tile by tile.
    pub fn is_traversable(&self) -> bool {
        match self {
            Tile::Wall => false,
            Tile::Hallway { occupant, .. } | Tile::Doorway { occupant, .. } => occupant.is_none(),
            Tile::Room(_) | Tile::RoomEntry(_) => true,
        }
    }

    pub fn occupant(&self) -> Option<Occupant> {
        match self {
            Tile::Hallway { occupant, .. } | Tile::Doorway { occupant, .. } => *occupant,
            _ => None,
        }
    }

    /// The room this tile is part of. Doorways lead into a room but are not part of it.
    pub fn room(&self) -> Option<RoomCode> {
        match self {
            Tile::Room(code) | Tile::RoomEntry(code) => Some(*code),
            _ => None,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tile::Wall => write!(f, "X"),
            Tile::Hallway {
                occupant: Some(occupant),
                ..
            }
            | Tile::Doorway {
                occupant: Some(occupant),
                ..
            } => match occupant {
                Occupant::Character(suspect) => write!(f, "{}", suspect.start_marker()),
                Occupant::Weapon(_) => write!(f, "!"),
            },
            Tile::Hallway {
                start: Some(suspect),
                ..
            } => write!(f, "{}", suspect.start_marker()),
            Tile::Hallway { .. } => write!(f, "H"),
            Tile::Doorway { .. } => write!(f, "d"),
            Tile::Room(code) | Tile::RoomEntry(code) => write!(f, "{}", code.0),
        }
    }
}

/// A named region of room tiles, with everything currently inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRegion {
    pub code: RoomCode,
    pub card: Option<RoomCard>,
    pub tiles: Vec<Coordinate>,
    pub characters: BTreeSet<Suspect>,
    pub weapons: BTreeSet<Weapon>,
}

impl RoomRegion {
    fn new(code: RoomCode) -> Self {
        Self {
            code,
            card: code.card(),
            tiles: vec![],
            characters: BTreeSet::new(),
            weapons: BTreeSet::new(),
        }
    }

    pub fn contains(&self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Character(s) => self.characters.contains(&s),
            Occupant::Weapon(w) => self.weapons.contains(&w),
        }
    }

    /// Characters first, then weapons.
    pub fn occupants(&self) -> impl Iterator<Item = Occupant> + '_ {
        self.characters
            .iter()
            .map(|s| Occupant::Character(*s))
            .chain(self.weapons.iter().map(|w| Occupant::Weapon(*w)))
    }
}

impl fmt::Display for RoomRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.code,
            self.occupants()
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Vec<Tile>>,
    rooms: BTreeMap<RoomCode, RoomRegion>,
}

impl Board {
    /// Builds a board from a map with one row per line and one symbol per column.
    ///
    /// `X` is a wall, `H` a hallway, `d` a doorway, a digit a suspect's start tile,
    /// and any other uppercase letter a tile of the room with that code.
    pub fn parse<S: AsRef<str>>(map: S) -> Result<Board, ParseError> {
        let lines: Vec<&str> = map
            .as_ref()
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        // Blank lines may pad the map, but not split it
        let is_blank = |line: &&str| line.chars().all(|c| c.is_whitespace());
        let first = lines.iter().position(|line| !is_blank(line));
        let last = lines.iter().rposition(|line| !is_blank(line));
        let rows: Vec<Vec<char>> = match (first, last) {
            (Some(first), Some(last)) => lines[first..=last]
                .iter()
                .map(|line| line.chars().collect())
                .collect(),
            _ => vec![],
        };

        let Some(width) = rows.first().map(|row| row.len()) else {
            return Err(ParseError::Empty);
        };

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ParseError::MalformedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, symbol) in row.iter().enumerate() {
                let position = Coordinate::new(x, y);
                match symbol {
                    'd' => {}
                    '0'..='9' => {
                        if Suspect::from_start_marker(*symbol).is_none() {
                            return Err(ParseError::UnboundStartMarker {
                                digit: *symbol,
                                position,
                            });
                        }
                    }
                    'A'..='Z' => {}
                    _ => {
                        return Err(ParseError::UnknownSymbol {
                            symbol: *symbol,
                            position,
                        })
                    }
                }
            }
        }

        let symbol_at = |position: Coordinate| rows.get(position.y)?.get(position.x).copied();
        let room_code = |symbol: char| {
            (symbol.is_ascii_uppercase() && symbol != 'X' && symbol != 'H')
                .then_some(RoomCode(symbol))
        };
        let neighbours = |position: Coordinate| {
            use strum::IntoEnumIterator;
            Direction::iter().filter_map(move |d| position.step(d))
        };

        // Every doorway must open onto exactly one room
        let mut doorways = BTreeMap::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.iter().enumerate() {
                if *symbol != 'd' {
                    continue;
                }
                let position = Coordinate::new(x, y);
                let adjacent_rooms: BTreeSet<RoomCode> = neighbours(position)
                    .filter_map(|n| symbol_at(n).and_then(room_code))
                    .collect();
                let mut adjacent_rooms = adjacent_rooms.into_iter();
                match (adjacent_rooms.next(), adjacent_rooms.next()) {
                    (None, _) => return Err(ParseError::DetachedDoorway { position }),
                    (Some(_), Some(_)) => return Err(ParseError::AmbiguousDoorway { position }),
                    (Some(room), None) => {
                        doorways.insert(position, room);
                    }
                }
            }
        }

        let mut rooms: BTreeMap<RoomCode, RoomRegion> = BTreeMap::new();
        let mut squares = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let mut tiles = Vec::with_capacity(width);
            for (x, symbol) in row.iter().enumerate() {
                let position = Coordinate::new(x, y);
                let tile = match *symbol {
                    'X' => Tile::Wall,
                    'H' => Tile::Hallway {
                        start: None,
                        occupant: None,
                    },
                    'd' => Tile::Doorway {
                        room: doorways[&position],
                        occupant: None,
                    },
                    digit if digit.is_ascii_digit() => Tile::Hallway {
                        start: Suspect::from_start_marker(digit),
                        occupant: None,
                    },
                    letter => {
                        let code = RoomCode(letter);
                        rooms
                            .entry(code)
                            .or_insert_with(|| RoomRegion::new(code))
                            .tiles
                            .push(position);
                        let is_entry = neighbours(position)
                            .any(|n| doorways.get(&n).is_some_and(|door| *door == code));
                        if is_entry {
                            Tile::RoomEntry(code)
                        } else {
                            Tile::Room(code)
                        }
                    }
                };
                tiles.push(tile);
            }
            squares.push(tiles);
        }

        Ok(Board { squares, rooms })
    }

    /// The bundled 22×22 board.
    pub fn standard() -> Board {
        Board::parse(STANDARD_MAP).expect("The bundled map should always parse")
    }

    pub fn width(&self) -> usize {
        self.squares.first().map_or(0, |row| row.len())
    }

    pub fn height(&self) -> usize {
        self.squares.len()
    }

    pub fn tile_at(&self, position: Coordinate) -> Option<&Tile> {
        self.squares
            .get(position.y)
            .and_then(|row| row.get(position.x))
    }

    fn tile_at_mut(&mut self, position: Coordinate) -> Option<&mut Tile> {
        self.squares
            .get_mut(position.y)
            .and_then(|row| row.get_mut(position.x))
    }

    pub fn is_traversable(&self, position: Coordinate) -> bool {
        self.tile_at(position).is_some_and(Tile::is_traversable)
    }

    pub fn neighbour_in_direction(
        &self,
        position: Coordinate,
        direction: Direction,
    ) -> Option<Coordinate> {
        position
            .step(direction)
            .filter(|n| n.x < self.width() && n.y < self.height())
    }

    pub fn neighbouring_tiles(&self, position: Coordinate) -> Vec<(Coordinate, &Tile)> {
        use strum::IntoEnumIterator;

        Direction::iter()
            .filter_map(|d| self.neighbour_in_direction(position, d))
            .filter_map(|n| self.tile_at(n).map(|tile| (n, tile)))
            .collect()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height()).flat_map(move |y| (0..self.width()).map(move |x| Coordinate::new(x, y)))
    }

    pub fn start_tile(&self, character: Suspect) -> Option<Coordinate> {
        self.coordinates().find(|&c| {
            matches!(
                self.tile_at(c),
                Some(Tile::Hallway { start: Some(s), .. }) if *s == character
            )
        })
    }

    /// Puts each player's token on the start tile of the character they chose.
    pub fn place_starting_tokens(&mut self, players: &mut [Player]) -> Result<(), SetupError> {
        for player in players.iter_mut() {
            let start = self
                .start_tile(player.character)
                .ok_or(SetupError::NoStartTileForCharacter {
                    character: player.character,
                })?;
            self.occupy(start, player.occupant())
                .map_err(|_| SetupError::DuplicateCharacter {
                    character: player.character,
                })?;
            player.position = Some(start);
        }
        Ok(())
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomRegion> {
        self.rooms.values()
    }

    pub fn room(&self, code: RoomCode) -> Option<&RoomRegion> {
        self.rooms.get(&code)
    }

    pub fn room_at(&self, position: Coordinate) -> Option<&RoomRegion> {
        self.tile_at(position)
            .and_then(Tile::room)
            .and_then(|code| self.rooms.get(&code))
    }

    pub fn room_for_card(&self, card: RoomCard) -> Option<&RoomRegion> {
        self.rooms.get(&RoomCode(card.code()))
    }

    pub fn occupant_count(&self, position: Coordinate) -> usize {
        self.tile_at(position)
            .and_then(Tile::occupant)
            .map_or(0, |_| 1)
    }

    /// Records `occupant` as standing on `position`.
    pub fn occupy(&mut self, position: Coordinate, occupant: Occupant) -> Result<(), MoveRejection> {
        let tile = self
            .tile_at_mut(position)
            .ok_or(MoveRejection::OutOfBounds)?;
        match tile {
            Tile::Wall => Err(MoveRejection::Wall),
            Tile::Hallway {
                occupant: current, ..
            }
            | Tile::Doorway {
                occupant: current, ..
            } => {
                if current.is_some() {
                    return Err(MoveRejection::Occupied);
                }
                *current = Some(occupant);
                Ok(())
            }
            Tile::Room(code) | Tile::RoomEntry(code) => {
                let code = *code;
                let region = self
                    .rooms
                    .get_mut(&code)
                    .expect("Every room tile belongs to a parsed room");
                match occupant {
                    Occupant::Character(s) => region.characters.insert(s),
                    Occupant::Weapon(w) => region.weapons.insert(w),
                };
                Ok(())
            }
        }
    }

    /// Clears `occupant` from `position`. Does nothing if it was not there.
    pub fn vacate(&mut self, position: Coordinate, occupant: Occupant) {
        let Some(tile) = self.tile_at_mut(position) else {
            return;
        };
        match tile {
            Tile::Hallway {
                occupant: current, ..
            }
            | Tile::Doorway {
                occupant: current, ..
            } => {
                if *current == Some(occupant) {
                    *current = None;
                }
            }
            Tile::Room(code) | Tile::RoomEntry(code) => {
                let code = *code;
                if let Some(region) = self.rooms.get_mut(&code) {
                    match occupant {
                        Occupant::Character(s) => region.characters.remove(&s),
                        Occupant::Weapon(w) => region.weapons.remove(&w),
                    };
                }
            }
            Tile::Wall => {}
        }
    }

    /// Where to stand a token moved into a room: the first tile in reading order
    /// that nobody is standing on, or the room's first tile if all are taken.
    pub fn landing_tile(&self, code: RoomCode, taken: &HashSet<Coordinate>) -> Option<Coordinate> {
        let region = self.rooms.get(&code)?;
        region
            .tiles
            .iter()
            .find(|tile| !taken.contains(tile))
            .or_else(|| region.tiles.first())
            .copied()
    }
}

impl Board {
    fn render_squares<F: Fn(&Tile) -> String>(&self, render: F) -> String {
        self.squares
            .iter()
            .map(|row| row.iter().map(&render).collect::<String>())
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// Like the map, but empty start tiles show as hallway so the only digits
    /// left are the character tokens themselves.
    pub fn render_tokens(&self) -> String {
        self.render_squares(|tile| match tile {
            Tile::Hallway {
                start: Some(_),
                occupant: None,
            } => "H".to_string(),
            tile => tile.to_string(),
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::parse(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_squares(|tile| tile.to_string()))
    }
}
