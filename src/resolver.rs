use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::board::{Board, Coordinate, Occupant, RoomCode};
use crate::cards::{RoomCard, Solution, SolutionVault, Suspect, Weapon};
use crate::error::{InvalidAccusation, InvalidSuggestion};
use crate::player::{Player, WeaponToken};
use crate::reporting::Change;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: RoomCard,
    /// Tokens pulled into the room, in the order they were moved.
    pub changes: Vec<Change>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccusationResult {
    Win { winner: usize },
    Eliminated { player: usize },
}

/// Every tile a token is standing on, so relocated tokens can be spread around a room.
fn standing_tiles(players: &[Player], weapons: &[WeaponToken]) -> HashSet<Coordinate> {
    players
        .iter()
        .filter_map(|p| p.position)
        .chain(weapons.iter().map(|w| w.position))
        .collect()
}

/// Moves a token into `room` unless it is already there. Returns where it landed.
fn pull_into_room(
    board: &mut Board,
    occupant: Occupant,
    from: Coordinate,
    room: RoomCode,
    taken: &HashSet<Coordinate>,
) -> Option<Coordinate> {
    if board.tile_at(from).and_then(|t| t.room()) == Some(room) {
        return None;
    }
    let to = board.landing_tile(room, taken)?;

    board.vacate(from, occupant);
    board
        .occupy(to, occupant)
        .expect("Room tiles always have space for another token");
    Some(to)
}

/// Pulls the named suspect and weapon into the suggester's room.
///
/// Never consults the solution. A suspect nobody is playing has no token,
/// so only the weapon moves in that case.
pub fn suggest(
    board: &mut Board,
    players: &mut [Player],
    weapons: &mut [WeaponToken],
    suggester: usize,
    suspect: Suspect,
    weapon: Weapon,
) -> Result<SuggestionResult, InvalidSuggestion> {
    let player = &players[suggester];
    if !player.active {
        return Err(InvalidSuggestion::PlayerEliminated);
    }
    let region = player.room(board).ok_or(InvalidSuggestion::NotInRoom)?;
    let room_card = region.card.ok_or(InvalidSuggestion::UnnamedRoom)?;
    let room_code = region.code;
    if player.suggested_this_turn {
        return Err(InvalidSuggestion::AlreadySuggested);
    }

    let mut changes = vec![];
    let mut taken = standing_tiles(players, weapons);

    if let Some(accused) = players
        .iter_mut()
        .find(|p| p.character == suspect && p.position.is_some())
    {
        let occupant = accused.occupant();
        if let Some(from) = accused.position {
            if let Some(to) = pull_into_room(board, occupant, from, room_code, &taken) {
                accused.position = Some(to);
                taken.insert(to);
                changes.push(Change::Relocated {
                    occupant,
                    from: Some(from),
                    to,
                });
            }
        }
    }

    if let Some(token) = weapons.iter_mut().find(|w| w.weapon == weapon) {
        let occupant = token.occupant();
        let from = token.position;
        if let Some(to) = pull_into_room(board, occupant, from, room_code, &taken) {
            token.position = to;
            changes.push(Change::Relocated {
                occupant,
                from: Some(from),
                to,
            });
        }
    }

    players[suggester].suggested_this_turn = true;
    tracing::info!(
        "{} suggests {suspect} with the {weapon} in the {room_card}",
        players[suggester]
    );

    Ok(SuggestionResult {
        suspect,
        weapon,
        room: room_card,
        changes,
    })
}

/// Checks an accusation against the hidden solution.
///
/// A wrong accusation eliminates the accuser. Nothing else is touched.
pub fn accuse(
    vault: &SolutionVault,
    player: &mut Player,
    accusation: &Solution,
) -> Result<AccusationResult, InvalidAccusation> {
    if !player.active {
        return Err(InvalidAccusation::PlayerEliminated);
    }

    if vault.check(accusation) {
        tracing::info!("{player} correctly accused {accusation:?}");
        Ok(AccusationResult::Win {
            winner: player.index,
        })
    } else {
        player.active = false;
        tracing::info!("{player} wrongly accused {accusation:?} and is out");
        Ok(AccusationResult::Eliminated {
            player: player.index,
        })
    }
}
