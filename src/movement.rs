use serde::{Deserialize, Serialize};

use crate::board::{Board, Coordinate, Direction, Tile};
use crate::error::MoveRejection;
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    Moved {
        from: Coordinate,
        to: Coordinate,
        steps_remaining: u32,
    },
    Rejected(MoveRejection),
}

impl MoveResult {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveResult::Moved { .. })
    }
}

// A doorway only ever touches its own room, so checking room edges against hallways is enough
fn check_passage(from: &Tile, to: &Tile) -> Result<(), MoveRejection> {
    use Tile::*;

    match (from, to) {
        (Room(a) | RoomEntry(a), Room(b) | RoomEntry(b)) if a != b => {
            Err(MoveRejection::BetweenRooms)
        }
        (Room(_) | RoomEntry(_), Hallway { .. }) | (Hallway { .. }, Room(_) | RoomEntry(_)) => {
            Err(MoveRejection::NotThroughDoorway)
        }
        _ => Ok(()),
    }
}

/// Where a single step would land, or why it can't be taken.
pub fn check_move(
    board: &Board,
    player: &Player,
    direction: Direction,
) -> Result<Coordinate, MoveRejection> {
    if !player.active {
        return Err(MoveRejection::PlayerEliminated);
    }
    if player.steps_remaining == 0 {
        return Err(MoveRejection::NoStepsRemaining);
    }

    let from = player.position.ok_or(MoveRejection::OutOfBounds)?;
    let to = board
        .neighbour_in_direction(from, direction)
        .ok_or(MoveRejection::OutOfBounds)?;
    let (Some(source), Some(target)) = (board.tile_at(from), board.tile_at(to)) else {
        return Err(MoveRejection::OutOfBounds);
    };

    if target.is_wall() {
        return Err(MoveRejection::Wall);
    }
    if !target.is_traversable() {
        return Err(MoveRejection::Occupied);
    }
    check_passage(source, target)?;

    Ok(to)
}

pub fn can_move(board: &Board, player: &Player, direction: Direction) -> bool {
    check_move(board, player, direction).is_ok()
}

/// Takes one step, moving the token's occupancy and spending a step together.
pub fn move_token(board: &mut Board, player: &mut Player, direction: Direction) -> MoveResult {
    let to = match check_move(board, player, direction) {
        Ok(to) => to,
        Err(reason) => {
            tracing::debug!("{player} cannot move {direction:?}: {reason}");
            return MoveResult::Rejected(reason);
        }
    };
    let Some(from) = player.position else {
        return MoveResult::Rejected(MoveRejection::OutOfBounds);
    };

    let occupant = player.occupant();
    board.vacate(from, occupant);
    if let Err(reason) = board.occupy(to, occupant) {
        board
            .occupy(from, occupant)
            .expect("The tile we just left should still be free");
        return MoveResult::Rejected(reason);
    }

    player.position = Some(to);
    player.steps_remaining -= 1;
    tracing::debug!(
        "{player} moved {direction:?} from {from} to {to}, {} steps left",
        player.steps_remaining
    );

    MoveResult::Moved {
        from,
        to,
        steps_remaining: player.steps_remaining,
    }
}
