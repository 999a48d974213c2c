use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TurnError;
use crate::player::Player;
use crate::rules::GameRules;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingRoll,
    Moving,
    AwaitingAction,
    GameOver,
}

/// Whose turn it is, and how far through it they are.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnController {
    phase: TurnPhase,
    current: usize,
    turn_count: u32,
    last_roll: Option<(u8, u8)>,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnController {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::AwaitingRoll,
            current: 0,
            turn_count: 0,
            last_roll: None,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn last_roll(&self) -> Option<(u8, u8)> {
        self.last_roll
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// Rolls two dice for the current player and gives them that many steps.
    pub fn roll_dice<R: Rng>(
        &mut self,
        player: &mut Player,
        rules: &GameRules,
        rng: &mut R,
    ) -> Result<(u8, u8), TurnError> {
        match self.phase {
            TurnPhase::GameOver => return Err(TurnError::GameOver),
            TurnPhase::Moving | TurnPhase::AwaitingAction => return Err(TurnError::AlreadyRolled),
            TurnPhase::AwaitingRoll => {}
        }

        let faces = rules.die_faces.max(1);
        let dice = (rng.gen_range(1..=faces), rng.gen_range(1..=faces));
        self.last_roll = Some(dice);
        self.start_moving(player, u32::from(dice.0) + u32::from(dice.1));
        tracing::debug!("{player} rolled {} and {}", dice.0, dice.1);

        Ok(dice)
    }

    pub fn start_moving(&mut self, player: &mut Player, steps: u32) {
        player.steps_remaining = steps;
        self.phase = if steps == 0 {
            TurnPhase::AwaitingAction
        } else {
            TurnPhase::Moving
        };
    }

    /// Called after each successful step.
    pub fn record_step(&mut self, player: &Player) {
        if self.phase == TurnPhase::Moving && player.steps_remaining == 0 {
            self.phase = TurnPhase::AwaitingAction;
        }
    }

    /// Gives up any remaining steps, e.g. once a suggestion has been made.
    pub fn stop_moving(&mut self, player: &mut Player) {
        player.steps_remaining = 0;
        if !self.is_over() {
            self.phase = TurnPhase::AwaitingAction;
        }
    }

    /// Hands the turn to the next active player in join order, wrapping around.
    ///
    /// Returns the index of the new current player.
    pub fn end_turn(&mut self, players: &mut [Player]) -> Result<usize, TurnError> {
        if self.is_over() {
            return Err(TurnError::GameOver);
        }

        if let Some(outgoing) = players.get_mut(self.current) {
            outgoing.suggested_this_turn = false;
            outgoing.steps_remaining = 0;
        }

        let count = players.len();
        let Some(next) = (1..=count)
            .map(|offset| (self.current + offset) % count)
            .find(|&i| players[i].active)
        else {
            self.finish();
            return Err(TurnError::GameOver);
        };

        tracing::debug!("Turn passes from player {} to player {next}", self.current);
        self.current = next;
        self.phase = TurnPhase::AwaitingRoll;
        self.turn_count += 1;
        self.last_roll = None;

        Ok(next)
    }

    pub fn finish(&mut self) {
        self.phase = TurnPhase::GameOver;
    }
}
