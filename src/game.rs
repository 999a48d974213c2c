use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use strum::IntoEnumIterator;

use crate::board::{Board, Coordinate, Direction, Tile};
use crate::cards::{RoomCard, Solution, SolutionVault, Suspect, Weapon};
use crate::error::{InvalidAccusation, InvalidSuggestion, MoveRejection, SetupError, TurnError};
use crate::movement::{self, MoveResult};
use crate::player::{Hand, Player, PlayerSetup, WeaponToken};
use crate::reporting::{Change, GameOutcome};
use crate::resolver::{self, AccusationResult, SuggestionResult};
use crate::rules::GameRules;
use crate::turn::{TurnController, TurnPhase};

/// Everything about one game in progress. The presentation layer drives it
/// through the command methods and reads it back through the queries.
#[derive(Debug, Clone)]
pub struct GameState {
    rules: GameRules,
    board: Board,
    initial_board: Board,
    setups: Vec<PlayerSetup>,
    players: Vec<Player>,
    weapons: Vec<WeaponToken>,
    turn: TurnController,
    vault: SolutionVault,
    recent_changes: Vec<Change>,
    outcome: Option<GameOutcome>,
    rng: StdRng,
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl GameState {
    /// Sets up a game with a randomly drawn solution.
    pub fn new(
        board: Board,
        setups: Vec<PlayerSetup>,
        rules: GameRules,
        seed: Option<u64>,
    ) -> Result<Self, SetupError> {
        let mut rng = seeded(seed);
        let solution = Solution::random(&mut rng);
        Self::build(board, setups, rules, solution, rng)
    }

    pub fn with_solution(
        board: Board,
        setups: Vec<PlayerSetup>,
        rules: GameRules,
        solution: Solution,
        seed: Option<u64>,
    ) -> Result<Self, SetupError> {
        Self::build(board, setups, rules, solution, seeded(seed))
    }

    fn build(
        board: Board,
        setups: Vec<PlayerSetup>,
        rules: GameRules,
        solution: Solution,
        mut rng: StdRng,
    ) -> Result<Self, SetupError> {
        // A game always needs someone to take the first turn
        let min_players = rules.min_players.max(1);
        if setups.len() < min_players {
            return Err(SetupError::TooFewPlayers {
                min: min_players,
                found: setups.len(),
            });
        }
        if setups.len() > rules.max_players {
            return Err(SetupError::TooManyPlayers {
                max: rules.max_players,
                found: setups.len(),
            });
        }
        let mut chosen = HashSet::new();
        for setup in &setups {
            if !chosen.insert(setup.character) {
                return Err(SetupError::DuplicateCharacter {
                    character: setup.character,
                });
            }
        }

        let initial_board = board.clone();
        let mut board = board;
        let mut players: Vec<Player> = setups
            .iter()
            .enumerate()
            .map(|(i, setup)| Player::new(setup.name.clone(), i, setup.character))
            .collect();
        board.place_starting_tokens(&mut players)?;

        let vault = SolutionVault::new(solution);
        for (player, cards) in players
            .iter_mut()
            .zip(vault.deal(setups.len(), &mut rng))
        {
            player.hand = Hand(cards);
        }

        let mut recent_changes = vec![];
        let weapons = Self::place_weapons(&mut board, &players, &mut rng, &mut recent_changes)?;

        tracing::info!("New game for {} players", players.len());

        Ok(Self {
            rules,
            board,
            initial_board,
            setups,
            players,
            weapons,
            turn: TurnController::new(),
            vault,
            recent_changes,
            outcome: None,
            rng,
        })
    }

    /// Puts each weapon in a different named room, doubling up once every room holds one.
    fn place_weapons(
        board: &mut Board,
        players: &[Player],
        rng: &mut StdRng,
        changes: &mut Vec<Change>,
    ) -> Result<Vec<WeaponToken>, SetupError> {
        let mut rooms: Vec<_> = board
            .rooms()
            .filter(|room| room.card.is_some())
            .map(|room| room.code)
            .collect();
        if rooms.is_empty() {
            return Err(SetupError::NoRooms);
        }
        rooms.shuffle(rng);

        let mut taken: HashSet<Coordinate> = players.iter().filter_map(|p| p.position).collect();
        let mut weapons = vec![];
        for (weapon, room) in Weapon::iter().zip(rooms.iter().cycle()) {
            let position = board
                .landing_tile(*room, &taken)
                .ok_or(SetupError::NoRooms)?;
            let token = WeaponToken { weapon, position };
            board
                .occupy(position, token.occupant())
                .expect("Room tiles always have space for another token");
            taken.insert(position);
            changes.push(Change::Relocated {
                occupant: token.occupant(),
                from: None,
                to: position,
            });
            weapons.push(token);
        }
        Ok(weapons)
    }

    /// Deals a fresh game on the starting board with the same players.
    pub fn restart(&mut self) -> Result<(), SetupError> {
        let mut rng = StdRng::seed_from_u64(self.rng.gen());
        let solution = Solution::random(&mut rng);
        *self = Self::build(
            self.initial_board.clone(),
            self.setups.clone(),
            self.rules.clone(),
            solution,
            rng,
        )?;
        Ok(())
    }

    pub fn roll_dice(&mut self) -> Result<(u8, u8), TurnError> {
        self.recent_changes.clear();
        let current = self.turn.current();
        let dice = self
            .turn
            .roll_dice(&mut self.players[current], &self.rules, &mut self.rng)?;
        self.recent_changes.push(Change::Rolled {
            player: current,
            dice,
        });
        Ok(dice)
    }

    /// Moves the current player's token a single step.
    pub fn move_token(&mut self, direction: Direction) -> MoveResult {
        self.recent_changes.clear();
        if self.is_over() {
            return MoveResult::Rejected(MoveRejection::GameOver);
        }

        let current = self.turn.current();
        let player = &mut self.players[current];
        let result = movement::move_token(&mut self.board, player, direction);
        if let MoveResult::Moved { from, to, .. } = result {
            self.turn.record_step(player);
            self.recent_changes.push(Change::Moved {
                player: current,
                from,
                to,
            });
        }
        result
    }

    /// Moves towards a clicked tile, which must be next to the current player's token.
    pub fn move_to(&mut self, target: Coordinate) -> MoveResult {
        if self.is_over() {
            self.recent_changes.clear();
            return MoveResult::Rejected(MoveRejection::GameOver);
        }
        let direction = self
            .current_player()
            .position
            .and_then(|position| position.direction_to(target));
        match direction {
            Some(direction) => self.move_token(direction),
            None => {
                self.recent_changes.clear();
                MoveResult::Rejected(MoveRejection::NotAdjacent)
            }
        }
    }

    pub fn suggest(
        &mut self,
        suspect: Suspect,
        weapon: Weapon,
    ) -> Result<SuggestionResult, InvalidSuggestion> {
        self.recent_changes.clear();
        if self.is_over() {
            return Err(InvalidSuggestion::GameOver);
        }

        let current = self.turn.current();
        let result = resolver::suggest(
            &mut self.board,
            &mut self.players,
            &mut self.weapons,
            current,
            suspect,
            weapon,
        )?;
        if self.rules.suggestion_ends_movement {
            self.turn.stop_moving(&mut self.players[current]);
        }

        self.recent_changes.push(Change::Suggested {
            player: current,
            suspect,
            weapon,
            room: result.room,
        });
        self.recent_changes.extend(result.changes.iter().cloned());
        Ok(result)
    }

    /// Accuses on behalf of the current player. A wrong accusation knocks them out
    /// and passes the turn on, or ends the game if nobody is left.
    pub fn accuse(
        &mut self,
        suspect: Suspect,
        weapon: Weapon,
        room: RoomCard,
    ) -> Result<AccusationResult, InvalidAccusation> {
        self.recent_changes.clear();
        if self.is_over() {
            return Err(InvalidAccusation::GameOver);
        }

        let current = self.turn.current();
        let accusation = Solution::new(suspect, weapon, room);
        let result = resolver::accuse(&self.vault, &mut self.players[current], &accusation)?;

        match result {
            AccusationResult::Win { winner } => {
                self.finish(GameOutcome::Solved {
                    winner,
                    solution: self.vault.reveal(),
                });
            }
            AccusationResult::Eliminated { player } => {
                self.recent_changes.push(Change::Eliminated { player });
                if self.rules.remove_eliminated_tokens {
                    self.lift_token(player);
                }

                if self.players.iter().any(|p| p.active) {
                    if let Ok(next) = self.turn.end_turn(&mut self.players) {
                        self.recent_changes.push(Change::TurnPassed {
                            from: player,
                            to: next,
                        });
                    }
                } else {
                    self.finish(GameOutcome::Unsolved {
                        solution: self.vault.reveal(),
                    });
                }
            }
        }

        Ok(result)
    }

    pub fn end_turn(&mut self) -> Result<usize, TurnError> {
        self.recent_changes.clear();
        let from = self.turn.current();
        let next = self.turn.end_turn(&mut self.players)?;
        self.recent_changes.push(Change::TurnPassed { from, to: next });
        Ok(next)
    }

    fn lift_token(&mut self, player: usize) {
        let player = &mut self.players[player];
        if let Some(position) = player.position.take() {
            self.board.vacate(position, player.occupant());
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        tracing::info!("{outcome}");
        self.turn.finish();
        self.recent_changes.push(Change::Finished(outcome.clone()));
        self.outcome = Some(outcome);
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tile_at(&self, position: Coordinate) -> Option<&Tile> {
        self.board.tile_at(position)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get_player(&self, player: usize) -> Option<&Player> {
        self.players.get(player)
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.turn.current()]
    }

    pub fn hand(&self, player: usize) -> Option<&Hand> {
        self.players.get(player).map(|p| &p.hand)
    }

    pub fn weapons(&self) -> &[WeaponToken] {
        &self.weapons
    }

    pub fn turn(&self) -> &TurnController {
        &self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase()
    }

    pub fn is_over(&self) -> bool {
        self.turn.is_over()
    }

    /// Only set once the game has ended, and the only place the solution is shown.
    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn recent_changes(&self) -> &[Change] {
        &self.recent_changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{tests as BoardUtils, Occupant, RoomCode};
    use crate::cards::Card;

    fn crime() -> Solution {
        Solution::new(Suspect::MissScarlett, Weapon::Rope, RoomCard::Library)
    }

    fn setups(suspects: &[Suspect]) -> Vec<PlayerSetup> {
        suspects
            .iter()
            .enumerate()
            .map(|(i, s)| PlayerSetup::new(format!("Player {i}"), *s))
            .collect()
    }

    fn standard_game(suspects: &[Suspect]) -> GameState {
        GameState::with_solution(
            Board::standard(),
            setups(suspects),
            GameRules::default(),
            crime(),
            Some(11),
        )
        .unwrap()
    }

    /// Scarlett starts one step from the kitchen door.
    fn doorstep_game() -> GameState {
        let board = Board::parse(["XXXXX", "X0dKX", "X1XXX"].join("\n")).unwrap();
        GameState::with_solution(
            board,
            setups(&[Suspect::MissScarlett, Suspect::ColonelMustard]),
            GameRules::default(),
            crime(),
            Some(3),
        )
        .unwrap()
    }

    /// Every token the game knows about is where the board says it is.
    fn assert_consistent(game: &GameState) {
        for player in game.players() {
            let Some(position) = player.position else {
                assert!(!player.active);
                continue;
            };
            match game.tile_at(position) {
                Some(Tile::Hallway { occupant, .. }) | Some(Tile::Doorway { occupant, .. }) => {
                    assert_eq!(*occupant, Some(player.occupant()))
                }
                Some(Tile::Room(_)) | Some(Tile::RoomEntry(_)) => {
                    assert!(game
                        .board()
                        .room_at(position)
                        .unwrap()
                        .contains(player.occupant()));
                }
                other => panic!("{player} is standing on {other:?}"),
            }
        }
        for weapon in game.weapons() {
            assert!(game
                .board()
                .room_at(weapon.position)
                .unwrap()
                .contains(weapon.occupant()));
        }
    }

    #[test]
    fn sets_up_a_game() {
        let game = standard_game(&[
            Suspect::MissScarlett,
            Suspect::ColonelMustard,
            Suspect::MrsWhite,
        ]);

        assert_eq!(game.phase(), TurnPhase::AwaitingRoll);
        assert_eq!(game.current_player().index, 0);
        assert_eq!(game.outcome(), None);
        for player in game.players() {
            assert_eq!(player.position, game.board().start_tile(player.character));
            assert_eq!(player.steps_remaining, 0);
        }

        let dealt: Vec<Card> = (0..3)
            .flat_map(|i| game.hand(i).unwrap().iter().copied())
            .collect();
        let unique: HashSet<Card> = dealt.iter().copied().collect();
        assert_eq!(dealt.len(), 18);
        assert_eq!(unique.len(), 18);
        assert!(dealt.iter().all(|card| !crime().contains(*card)));
        assert_eq!(game.hand(3), None);

        let rooms: HashSet<RoomCode> = game
            .weapons()
            .iter()
            .map(|w| game.board().room_at(w.position).unwrap().code)
            .collect();
        assert_eq!(game.weapons().len(), 6);
        assert_eq!(rooms.len(), 6);
        assert!(rooms.iter().all(|code| code.card().is_some()));
        assert_eq!(game.recent_changes().len(), 6);
        assert_consistent(&game);
    }

    #[test]
    fn weapons_share_rooms_when_there_are_few() {
        let game = GameState::new(
            BoardUtils::small_house(),
            setups(&[Suspect::MissScarlett, Suspect::ColonelMustard]),
            GameRules::default(),
            Some(5),
        )
        .unwrap();

        let in_kitchen = game
            .weapons()
            .iter()
            .filter(|w| game.board().room_at(w.position).unwrap().code == RoomCode('K'))
            .count();
        assert_eq!(in_kitchen, 3);
        assert_consistent(&game);
    }

    #[test]
    fn setup_errors() {
        let build = |board: Board, suspects: &[Suspect]| {
            GameState::new(board, setups(suspects), GameRules::default(), Some(1)).err()
        };

        assert_eq!(
            build(Board::standard(), &[Suspect::MissScarlett]),
            Some(SetupError::TooFewPlayers { min: 2, found: 1 })
        );
        let everyone: Vec<Suspect> = Suspect::iter().chain([Suspect::MrsWhite]).collect();
        assert_eq!(
            build(Board::standard(), &everyone),
            Some(SetupError::TooManyPlayers { max: 6, found: 7 })
        );
        assert_eq!(
            build(
                Board::standard(),
                &[Suspect::MrsPeacock, Suspect::MrsPeacock]
            ),
            Some(SetupError::DuplicateCharacter {
                character: Suspect::MrsPeacock
            })
        );
        assert_eq!(
            build(
                BoardUtils::small_house(),
                &[Suspect::MissScarlett, Suspect::MrsWhite]
            ),
            Some(SetupError::NoStartTileForCharacter {
                character: Suspect::MrsWhite
            })
        );
        assert_eq!(
            build(
                Board::parse("XXXX\nX01X\nXXXX").unwrap(),
                &[Suspect::MissScarlett, Suspect::ColonelMustard]
            ),
            Some(SetupError::NoRooms)
        );
    }

    #[test]
    fn always_needs_a_player() {
        let rules = GameRules {
            min_players: 0,
            ..GameRules::default()
        };
        assert_eq!(
            GameState::new(Board::standard(), vec![], rules.clone(), Some(1)).err(),
            Some(SetupError::TooFewPlayers { min: 1, found: 0 })
        );

        let mut game = GameState::new(
            Board::standard(),
            setups(&[Suspect::MrsPeacock]),
            rules,
            Some(1),
        )
        .unwrap();
        assert!(game.roll_dice().is_ok());
        assert_eq!(game.end_turn(), Ok(0));
    }

    #[test]
    fn huge_dice_still_report() {
        let rules = GameRules {
            die_faces: 200,
            ..GameRules::default()
        };
        let mut game = GameState::with_solution(
            Board::standard(),
            setups(&[Suspect::MissScarlett, Suspect::ProfessorPlum]),
            rules,
            crime(),
            Some(8),
        )
        .unwrap();
        let (a, b) = game.roll_dice().unwrap();
        assert_eq!(
            game.current_player().steps_remaining,
            u32::from(a) + u32::from(b)
        );
        assert_eq!(
            game.recent_changes()[0].to_string(),
            format!("Player 0 rolled {a} and {b} ({} steps)", u32::from(a) + u32::from(b))
        );
    }

    #[test]
    fn state_serialises_for_the_view() {
        #[derive(serde::Serialize)]
        struct View<'a> {
            phase: TurnPhase,
            rejected: MoveResult,
            mustard_start: Option<&'a Tile>,
            door: Option<&'a Tile>,
            kitchen: Option<&'a crate::board::RoomRegion>,
            change: Change,
            outcome: Option<&'a GameOutcome>,
        }

        let mut game = doorstep_game();
        let rejected = game.move_token(Direction::East);
        game.roll_dice().unwrap();
        game.move_token(Direction::East);
        game.move_token(Direction::East);
        game.suggest(Suspect::ColonelMustard, Weapon::Rope).unwrap();
        let change = game.recent_changes()[0].clone();
        game.accuse(Suspect::MissScarlett, Weapon::Rope, RoomCard::Library)
            .unwrap();

        insta::assert_yaml_snapshot!(View {
            phase: game.phase(),
            rejected,
            mustard_start: game.tile_at(Coordinate::new(1, 2)),
            door: game.tile_at(Coordinate::new(2, 1)),
            kitchen: game.board().room(RoomCode('K')),
            change,
            outcome: game.outcome(),
        }, @r###"
        ---
        phase: GameOver
        rejected:
          Rejected: NoStepsRemaining
        mustard_start:
          Hallway:
            start: ColonelMustard
            occupant: ~
        door:
          Doorway:
            room: K
            occupant: ~
        kitchen:
          code: K
          card: Kitchen
          tiles:
            - x: 3
              y: 1
          characters:
            - MissScarlett
            - ColonelMustard
          weapons:
            - Candlestick
            - Dagger
            - LeadPipe
            - Revolver
            - Rope
            - Spanner
        change:
          Suggested:
            player: 0
            suspect: ColonelMustard
            weapon: Rope
            room: Kitchen
        outcome:
          Solved:
            winner: 0
            solution:
              suspect: MissScarlett
              weapon: Rope
              room: Library
        "###);
    }

    #[test]
    fn rolling_and_moving() {
        let mut game = doorstep_game();

        assert_eq!(
            game.move_token(Direction::East),
            MoveResult::Rejected(MoveRejection::NoStepsRemaining)
        );

        let (a, b) = game.roll_dice().unwrap();
        let rolled = u32::from(a + b);
        assert_eq!(game.phase(), TurnPhase::Moving);
        assert_eq!(game.current_player().steps_remaining, rolled);
        assert_eq!(
            game.recent_changes(),
            &[Change::Rolled {
                player: 0,
                dice: (a, b)
            }]
        );
        assert_eq!(game.roll_dice(), Err(TurnError::AlreadyRolled));

        assert!(game.move_token(Direction::East).is_moved());
        assert!(game.move_to(Coordinate::new(3, 1)).is_moved());
        assert_eq!(game.current_player().steps_remaining, rolled - 2);
        assert_eq!(
            game.recent_changes(),
            &[Change::Moved {
                player: 0,
                from: Coordinate::new(2, 1),
                to: Coordinate::new(3, 1)
            }]
        );
        assert_eq!(
            game.move_to(Coordinate::new(1, 2)),
            MoveResult::Rejected(MoveRejection::NotAdjacent)
        );
        assert_consistent(&game);
    }

    #[test]
    fn suggestions_pull_tokens_into_the_room() {
        let mut game = doorstep_game();
        game.roll_dice().unwrap();
        assert_eq!(
            game.suggest(Suspect::ColonelMustard, Weapon::Rope),
            Err(InvalidSuggestion::NotInRoom)
        );
        game.move_token(Direction::East);
        game.move_token(Direction::East);

        let result = game
            .suggest(Suspect::ColonelMustard, Weapon::Rope)
            .unwrap();
        assert_eq!(result.room, RoomCard::Kitchen);
        assert_eq!(game.phase(), TurnPhase::AwaitingAction);
        assert_eq!(game.current_player().steps_remaining, 0);
        assert_eq!(
            game.recent_changes()[0],
            Change::Suggested {
                player: 0,
                suspect: Suspect::ColonelMustard,
                weapon: Weapon::Rope,
                room: RoomCard::Kitchen
            }
        );
        assert_eq!(game.players()[1].position, Some(Coordinate::new(3, 1)));
        assert_eq!(game.board().occupant_count(Coordinate::new(1, 2)), 0);
        assert!(game
            .board()
            .room(RoomCode('K'))
            .unwrap()
            .contains(Occupant::Character(Suspect::ColonelMustard)));

        assert_eq!(
            game.suggest(Suspect::MrsWhite, Weapon::Dagger),
            Err(InvalidSuggestion::AlreadySuggested)
        );

        // Mustard was dragged into the kitchen, so can suggest straight away
        assert_eq!(game.end_turn(), Ok(1));
        assert!(game.suggest(Suspect::MissScarlett, Weapon::Dagger).is_ok());
        assert_consistent(&game);
    }

    #[test]
    fn suggestions_can_leave_steps_alone() {
        let board = Board::parse(["XXXXX", "X0dKX", "X1XXX"].join("\n")).unwrap();
        let rules = GameRules {
            suggestion_ends_movement: false,
            ..GameRules::default()
        };
        let mut game = GameState::with_solution(
            board,
            setups(&[Suspect::MissScarlett, Suspect::ColonelMustard]),
            rules,
            crime(),
            Some(3),
        )
        .unwrap();

        let (a, b) = game.roll_dice().unwrap();
        game.move_token(Direction::East);
        game.move_token(Direction::East);
        game.suggest(Suspect::ColonelMustard, Weapon::Rope).unwrap();
        assert_eq!(
            game.current_player().steps_remaining,
            u32::from(a + b) - 2
        );
    }

    #[test]
    fn correct_accusation_wins() {
        let mut game = standard_game(&[Suspect::MissScarlett, Suspect::ProfessorPlum]);

        assert_eq!(
            game.accuse(Suspect::MissScarlett, Weapon::Rope, RoomCard::Library),
            Ok(AccusationResult::Win { winner: 0 })
        );
        assert!(game.is_over());
        assert_eq!(game.phase(), TurnPhase::GameOver);
        assert_eq!(
            game.outcome(),
            Some(&GameOutcome::Solved {
                winner: 0,
                solution: crime()
            })
        );
        assert_eq!(
            game.recent_changes().last().map(|c| c.to_string()),
            Some(
                "Player 0 solved the crime! Miss Scarlett committed the crime with the Rope in the Library"
                    .to_string()
            )
        );

        assert_eq!(game.roll_dice(), Err(TurnError::GameOver));
        assert_eq!(game.end_turn(), Err(TurnError::GameOver));
        assert_eq!(
            game.move_token(Direction::North),
            MoveResult::Rejected(MoveRejection::GameOver)
        );
        assert_eq!(
            game.suggest(Suspect::MrsWhite, Weapon::Rope),
            Err(InvalidSuggestion::GameOver)
        );
        assert_eq!(
            game.accuse(Suspect::ProfessorPlum, Weapon::Rope, RoomCard::Library),
            Err(InvalidAccusation::GameOver)
        );
    }

    #[test]
    fn wrong_accusation_eliminates() {
        let mut game = standard_game(&[
            Suspect::MissScarlett,
            Suspect::ProfessorPlum,
            Suspect::MrsPeacock,
        ]);
        game.end_turn().unwrap();
        let plum_start = game.current_player().position.unwrap();

        assert_eq!(
            game.accuse(Suspect::ProfessorPlum, Weapon::Rope, RoomCard::Library),
            Ok(AccusationResult::Eliminated { player: 1 })
        );
        assert!(!game.players()[1].active);
        assert_eq!(game.players()[1].position, None);
        assert!(game.board().is_traversable(plum_start));
        assert!(!game.is_over());
        assert_eq!(game.current_player().index, 2);
        assert_eq!(game.phase(), TurnPhase::AwaitingRoll);
        assert_eq!(
            game.recent_changes(),
            &[
                Change::Eliminated { player: 1 },
                Change::TurnPassed { from: 1, to: 2 }
            ]
        );

        // Plum's slot is skipped from now on
        assert_eq!(game.end_turn(), Ok(0));
        assert_eq!(game.end_turn(), Ok(2));
        assert_consistent(&game);
    }

    #[test]
    fn eliminated_tokens_can_stay() {
        let rules = GameRules {
            remove_eliminated_tokens: false,
            ..GameRules::default()
        };
        let mut game = GameState::with_solution(
            Board::standard(),
            setups(&[Suspect::MissScarlett, Suspect::ProfessorPlum]),
            rules,
            crime(),
            None,
        )
        .unwrap();
        let start = game.current_player().position;
        game.accuse(Suspect::MrsWhite, Weapon::Rope, RoomCard::Library)
            .unwrap();
        assert_eq!(game.players()[0].position, start);
        assert!(!game.board().is_traversable(start.unwrap()));
    }

    #[test]
    fn last_player_standing_keeps_playing() {
        let mut game = standard_game(&[Suspect::MissScarlett, Suspect::ProfessorPlum]);
        game.accuse(Suspect::MrsWhite, Weapon::Rope, RoomCard::Library)
            .unwrap();
        for _ in 0..5 {
            assert_eq!(game.current_player().index, 1);
            assert_eq!(game.end_turn(), Ok(1));
        }
    }

    #[test]
    fn nobody_left_means_unsolved() {
        let mut game = standard_game(&[Suspect::MissScarlett, Suspect::ProfessorPlum]);
        game.accuse(Suspect::MrsWhite, Weapon::Rope, RoomCard::Library)
            .unwrap();
        game.accuse(Suspect::MissScarlett, Weapon::Dagger, RoomCard::Library)
            .unwrap();

        assert!(game.is_over());
        assert_eq!(
            game.outcome(),
            Some(&GameOutcome::Unsolved { solution: crime() })
        );
        assert_eq!(game.outcome().and_then(GameOutcome::winner), None);
    }

    #[test]
    fn restart_deals_a_new_game() {
        let mut game = doorstep_game();
        game.roll_dice().unwrap();
        game.move_token(Direction::East);
        game.accuse(Suspect::MrsWhite, Weapon::Rope, RoomCard::Library)
            .unwrap();

        game.restart().unwrap();
        assert_eq!(game.phase(), TurnPhase::AwaitingRoll);
        assert_eq!(game.outcome(), None);
        assert!(game.players().iter().all(|p| p.active));
        assert_eq!(game.players()[0].position, Some(Coordinate::new(1, 1)));
        assert_eq!(game.board().occupant_count(Coordinate::new(2, 1)), 0);
        assert_eq!(
            game.players().iter().map(|p| p.hand.len()).sum::<usize>(),
            18
        );
        assert_consistent(&game);
    }

    #[test]
    fn random_play_keeps_the_board_consistent() {
        let mut game = standard_game(&[
            Suspect::MissScarlett,
            Suspect::ColonelMustard,
            Suspect::ReverendGreen,
            Suspect::MrsPeacock,
        ]);
        let mut rng = StdRng::seed_from_u64(99);
        let directions: Vec<Direction> = Direction::iter().collect();

        for _ in 0..200 {
            let (a, b) = game.roll_dice().unwrap();
            let mut moved = 0;
            for _ in 0..30 {
                let direction = *directions.choose(&mut rng).unwrap();
                if game.move_token(direction).is_moved() {
                    moved += 1;
                }
                assert_eq!(
                    game.current_player().steps_remaining,
                    u32::from(a + b) - moved
                );
            }
            if game.current_player().steps_remaining == 0 {
                assert_eq!(game.phase(), TurnPhase::AwaitingAction);
            }
            let suspect = *Suspect::iter().collect::<Vec<_>>().choose(&mut rng).unwrap();
            let weapon = *Weapon::iter().collect::<Vec<_>>().choose(&mut rng).unwrap();
            let _ = game.suggest(suspect, weapon);
            assert_consistent(&game);
            game.end_turn().unwrap();
        }
    }
}
