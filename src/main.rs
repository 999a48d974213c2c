use anyhow::{bail, Context, Result};
use std::io::{self, Write};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use cluedo::{
    AccusationResult, Board, Coordinate, Direction, GameRules, GameState, MoveResult, PlayerSetup,
    RoomCard, Solution, Suspect, TurnPhase, Weapon,
};

enum Command {
    Roll,
    Move(Direction),
    MoveTo(Coordinate),
    Suggest(Suspect, Weapon),
    Accuse(Solution),
    End,
    Hand,
    Help,
    Quit,
}

enum TurnEnd {
    Passed,
    Quit,
}

const HELP: &str = "\
Commands:
  roll                              roll the dice
  n / s / e / w                     take one step
  to <x> <y>                        step onto a neighbouring tile
  suggest <suspect> <weapon>        e.g. `suggest plum pipe`
  accuse <suspect> <weapon> <room>  e.g. `accuse scarlett rope library`
  hand                              show your cards again
  end                               end your turn
  quit                              leave the game";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let board = match std::env::args().nth(1) {
        Some(path) => {
            let map = std::fs::read_to_string(&path)
                .with_context(|| format!("Couldn't read the board map at {path}"))?;
            Board::parse(&map).with_context(|| format!("{path} is not a valid board map"))?
        }
        None => Board::standard(),
    };

    clear();
    let mut game = setup(board)?;
    loop {
        if let Some(outcome) = game.outcome() {
            clear();
            render_board(&game);
            println!();
            println!("{outcome}");
            if user_input("Play again? (y/n)")?.eq_ignore_ascii_case("y") {
                game.restart()?;
                continue;
            }
            return Ok(());
        }

        pre_turn(&game)?;
        match turn(&mut game)? {
            TurnEnd::Passed => clear(),
            TurnEnd::Quit => return Ok(()),
        }
    }
}

fn setup(board: Board) -> Result<GameState> {
    let rules = GameRules::default();
    let count = loop {
        let count = user_input_usize(&format!(
            "How many players? ({}-{})",
            rules.min_players, rules.max_players
        ))?;
        if (rules.min_players..=rules.max_players).contains(&count) {
            break count;
        }
        println!("Sorry, that's not a playable number of players");
    };

    let mut setups: Vec<PlayerSetup> = Vec::with_capacity(count);
    for i in 0..count {
        let name = user_input(&format!("Player {}'s name:", i + 1))?;
        let available: Vec<Suspect> = Suspect::iter()
            .filter(|s| setups.iter().all(|setup| setup.character != *s))
            .collect();
        let character = loop {
            let choices = available
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            match Suspect::from_name(&user_input(&format!("Who will {name} play? ({choices})"))?) {
                Ok(s) if available.contains(&s) => break s,
                Ok(s) => println!("{s} has already been chosen"),
                Err(e) => println!("{e}"),
            }
        };
        setups.push(PlayerSetup::new(name, character));
    }

    let game = GameState::new(board, setups, rules, None)?;
    user_input("Setup complete! Press enter to start the game")?;
    clear();
    Ok(game)
}

fn pre_turn(game: &GameState) -> Result<()> {
    render_board(game);
    println!();
    println!("It's {}'s turn, everyone else look away", game.current_player());
    user_input("Press enter to see your hand")?;
    clear();
    Ok(())
}

fn turn(game: &mut GameState) -> Result<TurnEnd> {
    render_turn(game);
    loop {
        let input = user_input(">")?;
        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Roll => match game.roll_dice() {
                Ok((a, b)) => {
                    render_turn(game);
                    println!("You rolled {a} and {b}");
                }
                Err(e) => println!("{e}"),
            },
            Command::Move(direction) => {
                let result = game.move_token(direction);
                report_move(game, result)
            }
            Command::MoveTo(target) => {
                let result = game.move_to(target);
                report_move(game, result)
            }
            Command::Suggest(suspect, weapon) => match game.suggest(suspect, weapon) {
                Ok(result) => {
                    render_turn(game);
                    println!(
                        "You suggest it was {} with the {} in the {}",
                        result.suspect, result.weapon, result.room
                    );
                    for change in &result.changes {
                        println!("{change}");
                    }
                }
                Err(e) => println!("{e}"),
            },
            Command::Accuse(accusation) => {
                match game.accuse(accusation.suspect, accusation.weapon, accusation.room) {
                    Ok(AccusationResult::Win { .. }) => return Ok(TurnEnd::Passed),
                    Ok(AccusationResult::Eliminated { .. }) => {
                        println!("That's not what happened. You're out of the game!");
                        user_input("Press enter to continue")?;
                        return Ok(TurnEnd::Passed);
                    }
                    Err(e) => println!("{e}"),
                }
            }
            Command::End => match game.end_turn() {
                Ok(_) => return Ok(TurnEnd::Passed),
                Err(e) => println!("{e}"),
            },
            Command::Hand => println!("Your cards: {}", game.current_player().hand),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(TurnEnd::Quit),
        }
    }
}

fn report_move(game: &GameState, result: MoveResult) {
    match result {
        MoveResult::Moved {
            steps_remaining, ..
        } => {
            render_turn(game);
            if game.phase() == TurnPhase::AwaitingAction {
                println!("Out of steps. Suggest, accuse or end your turn");
            } else {
                println!("{steps_remaining} steps left");
            }
        }
        MoveResult::Rejected(reason) => println!("{reason}"),
    }
}

fn parse_command(input: &str) -> Result<Command> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let Some((first, rest)) = words.split_first() else {
        bail!("Type `help` to see the commands");
    };

    if let Ok(direction) = first.parse::<Direction>() {
        return Ok(Command::Move(direction));
    }

    Ok(match (first.to_ascii_lowercase().as_str(), rest) {
        ("roll", []) => Command::Roll,
        ("to", [x, y]) => Command::MoveTo(Coordinate::new(
            x.parse::<usize>().context("Coordinates are whole numbers")?,
            y.parse::<usize>().context("Coordinates are whole numbers")?,
        )),
        ("suggest", [suspect, weapon]) => {
            Command::Suggest(Suspect::from_name(suspect)?, Weapon::from_name(weapon)?)
        }
        ("accuse", [suspect, weapon, room]) => {
            Command::Accuse(Solution::from_names(suspect, weapon, room)?)
        }
        ("end", []) => Command::End,
        ("hand", []) => Command::Hand,
        ("help", _) => Command::Help,
        ("quit", []) => Command::Quit,
        _ => bail!("Sorry, I couldn't read that. Type `help` to see the commands"),
    })
}

fn render_turn(game: &GameState) {
    clear();
    render_board(game);
    println!();
    let player = game.current_player();
    let place = match player.room(game.board()) {
        Some(room) => format!("in the {}", room.code),
        None => match player.position {
            Some(position) => format!("at {position}"),
            None => "off the board".to_string(),
        },
    };
    println!("{player} is {place}, {} steps left", player.steps_remaining);
    println!("Your cards: {}", player.hand);
    let legend = RoomCard::iter()
        .map(|r| format!("{}={r}", r.code()))
        .collect::<Vec<_>>()
        .join("  ");
    println!("Rooms: {legend}");
}

fn render_board(game: &GameState) {
    let board = game.board();
    let mut header = String::from("    ");
    for x in 0..board.width() {
        header.push_str(&format!("{}", x % 10));
    }
    println!("{header}");
    for (y, row) in board.render_tokens().lines().enumerate() {
        println!("{y:>3} {row}");
    }
    println!();
    for player in game.players() {
        let status = if player.active { "" } else { " (out)" };
        println!("  {}: {player}{status}", player.character.start_marker());
    }
    println!();
    for room in board.rooms().filter(|room| room.occupants().next().is_some()) {
        println!("  {room}");
    }
}

// Utilities
fn user_input(prompt: &str) -> Result<String> {
    print!("{prompt} ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        bail!("Input closed");
    }
    Ok(line.trim().to_string())
}

fn user_input_usize(prompt: &str) -> Result<usize> {
    loop {
        match user_input(prompt)?.parse() {
            Ok(n) => return Ok(n),
            Err(_) => println!("Couldn't read number, please try again"),
        }
    }
}

fn clear() {
    if let Err(e) = clearscreen::clear() {
        tracing::warn!("Failed to clear the screen: {e}");
    }
}
