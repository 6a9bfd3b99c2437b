use std::{
    io::{self, Write as _},
    time::Duration,
};

use anyhow::Context as _;
use clap::Args;
use xoxide_ai::{BotMatch, Difficulty};
use xoxide_engine::{
    GameMode, GameSession, MoveError, Player, Position, SessionConfig, SessionState, WinReason,
};

#[derive(Debug, Clone, Args)]
pub struct PlayArg {
    /// Rule variant: classic, timed, scoring or randomevents
    #[arg(long, default_value = "classic")]
    mode: GameMode,
    /// Marks in a row needed to win
    #[arg(long, default_value_t = 5)]
    winning_length: i32,
    /// Total score that ends a score-driven match
    #[arg(long, default_value_t = 300)]
    target_score: i32,
    /// Per-player time budget in seconds (timed mode)
    #[arg(long, default_value_t = 10)]
    time_limit: u64,
    /// Play against the computer instead of hot-seat
    #[arg(long)]
    bot: bool,
    /// Bot strength: easy, medium or hard
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            winning_length: 5,
            target_score: 300,
            time_limit: 10,
            bot: false,
            difficulty: Difficulty::Medium,
        }
    }
}

impl PlayArg {
    fn config(&self) -> SessionConfig {
        SessionConfig {
            mode: self.mode,
            winning_length: self.winning_length,
            target_score: self.target_score,
            time_limit: Duration::from_secs(self.time_limit),
        }
    }
}

pub fn run(arg: &PlayArg) -> anyhow::Result<()> {
    if arg.bot {
        run_against_bot(arg)
    } else {
        run_hot_seat(arg)
    }
}

fn run_hot_seat(arg: &PlayArg) -> anyhow::Result<()> {
    let mut game = GameSession::new(arg.config())?;
    println!("Hot-seat match, {} mode. Enter moves as 'x y', or 'q' to quit.", game.mode());

    loop {
        if game.check_time() || game.is_over() {
            break;
        }
        print_session(&mut game);
        let Some(pos) = read_move(game.current_player())? else {
            println!("Match abandoned.");
            return Ok(());
        };
        apply_move(&mut game, pos);
    }

    print_session(&mut game);
    print_verdict(&game);
    Ok(())
}

fn run_against_bot(arg: &PlayArg) -> anyhow::Result<()> {
    let mut game = BotMatch::new(arg.config(), arg.difficulty)?;
    println!(
        "You play {} against the {:?} bot in {} mode. Enter moves as 'x y', or 'q' to quit.",
        game.bot_player().opponent(),
        game.difficulty(),
        game.session().mode(),
    );

    loop {
        if game.check_time() || game.session().is_over() {
            break;
        }
        if game.is_bot_turn() {
            match game.bot_move() {
                Ok((pos, _)) => println!("Bot plays {pos}."),
                Err(MoveError::NoMoveAvailable) => {
                    println!("The bot has no legal move; match abandoned.");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            }
            continue;
        }
        print_session(game.session_mut());
        let Some(pos) = read_move(game.session().current_player())? else {
            println!("Match abandoned.");
            return Ok(());
        };
        match game.play(pos) {
            Ok(_) => {}
            Err(err @ (MoveError::Occupied | MoveError::NotYourTurn)) => println!("{err}."),
            Err(err) => return Err(err.into()),
        }
    }

    print_session(game.session_mut());
    print_verdict(game.session());
    Ok(())
}

fn apply_move(game: &mut GameSession, pos: Position) {
    match game.play(pos) {
        Ok(outcome) => {
            if outcome.is_bonus_move() {
                println!("Bonus move! {} plays again.", game.current_player());
            }
        }
        Err(err @ MoveError::Occupied) => println!("{err}."),
        Err(err) => println!("Move rejected: {err}."),
    }
}

fn read_move(player: Player) -> anyhow::Result<Option<Position>> {
    loop {
        print!("{player}> ");
        io::stdout().flush().context("flushing prompt")?;
        let mut line = String::new();
        if io::stdin()
            .read_line(&mut line)
            .context("reading a move")?
            == 0
        {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match parse_move(line) {
            Some(pos) => return Ok(Some(pos)),
            None => println!("Could not parse {line:?}; enter two integers like '1 -2'."),
        }
    }
}

fn parse_move(line: &str) -> Option<Position> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(x, y))
}

fn print_session(game: &mut GameSession) {
    let bounds = game.board().bounds();
    println!();
    for y in bounds.min_y..=bounds.max_y {
        let row: String = (bounds.min_x..=bounds.max_x)
            .map(|x| game.board().get(Position::new(x, y)).as_char())
            .collect();
        println!("  {row}");
    }

    if game.mode().is_score_driven() {
        let totals = game.scores();
        println!(
            "Score: X={} O={} (target {})",
            totals[Player::X],
            totals[Player::O],
            game.target_score()
        );
    }
    if game.mode() == GameMode::RandomEvents {
        if let Some(event) = game.pending_event() {
            println!("Event on the next move: {event}");
        }
    }
    if game.mode() == GameMode::Timed {
        let x_left = game.time_remaining(Player::X);
        let o_left = game.time_remaining(Player::O);
        println!("Clocks: X={:.1}s O={:.1}s", x_left.as_secs_f64(), o_left.as_secs_f64());
    }
}

fn print_verdict(game: &GameSession) {
    match game.state() {
        SessionState::Playing => {}
        SessionState::Won { winner, reason } => match reason {
            WinReason::Line => {
                let line: Vec<_> = game.winning_line().iter().map(ToString::to_string).collect();
                println!(
                    "{winner} wins with {} in a row: {}",
                    game.config().winning_length,
                    line.join(" ")
                );
            }
            WinReason::Score => println!(
                "{winner} wins on points: {} (target {})",
                game.scores()[winner],
                game.target_score()
            ),
            WinReason::Time => println!("{winner} wins on time."),
        },
    }
}
