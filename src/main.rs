//! Terminal checkers against the engine.

use std::io::{self, Write};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use checkers_engine::coretypes::Color;
use checkers_engine::error::ErrorKind;
use checkers_engine::evaluation::{evaluate, Weights};
use checkers_engine::movelist::display;
use checkers_engine::rules::{CaptureRemoval, Rules};
use checkers_engine::{Controller, Difficulty, GameConfig, Mode, MoveRequest, PlayerKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Side {
    Black,
    Red,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Color::Black,
            Side::Red => Color::Red,
        }
    }
}

/// Play English draughts in the terminal.
#[derive(Debug, Parser)]
#[command(name = "checkers", version, about)]
struct Cli {
    /// Strength of the computer opponent.
    #[arg(short, long, value_enum, default_value_t = Level::Medium)]
    difficulty: Level,

    /// Side played by the human.
    #[arg(long, value_enum, default_value_t = Side::Black)]
    human: Side,

    /// Side that moves first.
    #[arg(long, value_enum, default_value_t = Side::Black)]
    first: Side,

    /// Search depth in plies, overrides the difficulty.
    #[arg(long)]
    depth: Option<u8>,

    /// Search time in milliseconds, overrides the difficulty.
    #[arg(long)]
    movetime: Option<u64>,

    /// Captures are optional.
    #[arg(long)]
    no_forced_capture: bool,

    /// Men may capture backwards.
    #[arg(long)]
    backward_capture: bool,

    /// Jumped pieces stay on the board until the capture is finished.
    #[arg(long)]
    remove_after_chain: bool,

    /// A man crowned during a capture may keep jumping as a king.
    #[arg(long)]
    jump_after_promotion: bool,

    /// Plies without a capture or man move that draw the game, 0 to disable.
    #[arg(long, default_value_t = 80)]
    draw_plies: u16,

    /// Undos allowed per side.
    #[arg(long, default_value_t = 2)]
    undos: u8,

    /// Seed for the easy opponent.
    #[arg(long)]
    seed: Option<u64>,

    /// Let two computers play each other.
    #[arg(long)]
    self_play: bool,

    /// Log search progress.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn rules(&self) -> Rules {
        let removal = match self.remove_after_chain {
            true => CaptureRemoval::EndOfChain,
            false => CaptureRemoval::Immediate,
        };
        Rules::default()
            .forced_capture(!self.no_forced_capture)
            .man_backward_capture(self.backward_capture)
            .capture_removal(removal)
            .promotion_ends_move(!self.jump_after_promotion)
            .draw_quiet_plies(Some(self.draw_plies).filter(|plies| *plies > 0))
    }

    fn computer(&self) -> PlayerKind {
        let movetime = self.movetime.map(Duration::from_millis);
        match (self.depth, movetime) {
            (Some(depth), movetime) => PlayerKind::Engine(Mode::depth(depth, movetime)),
            (None, Some(movetime)) => PlayerKind::Engine(Mode::movetime(movetime, None)),
            (None, None) => PlayerKind::Computer(self.difficulty.into()),
        }
    }

    fn config(&self) -> GameConfig {
        let human: Color = self.human.into();
        let computer = self.computer();
        let (black, red) = match (self.self_play, human) {
            (true, _) => (computer, computer),
            (false, Color::Black) => (PlayerKind::Human, computer),
            (false, Color::Red) => (computer, PlayerKind::Human),
        };
        GameConfig::new()
            .first(self.first.into())
            .black(black)
            .red(red)
            .weights(Weights::default())
            .rules(self.rules())
            .undo_allowance(Some(self.undos))
            .seed(self.seed)
    }
}

enum InputKind {
    Exit,
    Newgame,
    Help,
    Moves,
    Undo,
    Redo,
    Empty,
    GameMove(String),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "exit" | "quit" => Self::Exit,
            "newgame" | "ng" => Self::Newgame,
            "help" => Self::Help,
            "moves" => Self::Moves,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "" => Self::Empty,
            text => Self::GameMove(text.to_string()),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("newgame | ng => Begin a new game.");
    println!("moves => List the legal moves.");
    println!("undo => Take back your last move.");
    println!("redo => Replay a move that was taken back.");
    println!("help => Print this help text.");
    println!("exit => End the game.");
    println!("\nTo make a move, enter the squares it passes through.");
    println!("Examples: 11-15 steps from 11 to 15, 22x15x8 is a double jump.");
    println!("A capture may be written from-to when only one chain fits.");
}

fn print_board(controller: &Controller) {
    let position = controller.game().position();
    let score = evaluate(position, Color::Black, &controller.config().weights);
    println!("\n{position}");
    println!("Static evaluation (Black): {score}");
}

/// Let the computer side to move play. Returns false if no move was played.
fn computer_turn(controller: &mut Controller) -> bool {
    let move_ = match controller.request_move() {
        Ok(MoveRequest::Ready(move_)) => move_,
        Ok(MoveRequest::Pending(pending)) => {
            println!("thinking...");
            match pending.wait() {
                Ok(result) => {
                    println!(
                        "{} searched depth {} score {} pv {}",
                        result.player,
                        result.depth,
                        result.score,
                        display(&result.pv)
                    );
                    result.best_move
                }
                Err(err) => {
                    warn!(%err, "computer move failed");
                    return false;
                }
            }
        }
        Ok(MoveRequest::AwaitingInput) | Ok(MoveRequest::NoLegalMove) => return false,
        Err(err) => {
            warn!(%err, "computer move failed");
            return false;
        }
    };

    match controller.apply_move(move_) {
        Ok(record) => {
            println!("{} played {}.", record.player, record.move_);
            true
        }
        Err(err) => {
            println!("{err}");
            false
        }
    }
}

fn human_move(controller: &mut Controller, text: &str) {
    let parsed = controller.game().position().parse_move(text);
    let result = parsed
        .and_then(|move_| controller.submit_human_move(move_))
        .and_then(|_| match controller.request_move()? {
            MoveRequest::Ready(move_) => controller.apply_move(move_).map(|_| ()),
            _ => Err(ErrorKind::AwaitingInput.into()),
        });
    if let Err(err) = result {
        println!("{err}. No action taken.");
    }
}

fn self_play(controller: &mut Controller) {
    print_board(controller);
    while !controller.status().is_over() && computer_turn(controller) {
        print_board(controller);
    }
    println!("\nResult: {}.", controller.status());
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        true => EnvFilter::new("debug"),
        false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    println!("Checkers {}\n", env!("CARGO_PKG_VERSION"));
    let mut controller = Controller::new(cli.config());
    if cli.self_play {
        self_play(&mut controller);
        return Ok(());
    }
    print_help();

    let mut input = String::new();
    loop {
        if controller.status().is_over() {
            print_board(&controller);
            println!("\nResult: {}. Type newgame to play again or exit.", controller.status());
        } else if !controller.is_human_turn() {
            print_board(&controller);
            if computer_turn(&mut controller) {
                continue;
            }
        } else {
            print_board(&controller);
        }

        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match InputKind::from(input.as_str()) {
            InputKind::Exit => break,
            InputKind::Newgame => {
                println!("Starting new game...");
                controller.new_game(cli.config());
            }
            InputKind::Help => print_help(),
            InputKind::Moves => {
                let moves: Vec<String> = controller
                    .legal_moves()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("Legal moves: {}", moves.join(" "));
            }
            InputKind::Undo => match controller.undo() {
                Ok(()) => println!("Move taken back."),
                Err(err) => println!("{err}"),
            },
            InputKind::Redo => match controller.redo() {
                Ok(record) => println!("Replayed {}.", record.move_),
                Err(err) => println!("{err}"),
            },
            InputKind::Empty => (),
            InputKind::GameMove(text) => {
                if controller.status().is_over() {
                    println!("The game is over. Type newgame to play again.");
                } else {
                    human_move(&mut controller, &text);
                }
            }
        }
    }
    Ok(())
}
