//! Players choose the next move of a game.
//!
//! A human player hands over moves submitted from outside, a computer player runs
//! a search on its engine's worker thread, and a random player picks any legal move.

use std::fmt::{self, Display};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use rand::prelude::*;
use tracing::{debug, warn};

use crate::coretypes::Move;
use crate::engine::{Engine, EngineBuilder};
use crate::error::{self, ErrorKind};
use crate::evaluation::Weights;
use crate::game::Game;
use crate::position::Position;
use crate::search::SearchResult;
use crate::timeman::Mode;

/// Answer of a player asked for its next move.
#[derive(Debug)]
pub enum MoveRequest {
    /// The move is known now.
    Ready(Move),
    /// A search is running, its result arrives through the PendingMove.
    Pending(PendingMove),
    /// A human player has not submitted a move yet.
    AwaitingInput,
    /// The side to move has no legal move, the game is over.
    NoLegalMove,
}

/// Handle to the result of a search running on another thread.
#[derive(Debug)]
pub struct PendingMove {
    receiver: Receiver<error::Result<SearchResult>>,
}

impl PendingMove {
    pub fn new(receiver: Receiver<error::Result<SearchResult>>) -> Self {
        Self { receiver }
    }

    /// Poll for the search result. Returns None while the search is still running.
    /// A search thread that went away without answering counts as cancelled.
    pub fn try_recv(&self) -> Option<error::Result<SearchResult>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ErrorKind::SearchCancelled.into())),
        }
    }

    /// Poll for the search result, blocking for at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<error::Result<SearchResult>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Some(Err(ErrorKind::SearchCancelled.into()))
            }
        }
    }

    /// Block until the search result arrives.
    pub fn wait(self) -> error::Result<SearchResult> {
        self.receiver
            .recv()
            .map_err(|_| error::Error::from(ErrorKind::SearchCancelled))?
    }
}

/// Something that picks moves for one side of a game.
pub trait Player: Send {
    /// Ask for the next move of the side to move in `game`.
    fn next_move(&mut self, game: &Game) -> error::Result<MoveRequest>;

    /// Hand a move to a player that waits for outside input.
    fn submit(&mut self, move_: Move, _position: &Position) -> error::Result<()> {
        Err((ErrorKind::IllegalMove, format!("{move_} was submitted to a computer player")).into())
    }

    /// Abandon any move in progress.
    fn cancel(&mut self) {}

    fn is_human(&self) -> bool {
        false
    }
}

/// Player whose moves come from outside, such as a terminal prompt.
#[derive(Debug, Clone, Default)]
pub struct HumanPlayer {
    submitted: Option<Move>,
}

impl HumanPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Player for HumanPlayer {
    fn next_move(&mut self, game: &Game) -> error::Result<MoveRequest> {
        if game.legal_moves().is_empty() {
            return Ok(MoveRequest::NoLegalMove);
        }
        match self.submitted.take() {
            Some(move_) if game.position().is_legal_move(&move_) => Ok(MoveRequest::Ready(move_)),
            Some(move_) => {
                debug!(%move_, "dropped stale submission");
                Ok(MoveRequest::AwaitingInput)
            }
            None => Ok(MoveRequest::AwaitingInput),
        }
    }

    /// Accepts the move only if it is legal in `position`.
    fn submit(&mut self, move_: Move, position: &Position) -> error::Result<()> {
        if position.is_legal_move(&move_) {
            self.submitted = Some(move_);
            Ok(())
        } else {
            warn!(%move_, "rejected illegal move");
            Err((ErrorKind::IllegalMove, format!("{move_} is not legal")).into())
        }
    }

    fn cancel(&mut self) {
        self.submitted = None;
    }

    fn is_human(&self) -> bool {
        true
    }
}

/// Player that searches for its moves with an Engine.
pub struct ComputerPlayer {
    engine: Engine,
    mode: Mode,
}

impl ComputerPlayer {
    pub fn new(mode: Mode, weights: Weights) -> Self {
        Self {
            engine: EngineBuilder::new().weights(weights).build(),
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Player for ComputerPlayer {
    /// Starts a search of the current game and returns at once.
    /// A search still running from an earlier request is stopped first.
    fn next_move(&mut self, game: &Game) -> error::Result<MoveRequest> {
        if game.legal_moves().is_empty() {
            return Ok(MoveRequest::NoLegalMove);
        }
        self.cancel();
        self.engine.set_game(game.clone());

        let (sender, receiver) = mpsc::channel();
        self.engine.search(self.mode, sender)?;
        Ok(MoveRequest::Pending(PendingMove::new(receiver)))
    }

    fn cancel(&mut self) {
        self.engine.stop();
        self.engine.wait();
    }
}

/// Player that picks uniformly among the legal moves.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A random player that plays the same moves for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn next_move(&mut self, game: &Game) -> error::Result<MoveRequest> {
        let legal_moves = game.legal_moves();
        Ok(match legal_moves.choose(&mut self.rng) {
            Some(move_) => MoveRequest::Ready(move_.clone()),
            None => MoveRequest::NoLegalMove,
        })
    }
}

/// Strength of a computer opponent.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Difficulty {
    /// Plays random legal moves.
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Search mode of the difficulty, None when it does not search.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Difficulty::Easy => None,
            Difficulty::Medium => Some(Mode::depth(4, Some(Duration::from_millis(200)))),
            Difficulty::Hard => Some(Mode::depth(6, Some(Duration::from_millis(350)))),
        }
    }

    /// Create a player of this difficulty. `seed` only affects the random player.
    pub fn player(&self, weights: Weights, seed: Option<u64>) -> Box<dyn Player> {
        match self.mode() {
            Some(mode) => Box::new(ComputerPlayer::new(mode, weights)),
            None => match seed {
                Some(seed) => Box::new(RandomPlayer::with_seed(seed)),
                None => Box::new(RandomPlayer::new()),
            },
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    #[test]
    fn human_hands_over_submitted_move_once() {
        let game = Game::start_position();
        let mut human = HumanPlayer::new();
        assert!(matches!(human.next_move(&game).unwrap(), MoveRequest::AwaitingInput));

        let move_ = game.position().parse_move("11-15").unwrap();
        human.submit(move_.clone(), game.position()).unwrap();
        match human.next_move(&game).unwrap() {
            MoveRequest::Ready(ready) => assert_eq!(ready, move_),
            other => panic!("expected a ready move, got {other:?}"),
        }
        assert!(matches!(human.next_move(&game).unwrap(), MoveRequest::AwaitingInput));
    }

    #[test]
    fn human_rejects_illegal_submission() {
        let game = Game::start_position();
        let mut human = HumanPlayer::new();
        let red_move = Position::start_position()
            .with_side_to_move(crate::coretypes::Color::Red)
            .parse_move("22-18")
            .unwrap();
        let error = human.submit(red_move, game.position()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IllegalMove);
        assert!(matches!(human.next_move(&game).unwrap(), MoveRequest::AwaitingInput));
    }

    #[test]
    fn computer_move_is_pending() {
        let game = Game::start_position();
        let mut computer = ComputerPlayer::new(Mode::depth(3, None), Weights::default());
        let pending = match computer.next_move(&game).unwrap() {
            MoveRequest::Pending(pending) => pending,
            other => panic!("expected a pending move, got {other:?}"),
        };
        let result = pending.wait().unwrap();
        assert!(game.position().is_legal_move(&result.best_move));
    }

    #[test]
    fn cancelled_computer_move() {
        let game = Game::start_position();
        let mut computer = ComputerPlayer::new(Mode::infinite(), Weights::default());
        let pending = match computer.next_move(&game).unwrap() {
            MoveRequest::Pending(pending) => pending,
            other => panic!("expected a pending move, got {other:?}"),
        };
        computer.cancel();
        assert_eq!(pending.wait().unwrap_err().kind(), ErrorKind::SearchCancelled);
    }

    #[test]
    fn random_player_is_seeded() {
        let game = Game::start_position();
        let mut first = RandomPlayer::with_seed(11);
        let mut second = RandomPlayer::with_seed(11);
        for _ in 0..5 {
            let (a, b) = match (first.next_move(&game).unwrap(), second.next_move(&game).unwrap()) {
                (MoveRequest::Ready(a), MoveRequest::Ready(b)) => (a, b),
                other => panic!("expected ready moves, got {other:?}"),
            };
            assert_eq!(a, b);
            assert!(game.position().is_legal_move(&a));
        }
    }

    #[test]
    fn no_legal_move_for_finished_game() {
        let game = Game::from(Position::parse_fen("B:B4:R8,11").unwrap());
        assert!(matches!(
            RandomPlayer::with_seed(0).next_move(&game).unwrap(),
            MoveRequest::NoLegalMove
        ));
        assert!(matches!(
            HumanPlayer::new().next_move(&game).unwrap(),
            MoveRequest::NoLegalMove
        ));
    }

    #[test]
    fn difficulty_modes() {
        assert_eq!(Difficulty::Easy.mode(), None);
        assert_eq!(
            Difficulty::Medium.mode(),
            Some(Mode::depth(4, Some(Duration::from_millis(200))))
        );
        assert_eq!(Difficulty::Hard.mode().map(|mode| mode.max_depth()), Some(6));
        assert!(!Difficulty::Hard.player(Weights::default(), None).is_human());
    }
}
