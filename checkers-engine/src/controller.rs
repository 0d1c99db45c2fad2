//! Controller runs a game between two players.
//!
//! It owns the Game and both Players, validates every move before it is applied,
//! and keeps track of how many undos each side has used.

use tracing::{debug, info};

use crate::coretypes::{Color, Move, Square};
use crate::error::{self, ErrorKind};
use crate::evaluation::Weights;
use crate::game::{Game, GameStatus, MoveRecord};
use crate::movelist::MoveList;
use crate::player::{ComputerPlayer, Difficulty, HumanPlayer, MoveRequest, Player};
use crate::position::Position;
use crate::rules::Rules;
use crate::timeman::Mode;

/// Who plays one side of a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlayerKind {
    Human,
    Computer(Difficulty),
    /// A searching computer with an explicit search mode.
    Engine(Mode),
}

impl PlayerKind {
    pub fn is_human(&self) -> bool {
        matches!(self, PlayerKind::Human)
    }
}

/// Settings of a new game.
///
/// Default values:
///
/// * `first`: Black
/// * `black`: Human
/// * `red`: Computer(Medium)
/// * `weights`: Weights::DEFAULT
/// * `rules`: Rules::STANDARD
/// * `undo_allowance`: 2 per side
/// * `seed`: None
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GameConfig {
    /// Side that makes the first move.
    pub first: Color,
    pub black: PlayerKind,
    pub red: PlayerKind,
    pub weights: Weights,
    pub rules: Rules,
    /// Undos each side may request, None for unlimited.
    pub undo_allowance: Option<u8>,
    /// Seed of the random player, None seeds from entropy.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            first: Color::Black,
            black: PlayerKind::Human,
            red: PlayerKind::Computer(Difficulty::default()),
            weights: Weights::default(),
            rules: Rules::default(),
            undo_allowance: Some(2),
            seed: None,
        }
    }

    pub fn first(mut self, first: Color) -> Self {
        self.first = first;
        self
    }

    pub fn black(mut self, black: PlayerKind) -> Self {
        self.black = black;
        self
    }

    pub fn red(mut self, red: PlayerKind) -> Self {
        self.red = red;
        self
    }

    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn undo_allowance(mut self, undo_allowance: Option<u8>) -> Self {
        self.undo_allowance = undo_allowance;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// The position a game with this config starts from.
    pub fn start_position(&self) -> Position {
        Position::start_position()
            .with_rules(self.rules)
            .with_side_to_move(self.first)
    }

    /// Kind of player for the given side.
    pub fn player_kind(&self, color: Color) -> PlayerKind {
        match color {
            Color::Black => self.black,
            Color::Red => self.red,
        }
    }

    fn make_player(&self, color: Color) -> Box<dyn Player> {
        match self.player_kind(color) {
            PlayerKind::Human => Box::new(HumanPlayer::new()),
            PlayerKind::Computer(difficulty) => difficulty.player(self.weights, self.seed),
            PlayerKind::Engine(mode) => Box::new(ComputerPlayer::new(mode, self.weights)),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a game. The presentation layer reads the game through `game()`,
/// and changes it only through the Controller's methods.
pub struct Controller {
    config: GameConfig,
    game: Game,
    black: Box<dyn Player>,
    red: Box<dyn Player>,
    undos_used: [u8; 2],
}

impl Controller {
    /// Start a new game with the given config.
    pub fn new(config: GameConfig) -> Self {
        let game = Game::from(config.start_position());
        info!(first = %config.first, black = ?config.black, red = ?config.red, "new game");
        Self {
            black: config.make_player(Color::Black),
            red: config.make_player(Color::Red),
            config,
            game,
            undos_used: [0; 2],
        }
    }

    /// Abandon the current game and start a new one.
    pub fn new_game(&mut self, config: GameConfig) {
        self.cancel();
        *self = Self::new(config);
    }

    // Immutable Getters
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn status(&self) -> GameStatus {
        self.game.status()
    }
    pub fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }

    /// Returns true if the side to move is played by a human.
    pub fn is_human_turn(&self) -> bool {
        self.player(self.side_to_move()).is_human()
    }

    /// Undos the side may still request, None if unlimited.
    pub fn undos_left(&self, color: Color) -> Option<u8> {
        self.config
            .undo_allowance
            .map(|allowance| allowance.saturating_sub(self.undos_used[color_idx(color)]))
    }

    pub fn legal_moves(&self) -> MoveList {
        self.game.legal_moves()
    }

    /// Squares the piece on `from` may finish a legal move on.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        if self.status().is_over() {
            return Vec::new();
        }
        let mut destinations: Vec<Square> = self
            .game
            .position()
            .legal_moves_from(from)
            .iter()
            .map(Move::to)
            .collect();
        destinations.sort();
        destinations.dedup();
        destinations
    }

    /// Ask the side to move for its move.
    pub fn request_move(&mut self) -> error::Result<MoveRequest> {
        if self.status().is_over() {
            return Ok(MoveRequest::NoLegalMove);
        }
        let color = self.side_to_move();
        let game = &self.game;
        let player = match color {
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
        };
        player.next_move(game)
    }

    /// Hand a move to the human side to move, to be returned by the next `request_move`.
    pub fn submit_human_move(&mut self, move_: Move) -> error::Result<()> {
        if self.status().is_over() {
            return Err((ErrorKind::GameOver, self.status().to_string()).into());
        }
        let color = self.side_to_move();
        let position = *self.game.position();
        let player = self.player_mut(color);
        if !player.is_human() {
            return Err((ErrorKind::IllegalMove, format!("{color} is not played by a human")).into());
        }
        player.submit(move_, &position)
    }

    /// Validate and play a move for the side to move.
    pub fn apply_move(&mut self, move_: Move) -> error::Result<&MoveRecord> {
        self.game.apply_move(move_)
    }

    /// Take back moves, charged to the requesting side's allowance.
    ///
    /// The requester is the side that moved last when a human plays it,
    /// otherwise the side to move. Against a computer the game returns to the
    /// human's previous turn, two plies when the human is to move. Between two
    /// humans exactly one ply is taken back, so the requester gets their own
    /// move back. A finished game may still be undone, which resumes it.
    /// Nothing changes unless every ply can be taken back.
    pub fn undo(&mut self) -> error::Result<()> {
        if self.game.history().is_empty() {
            return Err(ErrorKind::NoHistory.into());
        }

        let requester = self.undo_requester();
        if self.undos_left(requester) == Some(0) {
            return Err((ErrorKind::NoUndosLeft, format!("{requester} has no undos left")).into());
        }

        let against_computer = !self.player(!requester).is_human();
        let plies = match against_computer && self.side_to_move() == requester {
            true => 2,
            false => 1,
        };
        if plies > self.game.history().len() {
            return Err((ErrorKind::NoHistory, "no earlier turn to return to").into());
        }

        self.cancel();
        for _ in 0..plies {
            self.game.undo()?;
        }
        let used = &mut self.undos_used[color_idx(requester)];
        *used = used.saturating_add(1);
        debug!(%requester, plies, "undo");
        Ok(())
    }

    /// Replay the most recently undone ply.
    pub fn redo(&mut self) -> error::Result<&MoveRecord> {
        self.cancel();
        self.game.redo()?;
        self.game
            .history()
            .last()
            .ok_or_else(|| ErrorKind::NoHistory.into())
    }

    /// Request a move and wait for it, then apply it.
    ///
    /// # Errors
    /// * `AwaitingInput` if the side to move is human and has not submitted a move.
    /// * `GameOver` once the game has ended.
    pub fn play_turn(&mut self) -> error::Result<&MoveRecord> {
        let move_ = match self.request_move()? {
            MoveRequest::Ready(move_) => move_,
            MoveRequest::Pending(pending) => pending.wait()?.best_move,
            MoveRequest::AwaitingInput => return Err(ErrorKind::AwaitingInput.into()),
            MoveRequest::NoLegalMove => {
                return Err((ErrorKind::GameOver, self.status().to_string()).into())
            }
        };
        self.apply_move(move_)
    }

    /// Stop any search in progress and forget submitted moves.
    pub fn cancel(&mut self) {
        self.black.cancel();
        self.red.cancel();
    }

    pub fn player(&self, color: Color) -> &dyn Player {
        match color {
            Color::Black => self.black.as_ref(),
            Color::Red => self.red.as_ref(),
        }
    }

    fn player_mut(&mut self, color: Color) -> &mut dyn Player {
        match color {
            Color::Black => self.black.as_mut(),
            Color::Red => self.red.as_mut(),
        }
    }

    /// The human side asking for an undo: the side that just moved if human,
    /// otherwise the side to move.
    fn undo_requester(&self) -> Color {
        match self.game.history().last() {
            Some(record) if self.player(record.player).is_human() => record.player,
            _ => self.side_to_move(),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn color_idx(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::Red => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human_vs_human() -> GameConfig {
        GameConfig::new().black(PlayerKind::Human).red(PlayerKind::Human)
    }

    fn submit(controller: &mut Controller, text: &str) {
        let move_ = controller.game().position().parse_move(text).unwrap();
        controller.submit_human_move(move_).unwrap();
        controller.play_turn().unwrap();
    }

    #[test]
    fn human_turns() {
        let mut controller = Controller::new(human_vs_human());
        assert!(controller.is_human_turn());
        assert_eq!(
            controller.play_turn().unwrap_err().kind(),
            ErrorKind::AwaitingInput
        );
        submit(&mut controller, "11-15");
        submit(&mut controller, "23-19");
        assert_eq!(controller.game().history().len(), 2);
        assert_eq!(controller.side_to_move(), Color::Black);
    }

    #[test]
    fn legal_destinations_of_a_piece() {
        let controller = Controller::new(human_vs_human());
        let from = Square::from_number(11).unwrap();
        let numbers: Vec<u8> = controller
            .legal_destinations(from)
            .iter()
            .map(Square::number)
            .collect();
        assert_eq!(numbers, vec![15, 16]);
        assert!(controller
            .legal_destinations(Square::from_number(1).unwrap())
            .is_empty());
    }

    #[test]
    fn first_side_is_configurable() {
        let controller = Controller::new(human_vs_human().first(Color::Red));
        assert_eq!(controller.side_to_move(), Color::Red);
    }

    #[test]
    fn undo_allowance_is_per_side() {
        let mut controller = Controller::new(human_vs_human().undo_allowance(Some(1)));
        assert_eq!(controller.undo().unwrap_err().kind(), ErrorKind::NoHistory);

        submit(&mut controller, "11-15");
        controller.undo().unwrap();
        assert_eq!(controller.undos_left(Color::Black), Some(0));

        submit(&mut controller, "11-15");
        assert_eq!(controller.undo().unwrap_err().kind(), ErrorKind::NoUndosLeft);
        submit(&mut controller, "23-19");
        controller.undo().unwrap();
        assert_eq!(controller.undos_left(Color::Red), Some(0));
        assert_eq!(controller.game().history().len(), 1);
    }

    #[test]
    fn undo_between_humans_takes_one_ply() {
        let mut controller = Controller::new(human_vs_human());
        submit(&mut controller, "11-15");
        submit(&mut controller, "23-19");

        controller.undo().unwrap();
        assert_eq!(controller.game().history().len(), 1);
        assert_eq!(controller.side_to_move(), Color::Red);
        assert_eq!(controller.undos_left(Color::Red), Some(1));
        assert_eq!(controller.undos_left(Color::Black), Some(2));
    }

    #[test]
    fn undo_against_computer_returns_to_human_turn() {
        let config = GameConfig::new()
            .black(PlayerKind::Human)
            .red(PlayerKind::Engine(Mode::depth(2, None)));
        let mut controller = Controller::new(config);
        submit(&mut controller, "11-15");
        controller.play_turn().unwrap();
        assert_eq!(controller.game().history().len(), 2);

        controller.undo().unwrap();
        assert!(controller.game().history().is_empty());
        assert_eq!(*controller.game().position(), Position::start_position());
        assert_eq!(controller.undos_left(Color::Black), Some(1));
    }

    #[test]
    fn submit_to_computer_side_fails() {
        let config = GameConfig::new().black(PlayerKind::Computer(Difficulty::Easy)).seed(Some(3));
        let mut controller = Controller::new(config);
        let move_ = controller.legal_moves()[0].clone();
        assert_eq!(
            controller.submit_human_move(move_).unwrap_err().kind(),
            ErrorKind::IllegalMove
        );
    }

    #[test]
    fn self_play_finishes() {
        let config = GameConfig::new()
            .black(PlayerKind::Computer(Difficulty::Easy))
            .red(PlayerKind::Computer(Difficulty::Easy))
            .seed(Some(7));
        let mut controller = Controller::new(config);
        while !controller.status().is_over() {
            controller.play_turn().unwrap();
        }
        assert_eq!(
            controller.play_turn().unwrap_err().kind(),
            ErrorKind::GameOver
        );
        assert!(controller.legal_moves().is_empty());
    }

    #[test]
    fn redo_after_undo() {
        let mut controller = Controller::new(human_vs_human());
        submit(&mut controller, "11-15");
        let after = *controller.game().position();
        controller.undo().unwrap();
        controller.redo().unwrap();
        assert_eq!(*controller.game().position(), after);
        assert_eq!(controller.redo().unwrap_err().kind(), ErrorKind::NoRedo);
    }
}
