//! Game structure.

use std::fmt::{self, Display};
use std::sync::Arc;

use tracing::info;

use crate::coretypes::{Color, Move};
use crate::error::{self, ErrorKind};
use crate::movelist::MoveList;
use crate::position::Position;
use crate::search::History;
use crate::zobrist::ZobristTable;

/// A move that was applied to a game, along with the positions around it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MoveRecord {
    pub move_: Move,
    pub before: Position,
    pub after: Position,
    pub player: Color,
}

/// Ordered log of applied moves, with a redo stack of undone moves.
/// Applying a fresh move clears the redo stack.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct GameHistory {
    records: Vec<MoveRecord>,
    undone: Vec<MoveRecord>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of undone moves that can be redone.
    pub fn redo_len(&self) -> usize {
        self.undone.len()
    }

    /// Appends a newly played move. Anything undone is forgotten.
    fn push(&mut self, record: MoveRecord) {
        self.undone.clear();
        self.records.push(record);
    }

    /// Moves the most recent record onto the redo stack.
    fn undo(&mut self) -> Option<&MoveRecord> {
        let record = self.records.pop()?;
        self.undone.push(record);
        self.undone.last()
    }

    /// Moves the most recently undone record back onto the log.
    fn redo(&mut self) -> Option<&MoveRecord> {
        let record = self.undone.pop()?;
        self.records.push(record);
        self.records.last()
    }

    /// The moves played, in order.
    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.records.iter().map(|record| &record.move_)
    }
}

/// Result of a game so far.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GameStatus {
    Ongoing,
    BlackWins,
    RedWins,
    Draw,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// The winning color, if the game was won.
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameStatus::BlackWins => Some(Color::Black),
            GameStatus::RedWins => Some(Color::Red),
            GameStatus::Ongoing | GameStatus::Draw => None,
        }
    }

    fn won_by(color: Color) -> Self {
        match color {
            Color::Black => GameStatus::BlackWins,
            Color::Red => GameStatus::RedWins,
        }
    }
}

impl Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::BlackWins => f.write_str("Black wins"),
            GameStatus::RedWins => f.write_str("Red wins"),
            GameStatus::Draw => f.write_str("draw"),
        }
    }
}

/// Game contains information for an in progress game:
/// The base position the game started from, the record of moves that were
/// played, and the current position.
///
/// Hashes of every earlier position are kept for draw by repetition,
/// and are handed to the search so it avoids or seeks repetitions.
#[derive(Debug, Clone)]
pub struct Game {
    base_position: Position,
    position: Position,
    history: GameHistory,
    repetitions: History,
    ztable: Arc<ZobristTable>,
    status: GameStatus,
}

impl Game {
    /// Create a new Game from a base position, with no moves played.
    pub fn new(base_position: Position) -> Self {
        Self::with_ztable(base_position, Arc::new(ZobristTable::new()))
    }

    /// Create a new Game which hashes positions with the given table.
    pub fn with_ztable(base_position: Position, ztable: Arc<ZobristTable>) -> Self {
        let mut game = Self {
            base_position,
            position: base_position,
            history: GameHistory::new(),
            repetitions: History::empty(),
            ztable,
            status: GameStatus::Ongoing,
        };
        game.status = game.compute_status();
        game
    }

    /// Create a new game from a base position and a sequence of moves.
    /// If a move in the sequence was illegal, Err is returned.
    pub fn replay<'a, I>(base_position: Position, moves: I) -> error::Result<Self>
    where
        I: IntoIterator<Item = &'a Move>,
    {
        let mut game = Self::new(base_position);
        for move_ in moves {
            game.apply_move(move_.clone())?;
        }
        Ok(game)
    }

    /// Create a new game in the standard checkers start position.
    pub fn start_position() -> Self {
        Self::from(Position::start_position())
    }

    // Immutable Getters
    pub fn base_position(&self) -> &Position {
        &self.base_position
    }
    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn history(&self) -> &GameHistory {
        &self.history
    }
    pub fn status(&self) -> GameStatus {
        self.status
    }
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }
    pub fn repetitions(&self) -> &History {
        &self.repetitions
    }
    pub fn ztable(&self) -> &Arc<ZobristTable> {
        &self.ztable
    }

    /// Legal moves of the current position. Empty once the game is over.
    pub fn legal_moves(&self) -> MoveList {
        match self.status {
            GameStatus::Ongoing => self.position.get_legal_moves(),
            _ => MoveList::new(),
        }
    }

    /// Validate and apply a move to the current position, appending it to history.
    /// Nothing is changed on error.
    pub fn apply_move(&mut self, move_: Move) -> error::Result<&MoveRecord> {
        if self.status.is_over() {
            return Err((ErrorKind::GameOver, self.status.to_string()).into());
        }
        let before = self.position;
        let mut after = before;
        after.do_legal_move(&move_)?;

        let hash = self.ztable.generate_hash(&before);
        self.repetitions.push(hash, after.quiet_plies() == 0);
        self.position = after;
        self.history.push(MoveRecord {
            move_,
            before,
            after,
            player: before.side_to_move(),
        });

        self.status = self.compute_status();
        if self.status.is_over() {
            info!(status = %self.status, plies = self.history.len(), "game over");
        }

        self.history
            .last()
            .ok_or_else(|| ErrorKind::NoHistory.into())
    }

    /// Take back the most recent move, restoring the position before it.
    pub fn undo(&mut self) -> error::Result<MoveRecord> {
        let record = self.history.undo().cloned().ok_or(ErrorKind::NoHistory)?;
        self.position = record.before;
        self.repetitions.pop();
        self.status = self.compute_status();
        Ok(record)
    }

    /// Re-apply the most recently undone move.
    pub fn redo(&mut self) -> error::Result<MoveRecord> {
        let record = self.history.redo().cloned().ok_or(ErrorKind::NoRedo)?;
        let hash = self.ztable.generate_hash(&record.before);
        self.repetitions.push(hash, record.after.quiet_plies() == 0);
        self.position = record.after;
        self.status = self.compute_status();
        Ok(record)
    }

    /// The game is lost by the side to move when it has no moves,
    /// and drawn by the quiet move limit or by a third repetition.
    fn compute_status(&self) -> GameStatus {
        if self.position.is_terminal() {
            GameStatus::won_by(!self.position.side_to_move())
        } else if self.position.is_quiet_draw() {
            GameStatus::Draw
        } else if self
            .repetitions
            .is_threefold_repetition(self.ztable.generate_hash(&self.position))
        {
            GameStatus::Draw
        } else {
            GameStatus::Ongoing
        }
    }
}

/// Convert a position to a Game with no past moves.
impl From<Position> for Game {
    fn from(position: Position) -> Self {
        Self::new(position)
    }
}
