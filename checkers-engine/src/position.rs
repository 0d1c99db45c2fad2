//! Holds Position struct, the most important data structure for the engine.
//! Position represents a checkers position.

use std::fmt::{self, Display};

use tracing::warn;

use crate::coretypes::{Color, Move, MoveCount, MoveNotation, Piece, PieceKind, Square};
use crate::coretypes::{NUM_COLS, NUM_ROWS, NUM_SQUARES};
use crate::error::{self, ErrorKind};
use crate::movegen as mg;
use crate::movelist::MoveList;
use crate::rules::Rules;

/// Contents of every playable square, indexed by Square index.
pub type Board = [Option<Piece>; NUM_SQUARES];

/// struct Position
/// A complete data set that can represent any checkers position.
/// # Members:
/// * board - contents of each of the 32 playable squares.
/// * side_to_move - Color of player whose turn it is.
/// * jumping - Set while the side to move is mid-chain and must keep jumping with the piece on this square.
/// * quiet_plies - Tracker for the quiet-move draw rule. Resets after a capture or man move.
/// * rules - Rule variant this position is played under.
///
/// Positions are values. Applying a move produces a new Position, and a caller
/// that applies a move in place owns the only copy.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) jumping: Option<Square>,
    pub(crate) quiet_plies: MoveCount,
    pub(crate) rules: Rules,
}

impl Position {
    /// Standard checkers start position: Black on 1-12, Red on 21-32, Black to move.
    pub fn start_position() -> Self {
        let mut position = Self::empty(Color::Black);
        for number in 1..=12 {
            position.board[number - 1] = Some(Piece::man(Color::Black));
        }
        for number in 21..=32 {
            position.board[number - 1] = Some(Piece::man(Color::Red));
        }
        position
    }

    /// A board with no pieces on it.
    pub fn empty(side_to_move: Color) -> Self {
        Self {
            board: [None; NUM_SQUARES],
            side_to_move,
            jumping: None,
            quiet_plies: 0,
            rules: Rules::default(),
        }
    }

    /// Returns this position played under different rules.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Returns this position with a different player to move.
    pub fn with_side_to_move(mut self, side_to_move: Color) -> Self {
        self.side_to_move = side_to_move;
        self.jumping = None;
        self
    }

    /// Returns this position mid-chain: the side to move must continue capturing
    /// with the piece on `jumper`.
    pub fn with_jumping(mut self, jumper: Square) -> Self {
        self.jumping = Some(jumper);
        self
    }

    /// Const getters.
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn jumping(&self) -> Option<Square> {
        self.jumping
    }
    pub fn quiet_plies(&self) -> MoveCount {
        self.quiet_plies
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.idx()]
    }

    pub fn has_piece(&self, square: Square) -> bool {
        self.board[square.idx()].is_some()
    }

    /// Place or clear a piece while setting up a position.
    /// A man placed on its promotion row is placed as a king.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.idx()] = piece.map(|mut piece| {
            if square.row() == piece.color.promotion_row() {
                piece.piece_kind = PieceKind::King;
            }
            piece
        });
    }

    /// Iterate over every piece of `color` in ascending square order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| match self.board[square.idx()] {
            Some(piece) if piece.color == color => Some((square, piece)),
            _ => None,
        })
    }

    /// Number of pieces `color` has on the board.
    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    /// Number of pieces of a single kind `color` has on the board.
    pub fn count_kind(&self, color: Color, piece_kind: PieceKind) -> usize {
        self.pieces(color)
            .filter(|(_, piece)| piece.piece_kind == piece_kind)
            .count()
    }

    /// Number of pieces on the board.
    pub fn total(&self) -> usize {
        self.board.iter().flatten().count()
    }

    /// Generates all legal moves for the player to move.
    pub fn get_legal_moves(&self) -> MoveList {
        mg::legal_moves(self)
    }

    /// Legal moves of the piece on `from`. Used to highlight destinations.
    pub fn legal_moves_from(&self, from: Square) -> MoveList {
        self.get_legal_moves()
            .into_iter()
            .filter(|move_| move_.from() == from)
            .collect()
    }

    /// Returns true if some legal move takes the piece on `from` to `to`.
    pub fn is_legal_destination(&self, from: Square, to: Square) -> bool {
        self.get_legal_moves()
            .iter()
            .any(|move_| move_.from() == from && move_.to() == to)
    }

    /// Checks if given move is legal for current position.
    pub fn is_legal_move(&self, move_: &Move) -> bool {
        self.get_legal_moves().contains(move_)
    }

    /// Returns true if the player to move has a capture available.
    pub fn has_capture(&self) -> bool {
        match self.jumping {
            Some(_) => !self.get_legal_moves().is_empty(),
            None => mg::has_capture(self),
        }
    }

    /// Returns true if the player to move has no legal move, and so has lost.
    /// Running out of moves is never a draw.
    pub fn is_terminal(&self) -> bool {
        self.get_legal_moves().is_empty()
    }

    /// The winner of a terminal position, None while moves remain.
    pub fn winner(&self) -> Option<Color> {
        match self.is_terminal() {
            true => Some(!self.side_to_move),
            false => None,
        }
    }

    /// Returns true if the quiet-move limit of the rules has been reached.
    pub fn is_quiet_draw(&self) -> bool {
        self.rules
            .draw_quiet_plies
            .map_or(false, |limit| self.quiet_plies >= limit)
    }

    /// Apply a move to self, in place.
    /// `do_move` does not check if the move is legal or not,
    /// it simply executes it while assuming legality.
    /// A man that lands on its promotion row is crowned as part of the move.
    pub fn do_move(&mut self, move_: &Move) {
        let maybe_piece = self.board[move_.from.idx()].take();
        debug_assert!(maybe_piece.is_some(), "no piece on {}", move_.from);

        if let Some(mut piece) = maybe_piece {
            for captured in move_.captures() {
                self.board[captured.idx()] = None;
            }

            // Captures and man moves are irreversible and reset the draw counter.
            if move_.is_capture() || piece.piece_kind == PieceKind::Man {
                self.quiet_plies = 0;
            } else {
                self.quiet_plies = self.quiet_plies.saturating_add(1);
            }

            if move_.promotion || move_.to.row() == piece.color.promotion_row() {
                piece.piece_kind = PieceKind::King;
            }
            self.board[move_.to.idx()] = Some(piece);
        }

        self.jumping = None;
        self.side_to_move = !self.side_to_move;
    }

    /// Generates a new Position from applying move on current Position.
    pub fn apply_move(&self, move_: &Move) -> Self {
        let mut position = *self;
        position.do_move(move_);
        position
    }

    /// Checks if move is legal before applying it. Nothing is changed on error.
    pub fn do_legal_move(&mut self, move_: &Move) -> error::Result<()> {
        if self.is_legal_move(move_) {
            self.do_move(move_);
            Ok(())
        } else {
            warn!(%move_, "rejected illegal move");
            Err((ErrorKind::IllegalMove, format!("{move_} is not legal")).into())
        }
    }

    /// Resolve move text such as `11-15` or `22x15x8` against the legal moves.
    pub fn parse_move(&self, text: &str) -> error::Result<Move> {
        let notation: MoveNotation = text.parse()?;
        let mut candidates = self
            .get_legal_moves()
            .into_iter()
            .filter(|move_| notation.matches(move_));

        match (candidates.next(), candidates.next()) {
            (Some(move_), None) => Ok(move_),
            (Some(_), Some(_)) => Err((
                ErrorKind::IllegalMove,
                format!("{} is ambiguous, give every landing square", text.trim()),
            )
                .into()),
            (None, _) => Err((ErrorKind::IllegalMove, format!("{} is not legal", text.trim())).into()),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Draws the board with row 0 on top, next to a key of square numbers.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..NUM_ROWS as i8 {
            let mut pieces = String::new();
            let mut numbers = String::new();
            for col in 0..NUM_COLS as i8 {
                match Square::from_row_col(row, col) {
                    Some(square) => {
                        let ch = self.piece_at(square).map_or('.', |piece| piece.to_char());
                        pieces.push_str(&format!(" {ch}"));
                        numbers.push_str(&format!("{:>3}", square.number()));
                    }
                    None => {
                        pieces.push_str("  ");
                        numbers.push_str("   ");
                    }
                }
            }
            writeln!(f, "{pieces}    {numbers}")?;
        }
        write!(f, "{} to move", self.side_to_move)
    }
}
