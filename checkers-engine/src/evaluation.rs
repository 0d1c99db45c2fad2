//! Evaluation functions that return a Score.
//!
//! Scores are relative: a positive value is an advantage for the color
//! the position is evaluated for.

use crate::coretypes::{Color, PieceKind, Score, ScoreKind};
use crate::movegen as mg;
use crate::position::Position;

/// Heuristic weights of the evaluator. Every term is in the same unit as `man`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Weights {
    pub man: ScoreKind,
    pub king: ScoreKind,
    /// Bonus per row a man has advanced from its back row.
    pub advancement: ScoreKind,
    /// Bonus for any piece on the central 4x4 block.
    pub center: ScoreKind,
    /// Penalty per man still on its own back row in the endgame.
    pub back_row_late: ScoreKind,
    /// Total piece count at or below which the endgame terms apply.
    pub endgame_pieces: usize,
    /// Bonus per legal move. Costs a move generation per evaluation, 0 disables it.
    pub mobility: ScoreKind,
}

impl Weights {
    pub const DEFAULT: Weights = Weights {
        man: 100,
        king: 160,
        advancement: 4,
        center: 6,
        back_row_late: 10,
        endgame_pieces: 8,
        mobility: 0,
    };

    /// Material only.
    pub const MATERIAL: Weights = Weights {
        man: 100,
        king: 160,
        advancement: 0,
        center: 0,
        back_row_late: 0,
        endgame_pieces: 0,
        mobility: 0,
    };

    const fn piece_value(&self, piece_kind: PieceKind) -> ScoreKind {
        match piece_kind {
            PieceKind::Man => self.man,
            PieceKind::King => self.king,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Primary evaluate function for engine.
/// Scores `position` from the point of view of `color`, higher is better.
/// Symmetric in color: `evaluate(p, Black, w) == -evaluate(p, Red, w)`.
pub fn evaluate(position: &Position, color: Color, weights: &Weights) -> Score {
    let absolute =
        side_score(position, Color::Black, weights) - side_score(position, Color::Red, weights);
    match color {
        Color::Black => absolute,
        Color::Red => -absolute,
    }
}

/// Score of one side's pieces, independent of the other side.
fn side_score(position: &Position, color: Color, weights: &Weights) -> Score {
    material(position, color, weights)
        + positional(position, color, weights)
        + mobility(position, color, weights)
}

/// Sum of piece values of `color`.
pub fn material(position: &Position, color: Color, weights: &Weights) -> Score {
    let total = position
        .pieces(color)
        .map(|(_, piece)| weights.piece_value(piece.piece_kind))
        .sum();
    Score(total)
}

/// Advancement and center control, minus stranded back row men late in the game.
pub fn positional(position: &Position, color: Color, weights: &Weights) -> Score {
    let endgame = position.total() <= weights.endgame_pieces;
    let back_row = color.back_row();

    let mut total: ScoreKind = 0;
    for (square, piece) in position.pieces(color) {
        if square.is_central() {
            total += weights.center;
        }
        if piece.piece_kind == PieceKind::Man {
            let advanced = (square.row() as ScoreKind - back_row as ScoreKind).abs();
            total += advanced * weights.advancement;
            if endgame && square.row() == back_row {
                total -= weights.back_row_late;
            }
        }
    }
    Score(total)
}

/// Legal move count of `color` as a bonus, when enabled.
pub fn mobility(position: &Position, color: Color, weights: &Weights) -> Score {
    if weights.mobility == 0 {
        return Score::DRAW;
    }
    Score(mg::count_moves(position, color) as ScoreKind) * weights.mobility
}
