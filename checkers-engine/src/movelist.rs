//! MoveList types used in Checkers engine.
//!
//! The underlying type of MoveList may change at any time during
//! pre-1.0 development, so a MoveList type alias makes changes easy.

use std::fmt::Display;

use arrayvec::ArrayVec;

use crate::coretypes::{Move, MAX_LINE_LEN, MAX_MOVES};

/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any checkers position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;
/// Line is a sequence of legal moves that can be applied to a position. Useful for retaining a principal variation
/// found from a search.
pub type Line = ArrayVec<Move, MAX_LINE_LEN>;

/// Returns a string with the displayed string format of an ArrayVec.
/// Display cannot be implemented on external types.
pub fn display<T: Display, const CAP: usize>(arrayvec: &ArrayVec<T, CAP>) -> String {
    let mut displayed = String::new();
    for item in arrayvec.iter() {
        displayed.push_str(&item.to_string());
        displayed.push(' ');
    }
    displayed.pop();

    displayed
}
