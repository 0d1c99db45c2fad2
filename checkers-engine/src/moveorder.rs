//! Move Ordering
//!
//! Functions used for ordering a list of moves from best to worst.
//!
//! Move ordering is important for alpha-beta pruning performance.
//! If the best or good moves are searched early on in an alpha-beta search,
//! pruning occurs more frequently.
//!
//! Moves are sorted first by the key move (the best move of a previous search),
//! then by number of pieces captured, then by promotion.
//! Moves with equal keys keep their generation order.

use std::cmp::Reverse;

use arrayvec::ArrayVec;

use crate::coretypes::{Move, MAX_MOVES};
use crate::movelist::MoveList;

/// Simple move ordering strategy. The following information is extracted from a move,
/// and used for sorting. The values go from most-to-least important based on
/// top-to-bottom declaration of fields.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Default)]
pub(crate) struct OrderStrategy {
    is_key_move: bool, // Best move of a previous iteration for this position.
    captures: usize,   // Longer chains win more material.
    promotion: bool,
}

impl From<(&Move, Option<&Move>)> for OrderStrategy {
    fn from((move_, key_move): (&Move, Option<&Move>)) -> Self {
        Self {
            is_key_move: key_move == Some(move_),
            captures: move_.num_captures(),
            promotion: move_.is_promotion(),
        }
    }
}

/// Order all moves in a container completely, from best to worst.
/// Sorting is stable, so equally ranked moves stay in generation order.
///
/// # Arguments
///
/// * `legal_moves`: List of all legal moves of current position.
/// * `maybe_key_move`: Move to search first, if present in the list.
pub fn order_all_moves(legal_moves: MoveList, maybe_key_move: Option<&Move>) -> MoveList {
    let mut ordering_vec: ArrayVec<(Move, OrderStrategy), MAX_MOVES> = legal_moves
        .into_iter()
        .map(|move_| {
            let strategy = OrderStrategy::from((&move_, maybe_key_move));
            (move_, strategy)
        })
        .collect();

    ordering_vec.sort_by_key(|pair| Reverse(pair.1));

    ordering_vec.into_iter().map(|pair| pair.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;
    use crate::Position;

    #[test]
    fn order_start_position_is_stable() {
        let position = Position::start_position();
        let legal_moves = position.get_legal_moves();
        let ordered = order_all_moves(legal_moves.clone(), None);
        assert_eq!(ordered, legal_moves);
    }

    #[test]
    fn key_move_first() {
        let position = Position::start_position();
        let legal_moves = position.get_legal_moves();
        let key_move = legal_moves[4].clone();
        let ordered = order_all_moves(legal_moves.clone(), Some(&key_move));

        assert_eq!(ordered[0], key_move);
        assert_eq!(ordered[1], legal_moves[0]);
        assert_eq!(ordered.len(), legal_moves.len());
    }

    #[test]
    fn longer_chains_first() {
        // Both captures are forced, the double jump sorts ahead of the single.
        let position = Position::parse_fen("B:B10,12:R14,16,23").unwrap();
        let legal_moves = position.get_legal_moves();
        assert_eq!(legal_moves.len(), 2);
        assert_eq!(legal_moves[0].to_string(), "10x17");

        let ordered = order_all_moves(legal_moves, None);
        assert_eq!(ordered[0].to_string(), "12x19x26");
        assert_eq!(ordered[1].to_string(), "10x17");
    }

    #[test]
    fn promotions_before_quiet_moves() {
        let position = Position::parse_fen("B:B25,9:R1").unwrap();
        let ordered = order_all_moves(position.get_legal_moves(), None);
        assert!(ordered[0].is_promotion());
        assert!(ordered[1].is_promotion());
        assert!(!ordered[2].is_promotion());
        assert_eq!(ordered[2].to_string(), "9-13");
    }

    #[test]
    fn order_strategy_cmp() {
        let os = OrderStrategy::default();
        let key = OrderStrategy {
            is_key_move: true,
            ..OrderStrategy::default()
        };
        let double = OrderStrategy {
            captures: 2,
            ..OrderStrategy::default()
        };
        let promotion = OrderStrategy {
            promotion: true,
            ..OrderStrategy::default()
        };

        assert!(key > double);
        assert!(double > promotion);
        assert!(promotion > os);
    }
}
