//! Negamax implementation of Minimax with Alpha-Beta pruning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::coretypes::{Move, PlyKind, Score, ScoreKind};
use crate::evaluation::{evaluate, Weights};
use crate::movelist::Line;
use crate::moveorder::order_all_moves;
use crate::position::Position;
use crate::search::History;
use crate::timeman::Mode;
use crate::zobrist::{HashKind, ZobristTable};

/// Number of nodes between deadline checks.
const DEADLINE_INTERVAL: u64 = 512;

/// Reason a search ended before finishing its iteration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Abort {
    /// The stopper was set from outside the search.
    Stopped,
    /// The time budget of the search mode ran out.
    OutOfTime,
}

/// Everything a single negamax call tree shares. A new one is made per search,
/// and carries its node count and repetition history across iterations.
pub(crate) struct AlphaBeta<'a> {
    pub(crate) weights: Weights,
    pub(crate) ztable: &'a ZobristTable,
    pub(crate) history: History,
    pub(crate) stopper: &'a AtomicBool,
    pub(crate) mode: Mode,
    pub(crate) start_time: Instant,
    /// Deadline is only checked after the first iteration completes,
    /// so every search returns at least a depth 1 move.
    pub(crate) check_deadline: bool,
    pub(crate) nodes: u64,
}

impl<'a> AlphaBeta<'a> {
    /// Search `position` to `depth` plies. On success returns the score relative to the
    /// player to move and fills `pv` with the principal variation.
    /// `key_move` is searched first at the root.
    pub(crate) fn search_root(
        &mut self,
        position: &Position,
        depth: PlyKind,
        key_move: Option<&Move>,
        pv: &mut Line,
    ) -> Result<Score, Abort> {
        debug_assert_ne!(depth, 0);
        let hash = self.ztable.generate_hash(position);
        self.negamax_impl(position, hash, key_move, pv, 0, depth, Score::MIN, Score::MAX)
    }

    /// Returns the reason to abandon the search, if any.
    /// The stopper is read at every node, the clock only every DEADLINE_INTERVAL nodes.
    fn should_abort(&self) -> Option<Abort> {
        if self.stopper.load(Ordering::Relaxed) {
            return Some(Abort::Stopped);
        }
        if self.check_deadline
            && self.nodes % DEADLINE_INTERVAL == 0
            && self.mode.out_of_time(self.start_time)
        {
            return Some(Abort::OutOfTime);
        }
        None
    }

    /// The player whose turn it is to move for a position is always treated as the maxing player.
    /// negamax_impl returns the max possible score of the current maxing player.
    /// Therefore, when interpreting the score of a child node, the score needs to be negated.
    ///
    /// negamax_impl stores the principal variation of the current move into the pv parameter.
    ///
    /// Parameters:
    ///
    /// position: current position to search.
    /// hash: Zobrist hash of provided position.
    /// key_move: move to order first, only given at the root.
    /// pv: Line of moves in principal variation.
    /// ply: distance from the root.
    /// depth: remaining depth to search to.
    /// alpha: Best (greatest) guaranteed value for current player.
    /// beta: Best (lowest) guaranteed value for opposite player.
    #[allow(clippy::too_many_arguments)]
    fn negamax_impl(
        &mut self,
        position: &Position,
        hash: HashKind,
        key_move: Option<&Move>,
        pv: &mut Line,
        ply: PlyKind,
        depth: PlyKind,
        mut alpha: Score,
        beta: Score,
    ) -> Result<Score, Abort> {
        self.nodes += 1;
        if let Some(abort) = self.should_abort() {
            return Err(abort);
        }

        // A terminal node has no best move, so the parent of this node receives an empty pv.
        pv.clear();

        // Repeating a position on the game or search path, or running out of quiet plies, is a draw.
        if ply > 0 && (self.history.contains(hash) || position.is_quiet_draw()) {
            return Ok(Score::DRAW);
        }

        let legal_moves = position.get_legal_moves();
        if legal_moves.is_empty() {
            // Side to move has lost. Losing later is better than losing now.
            return Ok(-Score::WIN + Score(ply as ScoreKind));
        }
        if depth == 0 {
            return Ok(evaluate(position, position.side_to_move, &self.weights));
        }

        // Move Ordering
        // Sort legal moves with estimated best move first.
        let ordered_legal_moves = order_all_moves(legal_moves, key_move);

        let mut local_pv = Line::new();
        let mut best_score = Score::MIN;

        for legal_move in ordered_legal_moves {
            let child = position.apply_move(&legal_move);
            let mut child_hash = hash;
            self.ztable.update_hash(&mut child_hash, position, &legal_move);

            // Positions before an irreversible move can never be reached again.
            self.history.push(hash, child.quiet_plies == 0);
            let result = self.negamax_impl(
                &child,
                child_hash,
                None,
                &mut local_pv,
                ply + 1,
                depth - 1,
                -beta,
                -alpha,
            );
            self.history.pop();
            let move_score = -result?;

            // Only a strictly better move replaces the best, so ties go to the earlier move.
            if move_score > best_score {
                best_score = move_score;
                pv.clear();
                pv.push(legal_move);
                pv.extend(local_pv.iter().cloned());
            }

            alpha = alpha.max(best_score);
            if alpha >= beta {
                break;
            }
        }

        Ok(best_score)
    }
}
