//! Iterative Deepening Search.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use tracing::debug;

use crate::error::{self, ErrorKind};
use crate::evaluation::Weights;
use crate::movelist::{display, Line};
use crate::position::Position;
use crate::search::alpha_beta::{Abort, AlphaBeta};
use crate::search::{History, SearchResult};
use crate::timeman::Mode;
use crate::zobrist::ZobristTable;

/// Searches game tree using iterative deepening, from depth 1 up to the depth limit of `mode`.
/// The best move of each iteration is searched first in the next.
///
/// When the time budget runs out mid-iteration, the result of the deepest completed
/// iteration is returned with `stopped` set. Depth 1 always completes unless the stopper is set.
///
/// # Errors
/// * `NoLegalMove` if the root position has no legal moves.
/// * `SearchCancelled` if the stopper was set before the search finished.
#[allow(clippy::too_many_arguments)]
pub fn ids(
    position: Position,
    mode: Mode,
    weights: Weights,
    history: History,
    ztable: &ZobristTable,
    start_time: Instant,
    stopper: &AtomicBool,
) -> error::Result<SearchResult> {
    let player = position.side_to_move();
    if position.get_legal_moves().is_empty() {
        return Err((ErrorKind::NoLegalMove, format!("{player} has no legal move")).into());
    }

    let mut alpha_beta = AlphaBeta {
        weights,
        ztable,
        history,
        stopper,
        mode,
        start_time,
        check_deadline: false,
        nodes: 0,
    };

    let mut best: Option<SearchResult> = None;
    let mut stopped = false;

    for depth in 1..=mode.max_depth().max(1) {
        // Do not begin an iteration that has no time left to finish in.
        if depth > 1 && mode.stop(depth, start_time) {
            stopped = true;
            break;
        }

        let key_move = best.as_ref().map(|result| result.best_move.clone());
        let mut pv = Line::new();
        let outcome = alpha_beta.search_root(&position, depth, key_move.as_ref(), &mut pv);

        match outcome {
            Ok(score) => {
                let nodes = alpha_beta.nodes;
                let line = display(&pv);
                debug!(depth, %score, pv = %line, nodes, "iteration complete");
                let decisive = score.is_decisive();
                best = pv.first().cloned().map(|best_move| SearchResult {
                    best_move,
                    score,
                    pv,
                    player,
                    depth,
                    nodes: alpha_beta.nodes,
                    elapsed: start_time.elapsed(),
                    stopped: false,
                });
                alpha_beta.check_deadline = true;

                // A proven win or loss cannot change with more depth.
                if decisive {
                    break;
                }
            }
            Err(Abort::Stopped) => {
                debug!(depth, nodes = alpha_beta.nodes, "search cancelled");
                return Err(ErrorKind::SearchCancelled.into());
            }
            Err(Abort::OutOfTime) => {
                debug!(depth, nodes = alpha_beta.nodes, "out of time");
                stopped = true;
                break;
            }
        }
    }

    match best {
        Some(mut result) => {
            result.nodes = alpha_beta.nodes;
            result.elapsed = start_time.elapsed();
            result.stopped = stopped;
            Ok(result)
        }
        None => Err(ErrorKind::SearchCancelled.into()),
    }
}
