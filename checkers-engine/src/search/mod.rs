//! Search functions.

mod alpha_beta;
mod history;
mod ids;

pub use history::*;
pub use ids::*;

use std::fmt::{self, Display};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::coretypes::{Color, Move, PlyKind, Score};
use crate::error::{self, ErrorKind};
use crate::evaluation::Weights;
use crate::game::Game;
use crate::movelist::{display, Line};
use crate::timeman::Mode;
use crate::zobrist::ZobristTable;

/// The results found from running a search on some root position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchResult {
    /// The best move to make for a position discovered from search.
    pub best_move: Move,
    /// The score of making the best move, relative to the root player.
    pub score: Score,
    /// The principal variation, or a sequence of the best moves that result in an evaluation of at least `score`.
    pub pv: Line,
    /// The player to move for the root position that was searched.
    pub player: Color,
    /// Depth (aka ply, half move) in plies that was fully searched.
    pub depth: PlyKind,
    /// Total number of nodes visited in a search, over all iterations.
    pub nodes: u64,
    /// Total time elapsed from the start to the end of a search.
    pub elapsed: Duration,
    /// Flag that indicates the time budget ran out before the depth limit was reached.
    pub stopped: bool,
}

impl SearchResult {
    /// Get average nodes per second of search.
    pub fn nps(&self) -> f64 {
        (self.nodes as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON)).round()
    }

    /// Returns the color who is leading in the search of the root position, or None if even.
    pub fn leading(&self) -> Option<Color> {
        match self.score.signum() {
            1 => Some(self.player),
            -1 => Some(!self.player),
            _ => None,
        }
    }

    /// Returns the score from Black's point of view.
    pub fn absolute_score(&self) -> Score {
        match self.player {
            Color::Black => self.score,
            Color::Red => -self.score,
        }
    }
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut displayed = String::new();
        displayed.push_str("SearchResult {\n");
        displayed.push_str(&format!("    best_move: {}\n", self.best_move));
        displayed.push_str(&format!("    score    : {}\n", self.score));
        displayed.push_str(&format!("    pv       : {}\n", display(&self.pv)));
        displayed.push_str(&format!("    player   : {}\n", self.player));
        displayed.push_str(&format!("    depth    : {}\n", self.depth));
        displayed.push_str(&format!("    nodes    : {}\n", self.nodes));
        displayed.push_str(&format!("    nps      : {}\n", self.nps()));
        displayed.push_str(&format!(
            "    elapsed  : {}.{:03}s\n",
            self.elapsed.as_secs(),
            self.elapsed.subsec_millis()
        ));
        displayed.push_str(&format!("    stopped  : {}\n", self.stopped));
        displayed.push('}');

        write!(f, "{displayed}")
    }
}

/// Checkers Engine primary blocking search function.
/// Searches the current position of `game`, treating every earlier position
/// of the game as a repetition draw.
pub fn search(game: &Game, mode: Mode, weights: Weights) -> error::Result<SearchResult> {
    let stopper = AtomicBool::new(false);
    ids(
        *game.position(),
        mode,
        weights,
        game.repetitions().clone(),
        game.ztable(),
        Instant::now(),
        &stopper,
    )
}

/// Checkers Engine non-blocking search function. This runs the search on a separate thread.
/// When the search has been completed, it returns the value by sending it over the given Sender.
///
/// # Arguments
///
/// * `game`: State of the current active game
/// * `mode`: Mode of search determines when the search stops and how deep it searches
/// * `weights`: Evaluation weights
/// * `stopper`: Tell search to stop early from an external source
/// * `sender`: Channel to send search result over
pub fn search_nonblocking(
    game: Game,
    mode: Mode,
    weights: Weights,
    stopper: Arc<AtomicBool>,
    sender: mpsc::Sender<error::Result<SearchResult>>,
) -> error::Result<thread::JoinHandle<()>> {
    let start_time = Instant::now();
    let position = *game.position();
    let history = game.repetitions().clone();
    let ztable: Arc<ZobristTable> = Arc::clone(game.ztable());

    thread::Builder::new()
        .name("checkers-search".into())
        .spawn(move || {
            debug!(%mode, player = %position.side_to_move(), "search started");
            let search_result = ids(position, mode, weights, history, &ztable, start_time, &stopper);
            match &search_result {
                Ok(result) => info!(
                    best_move = %result.best_move,
                    score = %result.score,
                    depth = result.depth,
                    nodes = result.nodes,
                    "search complete"
                ),
                Err(err) if err.kind() == ErrorKind::SearchCancelled => debug!("search cancelled"),
                Err(err) => debug!(%err, "search ended without a move"),
            }
            // The receiver may have been dropped by a caller no longer interested.
            sender.send(search_result).ok();
        })
        .map_err(|err| error::Error::new(ErrorKind::EngineThread, err))
}
