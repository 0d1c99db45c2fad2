//! Engine struct acts as a simplified API for the search parts of the Checkers engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::debug;

use crate::error::{self, ErrorKind};
use crate::evaluation::Weights;
use crate::fen::Fen;
use crate::game::Game;
use crate::position::Position;
use crate::search::{self, SearchResult};
use crate::timeman::Mode;

/// EngineBuilder allows for parameters of an Engine to be set and built once.
///
/// Default values:
///
/// * `game`: Starting checkers position
/// * `weights`: Weights::DEFAULT
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    game: Game,
    weights: Weights,
}

impl EngineBuilder {
    /// Create a new default EngineBuilder.
    pub fn new() -> Self {
        Self {
            game: Game::start_position(),
            weights: Weights::default(),
        }
    }

    /// Create and return a new Engine.
    pub fn build(&self) -> Engine {
        Engine {
            game: self.game.clone(),
            weights: self.weights,
            stopper: Arc::new(AtomicBool::new(false)),
            search_handle: None,
        }
    }

    /// Set the Engine's initial game state.
    pub fn game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }

    /// Set the evaluation weights the engine searches with.
    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine wraps up all parameters required for running any kind of search.
/// It is stateful because repetitions can only be judged against the moves
/// of the current game, so the engine must be kept in sync with the game.
///
/// Only one search runs at a time.
pub struct Engine {
    // Search fields
    game: Game,
    weights: Weights,
    stopper: Arc<AtomicBool>,

    // Meta fields
    search_handle: Option<JoinHandle<()>>,
}

impl Engine {
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    /// Returns reference to current game of engine.
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Set the game or position for evaluation.
    pub fn set_game<T: Into<Game>>(&mut self, game: T) {
        self.game = game.into();
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    /// Run a blocking search on the current game.
    /// Any search already in progress is stopped first.
    pub fn search_sync(&mut self, mode: Mode) -> error::Result<SearchResult> {
        self.stop();
        self.wait();
        self.unstop();

        let (sender, receiver) = mpsc::channel();
        self.search(mode, sender)?;
        self.wait();
        receiver
            .recv()
            .map_err(|_| error::Error::from(ErrorKind::SearchCancelled))?
    }

    /// Run a non-blocking search. The result is sent over `sender` when the search ends.
    /// The engine only runs one search at a time, so if it is not ready, it fails to begin.
    /// If the engine is available for searching, it ensures its stopper is unset.
    pub fn search(
        &mut self,
        mode: Mode,
        sender: Sender<error::Result<SearchResult>>,
    ) -> error::Result<()> {
        if !self.ready() {
            return Err((ErrorKind::EngineAlreadySearching, "failed to begin search").into());
        }
        self.reap();
        self.unstop();

        debug!(%mode, fen = %self.game.position().to_fen(), "engine search");
        let handle = search::search_nonblocking(
            self.game.clone(),
            mode,
            self.weights,
            Arc::clone(&self.stopper),
            sender,
        )?;
        self.search_handle = Some(handle);

        Ok(())
    }

    /// Informs the active search to stop searching as soon as possible.
    pub fn stop(&self) {
        self.stopper.store(true, Ordering::Relaxed);
    }

    /// Resets stopper flag.
    pub fn unstop(&self) {
        self.stopper.store(false, Ordering::Relaxed);
    }

    /// Engine blocks thread until search is completed.
    pub fn wait(&mut self) {
        if let Some(handle) = self.search_handle.take() {
            handle.join().expect("search thread panicked");
        }
    }

    /// Returns true if the engine is ready to start a search.
    /// A search thread that has finished no longer counts as running.
    pub fn ready(&self) -> bool {
        self.search_handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Join a finished search thread, if there is one.
    fn reap(&mut self) {
        if self.search_handle.as_ref().map_or(false, |h| h.is_finished()) {
            self.wait();
        }
    }

    /// Consumes and shuts down the Engine. Signals any threads to stop searching
    /// and waits for them to close first.
    pub fn shutdown(self) {}
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Position> for Engine {
    fn from(position: Position) -> Self {
        EngineBuilder::new().game(Game::from(position)).build()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
        self.wait();
    }
}
