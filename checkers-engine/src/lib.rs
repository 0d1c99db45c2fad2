//! Checkers rules, move generation, evaluation and alpha-beta search,
//! along with the game and player plumbing needed to play a full game.

pub mod controller;
pub mod coretypes;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod game;
pub(crate) mod movegen;
pub mod movelist;
pub(crate) mod moveorder;
pub mod perft;
pub mod player;
pub mod position;
pub mod rules;
pub mod search;
pub mod timeman;
pub mod zobrist;

pub use controller::{Controller, GameConfig, PlayerKind};
pub use engine::{Engine, EngineBuilder};
pub use fen::Fen;
pub use game::{Game, GameStatus};
pub use player::{Difficulty, MoveRequest, Player};
pub use position::Position;
pub use rules::Rules;
pub use search::SearchResult;
pub use timeman::Mode;
