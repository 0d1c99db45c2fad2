//! Checkers Engine error type.

use std::error;
use std::fmt::{self, Display};
use std::result;

/// Checkers Engine generic result type.
pub type Result<T> = result::Result<T, Error>;

/// A list specifying general errors for the Checkers engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A submitted move is not in the legal move set of the position.
    IllegalMove,
    /// The side to move has no legal move. This is the end of the game, not a bug.
    NoLegalMove,
    /// Undo requested with an empty history.
    NoHistory,
    /// Redo requested with nothing undone.
    NoRedo,
    /// The side requesting an undo has spent its allowance.
    NoUndosLeft,
    /// A move was applied or requested after the game ended.
    GameOver,
    /// A search was aborted before it completed.
    SearchCancelled,
    /// Engine is currently searching, so another search cannot be started.
    EngineAlreadySearching,
    /// The operating system refused to start a search thread.
    EngineThread,
    /// A move was requested from a human player that has not submitted one.
    AwaitingInput,

    /// Square parse string malformed.
    ParseSquareMalformed,
    /// Move parse string malformed.
    ParseMoveMalformed,
    /// Color parse string malformed.
    ParseColorMalformed,
    /// Position notation malformed.
    ParseFenMalformed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::IllegalMove => "illegal move",
            ErrorKind::NoLegalMove => "no legal move",
            ErrorKind::NoHistory => "no history",
            ErrorKind::NoRedo => "no redo",
            ErrorKind::NoUndosLeft => "no undos left",
            ErrorKind::GameOver => "game over",
            ErrorKind::SearchCancelled => "search cancelled",
            ErrorKind::EngineAlreadySearching => "engine already searching",
            ErrorKind::EngineThread => "engine thread",
            ErrorKind::AwaitingInput => "awaiting input",

            ErrorKind::ParseSquareMalformed => "parse square malformed",
            ErrorKind::ParseMoveMalformed => "parse move malformed",
            ErrorKind::ParseColorMalformed => "parse color malformed",
            ErrorKind::ParseFenMalformed => "parse fen malformed",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The primary and general error type for the Checkers Engine.
#[derive(Debug)]
pub enum Error {
    Simple(ErrorKind),
    Message(ErrorKind, String),
    Custom(ErrorKind, Box<dyn error::Error + Send + Sync>),
}

impl Error {
    pub fn new<E>(error_kind: ErrorKind, inner_error: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self::Custom(error_kind, inner_error.into())
    }

    /// Returns the kind of this error, regardless of any attached context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Simple(error_kind)
            | Error::Message(error_kind, _)
            | Error::Custom(error_kind, _) => *error_kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Simple(error_kind) => {
                write!(f, "{error_kind}")
            }
            Error::Message(error_kind, string) => {
                write!(f, "{error_kind}: {string}")
            }
            Error::Custom(error_kind, ref box_error) => {
                write!(f, "{error_kind}, error: {}", *box_error)
            }
        }
    }
}

impl error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self::Simple(error_kind)
    }
}

impl<S: ToString> From<(ErrorKind, S)> for Error {
    fn from((error_kind, stringable): (ErrorKind, S)) -> Self {
        Self::Message(error_kind, stringable.to_string())
    }
}
