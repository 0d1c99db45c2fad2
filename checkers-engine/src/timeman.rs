//! Time Management

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use crate::coretypes::{PlyKind, MAX_DEPTH};

const OVERHEAD: Duration = Duration::from_millis(5); // Expected amount of time loss in ms.

// Returns true if the duration since the start of search is gte to the provided time to move.
fn is_out_of_time(start_time: Instant, move_time: Duration) -> bool {
    start_time.elapsed() + OVERHEAD >= move_time
}

/// There are 3 supported search modes, Infinite, Depth, and MoveTime.
/// Infinite mode: do not stop searching. Search must be signaled externally to stop.
/// Depth mode: search to a given depth, optionally within a time budget.
/// MoveTime mode: search for a specified time per move, optionally to a depth.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    Infinite,           // Search until told to stop.
    Depth(Depth),       // Search to a given depth.
    MoveTime(MoveTime), // Search for a specified amount of time.
}

impl Mode {
    /// Returns true if a search should be stopped.
    pub fn stop(&self, ply: PlyKind, start_time: Instant) -> bool {
        match self {
            Mode::Infinite => Infinite::stop(),
            Mode::Depth(depth_mode) => depth_mode.stop(ply, start_time),
            Mode::MoveTime(movetime_mode) => movetime_mode.stop(ply, start_time),
        }
    }

    /// Returns true if the time budget of this mode has run out.
    /// Modes without a budget are never out of time.
    pub fn out_of_time(&self, start_time: Instant) -> bool {
        self.budget()
            .map_or(false, |movetime| is_out_of_time(start_time, movetime))
    }

    /// Deepest iteration this mode allows.
    pub fn max_depth(&self) -> PlyKind {
        match self {
            Mode::Infinite => MAX_DEPTH,
            Mode::Depth(depth_mode) => depth_mode.depth.min(MAX_DEPTH),
            Mode::MoveTime(movetime_mode) => {
                movetime_mode.depth.unwrap_or(MAX_DEPTH).min(MAX_DEPTH)
            }
        }
    }

    /// Time budget of this mode, if it has one.
    pub fn budget(&self) -> Option<Duration> {
        match self {
            Mode::Infinite => None,
            Mode::Depth(depth_mode) => depth_mode.movetime,
            Mode::MoveTime(movetime_mode) => Some(movetime_mode.movetime),
        }
    }

    /// Returns a new Infinite Mode.
    pub fn infinite() -> Self {
        Self::Infinite
    }

    /// Returns a new Depth Mode.
    pub fn depth(ply: PlyKind, movetime: Option<Duration>) -> Self {
        Self::Depth(Depth {
            depth: ply,
            movetime,
        })
    }

    /// Returns a new MoveTime mode.
    pub fn movetime(movetime: Duration, ply: Option<PlyKind>) -> Self {
        Self::MoveTime(MoveTime {
            movetime,
            depth: ply,
        })
    }
}

/// Depth 6, no time limit.
impl Default for Mode {
    fn default() -> Self {
        Self::depth(6, None)
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Infinite => write!(f, "infinite"),
            Mode::Depth(Depth { depth, movetime }) => match movetime {
                Some(movetime) => write!(f, "depth {depth} within {}ms", movetime.as_millis()),
                None => write!(f, "depth {depth}"),
            },
            Mode::MoveTime(MoveTime { movetime, depth }) => match depth {
                Some(depth) => write!(f, "{}ms up to depth {depth}", movetime.as_millis()),
                None => write!(f, "{}ms", movetime.as_millis()),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Infinite;

impl Infinite {
    fn stop() -> bool {
        false
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Depth {
    pub depth: PlyKind,
    movetime: Option<Duration>,
}

impl Depth {
    /// Depth mode stops when its depth limit is passed, or optionally if movetime is met.
    fn stop(&self, ply: PlyKind, start_time: Instant) -> bool {
        if ply > self.depth {
            return true;
        }

        if let Some(movetime) = self.movetime {
            if is_out_of_time(start_time, movetime) {
                return true;
            }
        }

        false
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MoveTime {
    movetime: Duration,
    depth: Option<PlyKind>,
}

impl MoveTime {
    /// MoveTime mode stops after a given time has passed, or optionally if its depth is passed.
    fn stop(&self, ply: PlyKind, start_time: Instant) -> bool {
        if is_out_of_time(start_time, self.movetime) {
            return true;
        }
        if let Some(depth) = self.depth {
            if ply > depth {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_mode_stops_past_depth() {
        let mode = Mode::depth(4, None);
        let start = Instant::now();
        assert!(!mode.stop(4, start));
        assert!(mode.stop(5, start));
        assert_eq!(mode.max_depth(), 4);
        assert!(!mode.out_of_time(start));
    }

    #[test]
    fn movetime_mode_runs_out() {
        let mode = Mode::movetime(Duration::from_millis(1), None);
        let long_ago = Instant::now() - Duration::from_secs(1);
        assert!(mode.stop(1, long_ago));
        assert!(mode.out_of_time(long_ago));
        assert_eq!(mode.max_depth(), MAX_DEPTH);
    }

    #[test]
    fn infinite_never_stops() {
        let mode = Mode::infinite();
        assert!(!mode.stop(MAX_DEPTH, Instant::now()));
        assert_eq!(mode.budget(), None);
    }

    #[test]
    fn display() {
        let medium = Mode::depth(4, Some(Duration::from_millis(200)));
        assert_eq!(medium.to_string(), "depth 4 within 200ms");
        assert_eq!(Mode::movetime(Duration::from_millis(350), None).to_string(), "350ms");
    }
}
