//! Rule variants.
//!
//! Defaults describe standard English draughts: captures are forced, men only
//! capture forward, reaching the king row ends the move.

use crate::coretypes::MoveCount;

/// When pieces jumped during a chain leave the board.
///
/// Both give the same moves on an 8x8 board. A jump crosses a square of the
/// other row parity from the ones it lands on, so no leg lands where a piece
/// was taken, and no piece is jumped twice under either.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CaptureRemoval {
    /// Each captured piece is lifted as soon as it is jumped.
    Immediate,
    /// Captured pieces stay on the board as blockers until the chain is finished.
    EndOfChain,
}

/// Rule switches a game is played under. Every Position carries the Rules it obeys.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rules {
    /// When any capture exists, only captures are legal.
    pub forced_capture: bool,
    /// Men may capture (but not step) backwards.
    pub man_backward_capture: bool,
    pub capture_removal: CaptureRemoval,
    /// A man crowned mid-chain stops on the king row instead of jumping on as a king.
    pub promotion_ends_move: bool,
    /// Number of consecutive plies without a capture or man move that draws the game.
    pub draw_quiet_plies: Option<MoveCount>,
}

impl Rules {
    pub const STANDARD: Rules = Rules {
        forced_capture: true,
        man_backward_capture: false,
        capture_removal: CaptureRemoval::Immediate,
        promotion_ends_move: true,
        draw_quiet_plies: Some(80),
    };

    pub fn forced_capture(mut self, forced_capture: bool) -> Self {
        self.forced_capture = forced_capture;
        self
    }

    pub fn man_backward_capture(mut self, allowed: bool) -> Self {
        self.man_backward_capture = allowed;
        self
    }

    pub fn capture_removal(mut self, capture_removal: CaptureRemoval) -> Self {
        self.capture_removal = capture_removal;
        self
    }

    pub fn promotion_ends_move(mut self, ends: bool) -> Self {
        self.promotion_ends_move = ends;
        self
    }

    pub fn draw_quiet_plies(mut self, plies: Option<MoveCount>) -> Self {
        self.draw_quiet_plies = plies;
        self
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::STANDARD
    }
}
