//! History structure used within search.

use crate::zobrist::HashKind;

/// History primary use is for tracking repeated positions to detect draws by repetition.
/// It is stateful, in that functions assume the next interaction comes from the next
/// possible move in a played game.
///
/// It contains the hashes of all previously visited positions,
/// and the indices of positions which cannot be repeated in future positions.
/// A capture or a man move can never be reversed, so no position before one can reoccur.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct History {
    hash_history: Vec<HashKind>,  // All visited position hashes in order.
    unrepeatables: Vec<usize>,    // Stack of unrepeatable position indices.
    head: usize,                  // Most recent unrepeatable position.
}

impl History {
    /// Create a new empty History.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of positions in history.
    pub fn len(&self) -> usize {
        self.hash_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hash_history.is_empty()
    }

    /// Pushes the hash of a position a move was played from, and updates the most recent
    /// unrepeatable index if the move was irreversible.
    pub fn push(&mut self, hash: HashKind, is_unrepeatable: bool) {
        self.hash_history.push(hash);

        if is_unrepeatable {
            self.unrepeatables.push(self.head);
            self.head = self.hash_history.len().saturating_sub(1);
        }
    }

    /// Pops a position from history stack. If the popped item was the most recent unrepeatable,
    /// then replace it with the previous unrepeatable index.
    pub fn pop(&mut self) {
        self.hash_history.pop();

        // If the current head exceeds the limit, replace it with the previous unrepeatable index.
        if self.head >= self.hash_history.len() {
            self.head = self.unrepeatables.pop().unwrap_or(0);
        }
    }

    /// Returns true if the position occurs at least once in history.
    /// This is done by only checking the history from the last unrepeatable index to the most recent entry.
    /// All positions before the index cannot reoccur in the next sequence.
    pub fn contains(&self, hash: HashKind) -> bool {
        self.contains_n(hash, 1)
    }

    /// Returns true if the position occurs in history at least `n` times,
    /// assuming the position to check may be the next move in this game's history.
    pub fn contains_n(&self, hash: HashKind, count: usize) -> bool {
        let start = self.head.min(self.hash_history.len());
        self.hash_history[start..]
            .iter()
            .rev()
            .filter(|old_hash| **old_hash == hash)
            .nth(count.saturating_sub(1))
            .is_some()
    }

    /// Returns true if the position occurs twice in history, indicating that the given
    /// position is the second repetition (position occurs total of three times).
    pub fn is_threefold_repetition(&self, hash: HashKind) -> bool {
        self.contains_n(hash, 2)
    }
}
