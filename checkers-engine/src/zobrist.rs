//! Zobrist Hashing

use std::collections::HashSet;
use std::ops::Index;

use rand::prelude::*;

use crate::coretypes::{Color, Move, Piece, PieceKind, Square, NUM_SQUARES};
use crate::position::Position;

/// HashKind is an alias for the underlying type of a Zobrist Hash.
pub type HashKind = u64;

const NUM_PIECE_TYPES: usize = 4;

/// Zobrist Hashing is a quick and incremental way to hash a checkers position.
/// ZobristTable contains unique, pseudo-randomly generated values
/// used for calculating Zobrist Hash of a position.
///
/// Each Piece gets a unique number for each square.
/// A single side to move gets a unique number.
/// Each square a mid-chain jumper may stand on gets a unique number.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ZobristTable {
    piece_hash: [[HashKind; NUM_SQUARES]; NUM_PIECE_TYPES],
    jumping_hash: [HashKind; NUM_SQUARES],
    pub(crate) player_hash: HashKind,
}

impl ZobristTable {
    const TOGGLE_PLAYER: Color = Color::Red;

    /// Returns a new ZobristTable with randomly seeded, unique values.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Returns a new ZobristTable with unique values generated from seeded rng.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Returns a new ZobristTable with unique values generated from rng.
    fn with_rng(mut rng: StdRng) -> Self {
        // Each value used must be unique.
        let mut used_values = HashSet::new();
        let mut unique = move || loop {
            let value: HashKind = rng.gen();
            if value != 0 && used_values.insert(value) {
                break value;
            }
        };

        let mut piece_hash = [[HashKind::default(); NUM_SQUARES]; NUM_PIECE_TYPES];
        let mut jumping_hash = [HashKind::default(); NUM_SQUARES];

        for item in piece_hash.iter_mut().flatten().chain(jumping_hash.iter_mut()) {
            *item = unique();
        }
        let player_hash = unique();

        Self {
            piece_hash,
            jumping_hash,
            player_hash,
        }
    }

    /// Generate a hash value of a position in context of this ZobristTable.
    /// Rules are not hashed, positions compared by hash must share rules.
    pub fn generate_hash(&self, position: &Position) -> HashKind {
        let mut hash = HashKind::default();

        for color in Color::iter() {
            for (square, piece) in position.pieces(color) {
                hash ^= self[(piece, square)];
            }
        }

        if let Some(jumper) = position.jumping {
            hash ^= self.jumping_hash[jumper.idx()];
        }

        // Only hash one of the players, so a move toggles it with a single xor.
        if position.side_to_move == ZobristTable::TOGGLE_PLAYER {
            hash ^= self.player_hash;
        }

        hash
    }

    /// Update a hash by a move applied to `before`.
    /// `before` is the position the move is played from, the move itself is not yet applied.
    pub fn update_hash(&self, hash: &mut HashKind, before: &Position, move_: &Move) {
        let piece = match before.piece_at(move_.from) {
            Some(piece) => piece,
            None => return,
        };

        // Player always alternates, and any chain in progress is completed by the move.
        *hash ^= self.player_hash;
        if let Some(jumper) = before.jumping {
            *hash ^= self.jumping_hash[jumper.idx()];
        }

        *hash ^= self[(piece, move_.from)];
        let crowned = move_.promotion || move_.to.row() == piece.color.promotion_row();
        let landed = match crowned {
            true => Piece::king(piece.color),
            false => piece,
        };
        *hash ^= self[(landed, move_.to)];

        for &captured in move_.captures() {
            if let Some(victim) = before.piece_at(captured) {
                *hash ^= self[(victim, captured)];
            }
        }
    }
}

/// Default for ZobristTable is a table with a random seed.
impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Index used for accessing piece_hash.
impl Index<(Piece, Square)> for ZobristTable {
    type Output = HashKind;
    fn index(&self, index: (Piece, Square)) -> &Self::Output {
        let (piece, square) = index;
        &self.piece_hash[piece.zobrist_offset()][square.idx()]
    }
}

impl Piece {
    /// Get the completely qualified index for a piece.
    #[inline(always)]
    const fn zobrist_offset(&self) -> usize {
        let block = match self.color {
            Color::Black => 0,
            Color::Red => 2,
        };
        match self.piece_kind {
            PieceKind::Man => block,
            PieceKind::King => block + 1,
        }
    }
}
