//! The fundamental and simple types of `checkers_engine`.

use std::fmt::{self, Display, Write};
use std::mem::replace;
use std::ops::{Add, AddAssign, Mul, Neg, Not, Sub};
use std::str::FromStr;

use arrayvec::ArrayVec;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////
pub const NUM_ROWS: usize = 8;
pub const NUM_COLS: usize = 8;
// Only dark squares are playable, half of the board.
pub const NUM_SQUARES: usize = NUM_ROWS * NUM_COLS / 2;
pub const SQUARES_PER_ROW: usize = NUM_COLS / 2;

// Each side starts with three rows of men.
pub const PIECES_PER_SIDE: usize = 12;

// A single chain can never capture more pieces than the opponent owns.
pub const MAX_CAPTURES: usize = PIECES_PER_SIDE;

// Generous bound on the number of legal moves of any reachable position.
pub const MAX_MOVES: usize = 128;

// The greatest depth reachable for the engine during search.
// This also expresses the maximum number of moves than can be in a line.
pub const MAX_DEPTH: PlyKind = 64;
pub const MAX_LINE_LEN: usize = MAX_DEPTH as usize;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Type alias for max ply/depth.
pub type PlyKind = u8;

/// Counter for quiet plies.
pub type MoveCount = u16;

// Type alias to make changing Score inner type easy if needed.
pub type ScoreKind = i32;

/// Evaluation unit of the engine, where 100 == the value of one man by default.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Score(pub ScoreKind);

/// Color can represent the color of a piece, or a player.
/// Black is side one and moves first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    Black,
    Red,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind {
    Man,
    King,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub(crate) color: Color,
    pub(crate) piece_kind: PieceKind,
}

/// The four diagonal directions. North increases the row, towards Red's promotion row.
/// Enum variant order and discriminant must be contiguous and start from 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

/// One of the 32 dark squares of the board, stored as a packed index 0..32.
/// Squares display with standard checkers numbering, 1..=32.
///
/// Index `i` lies on row `7 - i / 4` and column `2 * (i % 4) + row % 2`,
/// so Black's back row holds squares 1-4 and Red's back row holds 29-32.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Square(u8);

/// Captured squares of a move, in the order they were jumped.
pub type Captures = ArrayVec<Square, MAX_CAPTURES>;

/// A single ply. A capture chain is always one Move, fully resolved.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) captures: Captures,
    pub(crate) promotion: bool,
}

/// Parsed text form of a move: the squares the moving piece visits.
/// It is matched against legal moves since text alone cannot tell promotion.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MoveNotation {
    path: ArrayVec<Square, { MAX_CAPTURES + 1 }>,
    capture: bool,
}

//////////////////////
/// Implementations //
//////////////////////

impl Score {
    pub const MIN: Score = Self(ScoreKind::MIN + 1); // + 1 to avoid overflow error on negate.
    pub const MAX: Score = Self(ScoreKind::MAX);
    pub const DRAW: Score = Self(0);
    pub const WIN: Score = Self(1_000_000);

    /// Returns the sign of Score value, either 1, -1, or 0.
    pub const fn signum(&self) -> ScoreKind {
        self.0.signum()
    }

    /// Returns true if the score comes from a forced win or loss found in search.
    pub const fn is_decisive(&self) -> bool {
        self.0.abs() > Self::WIN.0 - MAX_DEPTH as ScoreKind - 1
    }
}

impl Add for Score {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}
impl Sub for Score {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl Mul<ScoreKind> for Score {
    type Output = Score;
    fn mul(self, rhs: ScoreKind) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl Neg for Score {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
impl Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl Color {
    pub const fn to_char(&self) -> char {
        match self {
            Color::Black => 'b',
            Color::Red => 'r',
        }
    }

    /// The row a man of this color promotes on.
    pub const fn promotion_row(&self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => (NUM_ROWS - 1) as u8,
        }
    }

    /// The row this color's men start from and defend.
    pub const fn back_row(&self) -> u8 {
        match self {
            Color::Black => (NUM_ROWS - 1) as u8,
            Color::Red => 0,
        }
    }

    pub const fn iter() -> ColorIterator {
        ColorIterator::new()
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Color::Black => Color::Red,
            Color::Red => Color::Black,
        }
    }
}

impl Not for &Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        Color::not(*self)
    }
}

impl From<Color> for char {
    fn from(color: Color) -> Self {
        color.to_char()
    }
}

impl TryFrom<char> for Color {
    type Error = error::Error;
    fn try_from(ch: char) -> error::Result<Self> {
        match ch.to_ascii_lowercase() {
            'b' => Ok(Color::Black),
            // Portable draughts notation calls the second side White.
            'r' | 'w' => Ok(Color::Red),
            _ => Err((ErrorKind::ParseColorMalformed, "char is not b|r|w").into()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Black => f.write_str("Black"),
            Color::Red => f.write_str("Red"),
        }
    }
}

pub struct ColorIterator {
    maybe_color: Option<Color>,
}

impl ColorIterator {
    pub const fn new() -> Self {
        Self {
            maybe_color: Some(Color::Black),
        }
    }
}

impl Iterator for ColorIterator {
    type Item = Color;
    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.maybe_color {
            Some(Color::Black) => Some(Color::Red),
            Some(Color::Red) | None => None,
        };
        replace(&mut self.maybe_color, value)
    }
}

impl Piece {
    pub const fn new(color: Color, piece_kind: PieceKind) -> Self {
        Self { color, piece_kind }
    }

    pub const fn man(color: Color) -> Self {
        Self::new(color, PieceKind::Man)
    }

    pub const fn king(color: Color) -> Self {
        Self::new(color, PieceKind::King)
    }

    pub const fn color(&self) -> &Color {
        &self.color
    }
    pub const fn piece_kind(&self) -> &PieceKind {
        &self.piece_kind
    }

    pub const fn is_king(&self) -> bool {
        matches!(self.piece_kind, PieceKind::King)
    }

    /// Men are lowercase, kings are uppercase.
    pub const fn to_char(&self) -> char {
        match (self.color, self.piece_kind) {
            (Color::Black, PieceKind::Man) => 'b',
            (Color::Black, PieceKind::King) => 'B',
            (Color::Red, PieceKind::Man) => 'r',
            (Color::Red, PieceKind::King) => 'R',
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// (row delta, column delta) of a single step.
    pub const fn delta(&self) -> (i8, i8) {
        match self {
            Direction::NorthWest => (1, -1),
            Direction::NorthEast => (1, 1),
            Direction::SouthWest => (-1, -1),
            Direction::SouthEast => (-1, 1),
        }
    }

    pub const fn idx(&self) -> usize {
        *self as usize
    }
}

impl Square {
    /// Returns a square from a packed index in 0..32.
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < NUM_SQUARES {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns a square from its standard number in 1..=32.
    pub const fn from_number(number: u8) -> Option<Self> {
        if number == 0 {
            None
        } else {
            Self::from_u8(number - 1)
        }
    }

    /// Returns the square at a (row, col) coordinate if it is on the board and playable.
    pub const fn from_row_col(row: i8, col: i8) -> Option<Self> {
        if row < 0 || col < 0 || row >= NUM_ROWS as i8 || col >= NUM_COLS as i8 {
            return None;
        }
        if (row + col) % 2 != 0 {
            return None;
        }
        let from_top = (NUM_ROWS as i8 - 1 - row) as u8;
        Some(Self(from_top * SQUARES_PER_ROW as u8 + (col / 2) as u8))
    }

    pub const fn idx(&self) -> usize {
        self.0 as usize
    }

    /// Standard checkers square number, 1..=32.
    pub const fn number(&self) -> u8 {
        self.0 + 1
    }

    pub const fn row(&self) -> u8 {
        (NUM_ROWS - 1) as u8 - self.0 / SQUARES_PER_ROW as u8
    }

    pub const fn col(&self) -> u8 {
        let row = self.row();
        2 * (self.0 % SQUARES_PER_ROW as u8) + row % 2
    }

    /// The neighboring square one step in `direction`, if on the board.
    pub const fn step(&self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        Self::from_row_col(self.row() as i8 + dr, self.col() as i8 + dc)
    }

    /// The square two steps away in `direction`, the landing square of a jump.
    pub const fn jump(&self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        Self::from_row_col(self.row() as i8 + 2 * dr, self.col() as i8 + 2 * dc)
    }

    /// The square between two squares a jump apart.
    pub const fn between(&self, other: Square) -> Option<Self> {
        let dr = other.row() as i8 - self.row() as i8;
        let dc = other.col() as i8 - self.col() as i8;
        if (dr == 2 || dr == -2) && (dc == 2 || dc == -2) {
            Self::from_row_col(self.row() as i8 + dr / 2, self.col() as i8 + dc / 2)
        } else {
            None
        }
    }

    /// True if the square lies in the central 4x4 block of the board.
    pub const fn is_central(&self) -> bool {
        let (row, col) = (self.row(), self.col());
        row >= 2 && row <= 5 && col >= 2 && col <= 5
    }

    pub fn iter() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES as u8).map(Square)
    }
}

impl FromStr for Square {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Square::from_number)
            .ok_or_else(|| (ErrorKind::ParseSquareMalformed, format!("{s} is not in 1..=32")).into())
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl Move {
    /// A non-capturing single step.
    pub fn step(from: Square, to: Square, promotion: bool) -> Self {
        Self {
            from,
            to,
            captures: Captures::new(),
            promotion,
        }
    }

    /// A capture chain ending on `to`, jumping `captures` in order.
    pub fn capture(from: Square, to: Square, captures: Captures, promotion: bool) -> Self {
        debug_assert!(!captures.is_empty());
        Self {
            from,
            to,
            captures,
            promotion,
        }
    }

    // Immutable Getters
    pub const fn from(&self) -> Square {
        self.from
    }
    pub const fn to(&self) -> Square {
        self.to
    }
    pub fn captures(&self) -> &[Square] {
        &self.captures
    }
    pub const fn is_promotion(&self) -> bool {
        self.promotion
    }

    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    pub fn num_captures(&self) -> usize {
        self.captures.len()
    }

    /// Squares the moving piece lands on after each leg, ending with `to`.
    pub fn landings(&self) -> ArrayVec<Square, MAX_CAPTURES> {
        let mut landings = ArrayVec::new();
        if self.captures.is_empty() {
            landings.push(self.to);
            return landings;
        }

        let mut current = self.from;
        for captured in &self.captures {
            let row = 2 * captured.row() as i8 - current.row() as i8;
            let col = 2 * captured.col() as i8 - current.col() as i8;
            // A legal chain always lands on the board.
            current = Square::from_row_col(row, col).unwrap_or(self.to);
            landings.push(current);
        }
        landings
    }
}

/// # Example
/// A step `11-15`, a double jump `22x15x8`.
impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.from)?;
        if self.is_capture() {
            for landing in self.landings() {
                write!(f, "x{landing}")?;
            }
        } else {
            write!(f, "-{}", self.to)?;
        }
        Ok(())
    }
}

impl MoveNotation {
    pub fn from(&self) -> Square {
        self.path[0]
    }

    pub fn to(&self) -> Square {
        self.path[self.path.len() - 1]
    }

    /// True if `move_` is a legal move this notation can describe.
    /// `from-to` and `fromxto` match any chain between the two squares,
    /// longer paths must match every landing square.
    pub fn matches(&self, move_: &Move) -> bool {
        if move_.from() != self.from() || move_.to() != self.to() {
            return false;
        }
        if self.path.len() == 2 {
            return !self.capture || move_.is_capture();
        }
        move_.is_capture() && move_.landings().as_slice() == &self.path[1..]
    }
}

/// Parses `11-15`, `22x15x8` and `22x8`.
impl FromStr for MoveNotation {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        let s = s.trim();
        let capture = s.contains(['x', 'X', ':']);
        let mut path = ArrayVec::new();

        for part in s.split(['-', 'x', 'X', ':']) {
            let square: Square = part.parse()?;
            path.try_push(square)
                .map_err(|_| (ErrorKind::ParseMoveMalformed, "move path too long"))?;
        }

        if path.len() < 2 {
            return Err((ErrorKind::ParseMoveMalformed, format!("{s} needs two squares")).into());
        }
        if !capture && path.len() > 2 {
            return Err((ErrorKind::ParseMoveMalformed, "a step visits two squares").into());
        }

        Ok(Self { path, capture })
    }
}
