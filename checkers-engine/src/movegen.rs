//! Move Generation
//!
//! All functions in this module generate fully legal moves for a position.
//! A capture chain is followed depth-first until the moving piece has no
//! further jump, and each maximal chain becomes a single Move.
//!
//! Generation order is deterministic: pieces in ascending square order,
//! directions in `Direction::ALL` order. Search tie-breaking depends on it.

use crate::coretypes::{Captures, Color, Direction, Move, Piece, Square};
use crate::coretypes::{NUM_SQUARES, PieceKind::*};
use crate::movelist::MoveList;
use crate::position::{Board, Position};
use crate::rules::{CaptureRemoval, Rules};

///////////////////////////////////
// Pre-generated neighbor lookup
//
// Arrays are indexed by Square index, then by Direction discriminant.

/// Square one diagonal step away, if on the board.
const STEP: [[Option<Square>; 4]; NUM_SQUARES] = generate_table(1);
/// Landing square of a jump, two diagonal steps away, if on the board.
const JUMP: [[Option<Square>; 4]; NUM_SQUARES] = generate_table(2);

const fn generate_table(distance: u8) -> [[Option<Square>; 4]; NUM_SQUARES] {
    let mut table = [[None; 4]; NUM_SQUARES];
    let mut idx = 0;
    while idx < NUM_SQUARES {
        let square = match Square::from_u8(idx as u8) {
            Some(square) => square,
            None => panic!("square index out of range"),
        };
        let mut dir = 0;
        while dir < Direction::ALL.len() {
            table[idx][dir] = match distance {
                1 => square.step(Direction::ALL[dir]),
                _ => square.jump(Direction::ALL[dir]),
            };
            dir += 1;
        }
        idx += 1;
    }
    table
}

#[inline]
fn step(square: Square, direction: Direction) -> Option<Square> {
    STEP[square.idx()][direction.idx()]
}

#[inline]
fn jump(square: Square, direction: Direction) -> Option<Square> {
    JUMP[square.idx()][direction.idx()]
}

/// Directions a piece may step in without capturing.
fn step_directions(piece: Piece) -> &'static [Direction] {
    match (piece.piece_kind, piece.color) {
        (King, _) => &Direction::ALL,
        (Man, Color::Black) => &[Direction::SouthWest, Direction::SouthEast],
        (Man, Color::Red) => &[Direction::NorthWest, Direction::NorthEast],
    }
}

/// Directions a piece may jump in.
fn capture_directions(piece: Piece, rules: &Rules) -> &'static [Direction] {
    if rules.man_backward_capture {
        &Direction::ALL
    } else {
        step_directions(piece)
    }
}

const fn promotes(piece: Piece, to: Square) -> bool {
    matches!(piece.piece_kind, Man) && to.row() == piece.color.promotion_row()
}

/// Generate every legal move for the player to move.
/// An empty list means the player to move has lost.
pub(crate) fn legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let player = position.side_to_move;

    // Mid-chain: only the jumping piece may move, and only by capturing.
    if let Some(jumper) = position.jumping {
        if let Some(piece) = position.board[jumper.idx()] {
            if piece.color == player {
                generate_captures(position, jumper, piece, &mut moves);
            }
        }
        return moves;
    }

    for (square, piece) in position.pieces(player) {
        generate_captures(position, square, piece, &mut moves);
    }

    if moves.is_empty() || !position.rules.forced_capture {
        for (square, piece) in position.pieces(player) {
            generate_steps(&position.board, square, piece, &mut moves);
        }
    }

    moves
}

/// Returns true if the player to move has any capture available.
pub(crate) fn has_capture(position: &Position) -> bool {
    let player = position.side_to_move;
    position
        .pieces(player)
        .any(|(square, piece)| can_jump(&position.board, &position.rules, square, piece))
}

/// Number of legal moves `color` would have if it were their turn.
pub(crate) fn count_moves(position: &Position, color: Color) -> usize {
    if position.side_to_move == color {
        legal_moves(position).len()
    } else {
        let mut flipped = *position;
        flipped.side_to_move = color;
        flipped.jumping = None;
        legal_moves(&flipped).len()
    }
}

/// Returns true if the piece on `square` has at least one jump available.
fn can_jump(board: &Board, rules: &Rules, square: Square, piece: Piece) -> bool {
    capture_directions(piece, rules).iter().any(|&direction| {
        match (step(square, direction), jump(square, direction)) {
            (Some(over), Some(land)) => {
                board[land.idx()].is_none()
                    && matches!(board[over.idx()], Some(victim) if victim.color != piece.color)
            }
            _ => false,
        }
    })
}

fn generate_steps(board: &Board, from: Square, piece: Piece, moves: &mut MoveList) {
    for &direction in step_directions(piece) {
        if let Some(to) = step(from, direction) {
            if board[to.idx()].is_none() {
                moves.push(Move::step(from, to, promotes(piece, to)));
            }
        }
    }
}

fn generate_captures(position: &Position, from: Square, piece: Piece, moves: &mut MoveList) {
    // The moving piece leaves its origin, so a chain may pass back over it.
    let mut board = position.board;
    board[from.idx()] = None;

    let mut chain = Chain {
        board,
        rules: position.rules,
        origin: from,
        captures: Captures::new(),
    };
    chain.extend(from, piece, false, moves);
}

/// Depth-first state of a capture chain under construction.
struct Chain {
    board: Board,
    rules: Rules,
    origin: Square,
    captures: Captures,
}

impl Chain {
    /// Try every jump from `current`. Pushes the chain as a move once no jump extends it.
    fn extend(&mut self, current: Square, piece: Piece, crowned: bool, moves: &mut MoveList) {
        let mut extended = false;

        for &direction in capture_directions(piece, &self.rules) {
            let (over, land) = match (step(current, direction), jump(current, direction)) {
                (Some(over), Some(land)) => (over, land),
                _ => continue,
            };
            let is_enemy = matches!(self.board[over.idx()], Some(victim) if victim.color != piece.color);
            if !is_enemy || self.captures.contains(&over) || self.board[land.idx()].is_some() {
                continue;
            }

            extended = true;
            let promoted = promotes(piece, land);
            self.captures.push(over);
            let lifted = match self.rules.capture_removal {
                CaptureRemoval::Immediate => self.board[over.idx()].take(),
                CaptureRemoval::EndOfChain => None,
            };

            if promoted && self.rules.promotion_ends_move {
                moves.push(Move::capture(self.origin, land, self.captures.clone(), true));
            } else if promoted {
                self.extend(land, Piece::king(piece.color), true, moves);
            } else {
                self.extend(land, piece, crowned, moves);
            }

            if lifted.is_some() {
                self.board[over.idx()] = lifted;
            }
            self.captures.pop();
        }

        if !extended && !self.captures.is_empty() {
            moves.push(Move::capture(self.origin, current, self.captures.clone(), crowned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    fn sq(number: u8) -> Square {
        Square::from_number(number).unwrap()
    }

    #[test]
    fn tables_match_square_arithmetic() {
        for square in Square::iter() {
            for direction in Direction::ALL {
                assert_eq!(step(square, direction), square.step(direction));
                assert_eq!(jump(square, direction), square.jump(direction));
            }
        }
    }

    #[test]
    fn start_position_moves() {
        let position = Position::start_position();
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|move_| !move_.is_capture()));
        assert!(!has_capture(&position));
        assert_eq!(count_moves(&position, Color::Red), 7);
    }

    #[test]
    fn men_do_not_step_backward() {
        let position = Position::parse_fen("B:B18:R1").unwrap();
        let moves = legal_moves(&position);
        let destinations: Vec<u8> = moves.iter().map(|m| m.to().number()).collect();
        assert_eq!(destinations.len(), 2);
        assert!(destinations.contains(&22));
        assert!(destinations.contains(&23));
    }

    #[test]
    fn kings_step_in_all_directions() {
        let position = Position::parse_fen("B:BK18:R1").unwrap();
        assert_eq!(legal_moves(&position).len(), 4);
    }

    #[test]
    fn capture_is_forced() {
        // Black man on 18 can jump Red on 22, other black men could step.
        let position = Position::parse_fen("B:B9,18:R22").unwrap();
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "18x25");
    }

    #[test]
    fn optional_capture_keeps_steps() {
        let position = Position::parse_fen("B:B9,18:R22")
            .unwrap()
            .with_rules(Rules::default().forced_capture(false));
        let moves = legal_moves(&position);
        assert!(moves.iter().any(|m| m.is_capture()));
        assert!(moves.iter().any(|m| !m.is_capture()));
        assert_eq!(moves.len(), 1 + 2 + 1);
    }

    #[test]
    fn backward_capture_variant() {
        // Black man on 18 with a red man behind it on 15.
        let standard = Position::parse_fen("B:B18:R15").unwrap();
        assert!(legal_moves(&standard).iter().all(|m| !m.is_capture()));

        let variant = standard.with_rules(Rules::default().man_backward_capture(true));
        let moves = legal_moves(&variant);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "18x11");
    }

    #[test]
    fn jumping_piece_restricts_generation() {
        // 10x17x26 and 18x25 are both available until 18 is marked as the jumper.
        let mut position = Position::parse_fen("B:B10,18:R14,22").unwrap();
        assert_eq!(legal_moves(&position).len(), 2);

        position.jumping = Some(sq(18));
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from(), sq(18));
    }

    #[test]
    fn promotion_ends_chain_by_default() {
        // Black man on 15 jumps 19 then 27 to land on the king row at 31.
        // As a new king it could go on to jump 26, which standard rules forbid.
        let position = Position::parse_fen("B:B15:R19,26,27").unwrap();
        let moves = legal_moves(&position);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "15x24x31");
        assert!(moves[0].is_promotion());

        let variant = position.with_rules(Rules::default().promotion_ends_move(false));
        let moves = legal_moves(&variant);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "15x24x31x22");
        assert!(moves[0].is_promotion());
    }
}
