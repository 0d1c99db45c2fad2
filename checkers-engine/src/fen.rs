//! Portable position notation.
//!
//! A position is written as three colon separated fields:
//! the side to move, then one piece list per color.
//!
//! `B:B1,2,K7:R21,K30`
//!
//! Each piece list starts with its color and holds square numbers,
//! a `K` prefix marks a king. `W` is accepted wherever `R` is, so
//! positions written with the usual White/Black names parse too.
//! Square ranges such as `B1-12` are accepted for men.
//! A man listed on its promotion row is read as a king, and no color
//! may have more than twelve pieces.

use crate::coretypes::{Color, Piece, PieceKind, Square, PIECES_PER_SIDE};
use crate::error::{self, ErrorKind};
use crate::position::Position;

/// Types that can be written to and read from position notation.
pub trait Fen: Sized {
    /// Attempt to parse a notation string into Self.
    fn parse_fen(s: &str) -> error::Result<Self>;

    /// Returns the notation string of Self.
    fn to_fen(&self) -> String;
}

impl Fen for Position {
    fn parse_fen(s: &str) -> error::Result<Self> {
        let s = s.trim().trim_end_matches('.');
        let mut fields = s.split(':');

        let side_to_move = match fields.next() {
            Some(field) => parse_side_to_move(field)?,
            None => return Err((ErrorKind::ParseFenMalformed, "empty notation").into()),
        };

        let mut position = Position::empty(side_to_move);
        let mut seen: Vec<Color> = Vec::with_capacity(2);

        for field in fields {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let color = parse_color_prefix(field)?;
            if seen.contains(&color) {
                return Err((ErrorKind::ParseFenMalformed, format!("{color} listed twice")).into());
            }
            seen.push(color);
            parse_piece_list(&mut position, color, &field[1..])?;
        }

        Ok(position)
    }

    fn to_fen(&self) -> String {
        let mut fen = String::new();
        fen.push(self.side_to_move.to_char().to_ascii_uppercase());
        for color in Color::iter() {
            fen.push(':');
            fen.push(color.to_char().to_ascii_uppercase());
            let squares: Vec<String> = self
                .pieces(color)
                .map(|(square, piece)| match piece.piece_kind {
                    PieceKind::King => format!("K{square}"),
                    PieceKind::Man => square.to_string(),
                })
                .collect();
            fen.push_str(&squares.join(","));
        }
        fen
    }
}

fn parse_side_to_move(field: &str) -> error::Result<Color> {
    let mut chars = field.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Color::try_from(ch).map_err(|_| {
            (ErrorKind::ParseFenMalformed, format!("{field} is not a side to move")).into()
        }),
        _ => Err((ErrorKind::ParseFenMalformed, format!("{field} is not a side to move")).into()),
    }
}

fn parse_color_prefix(field: &str) -> error::Result<Color> {
    field
        .chars()
        .next()
        .and_then(|ch| Color::try_from(ch).ok())
        .ok_or_else(|| (ErrorKind::ParseFenMalformed, format!("{field} has no color")).into())
}

fn parse_piece_list(position: &mut Position, color: Color, list: &str) -> error::Result<()> {
    for entry in list.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (piece_kind, squares) = match entry.strip_prefix(['K', 'k']) {
            Some(rest) => (PieceKind::King, rest),
            None => (PieceKind::Man, entry),
        };

        let range = match squares.split_once('-') {
            Some((first, last)) => parse_square(first)?.number()..=parse_square(last)?.number(),
            None => {
                let number = parse_square(squares)?.number();
                number..=number
            }
        };
        if range.is_empty() {
            return Err((ErrorKind::ParseFenMalformed, format!("{entry} is an empty range")).into());
        }

        for number in range {
            let square = parse_square(&number.to_string())?;
            if position.has_piece(square) {
                return Err((ErrorKind::ParseFenMalformed, format!("{square} is occupied twice")).into());
            }
            position.set_piece(square, Some(Piece::new(color, piece_kind)));
        }
    }

    let count = position.count(color);
    if count > PIECES_PER_SIDE {
        return Err((ErrorKind::ParseFenMalformed, format!("{color} has {count} pieces")).into());
    }
    Ok(())
}

fn parse_square(s: &str) -> error::Result<Square> {
    s.parse::<Square>()
        .map_err(|err| error::Error::new(ErrorKind::ParseFenMalformed, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_start_position() {
        let parsed = Position::parse_fen("B:B1-12:R21-32").unwrap();
        assert_eq!(parsed, Position::start_position());
        assert_eq!(
            Position::start_position().to_fen(),
            "B:B1,2,3,4,5,6,7,8,9,10,11,12:R21,22,23,24,25,26,27,28,29,30,31,32"
        );
    }

    #[test]
    fn parse_kings_and_aliases() {
        let position = Position::parse_fen("W:WK30,21:BK7,1,2.").unwrap();
        assert_eq!(position.side_to_move(), Color::Red);
        let king = |n| position.piece_at(Square::from_number(n).unwrap());
        assert_eq!(king(30), Some(Piece::king(Color::Red)));
        assert_eq!(king(21), Some(Piece::man(Color::Red)));
        assert_eq!(king(7), Some(Piece::king(Color::Black)));
        assert_eq!(position.to_fen(), "R:B1,2,K7:R21,K30");
    }

    #[test]
    fn to_fen_round_trips() {
        let fen = "B:B1,2,K7:R21,K30";
        assert_eq!(Position::parse_fen(fen).unwrap().to_fen(), fen);
        let empty = "R:B:R";
        assert_eq!(Position::parse_fen(empty).unwrap().to_fen(), empty);
    }

    #[test]
    fn men_on_the_king_row_are_kings() {
        let position = Position::parse_fen("B:B30:R1").unwrap();
        assert_eq!(position.to_fen(), "B:BK30:RK1");
        assert_eq!(position.get_legal_moves().len(), 2);
        assert!(!position.is_terminal());
    }

    #[test]
    fn too_many_pieces() {
        assert!(Position::parse_fen("B:B1-12:R21-32").is_ok());
        let error = Position::parse_fen("B:BK29:R1,9-20").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ParseFenMalformed);
        let error = Position::parse_fen("R:B1-13:R32").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ParseFenMalformed);
    }

    #[test]
    fn malformed_notation() {
        let malformed = [
            "",
            "X:B1:R2",
            "BR:B1:R2",
            "B:B1:B2",
            "B:B33:R1",
            "B:B1,1:R2",
            "B:B1:R1",
            "B:Q1:R2",
            "B:B12-1:R30",
        ];
        for fen in malformed {
            let error = Position::parse_fen(fen).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::ParseFenMalformed, "{fen}");
        }
    }
}
