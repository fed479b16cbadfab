//! Forsyth-Edwards Notation parsing and serialization.
//!
//! Not itself a searched-over concern, but `Position::startpos` and the
//! test suite's reference positions both need it, so it lives alongside
//! the rest of board construction rather than behind a driver-only gate.

use super::{
    Color, PieceKind, Position, Square, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE,
    CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE, NO_SQUARE,
};
use crate::error::FenError;

impl Position {
    /// Parse a FEN string into a `Position`. Rejects boards with zero or
    /// more than one king per side; anything past the first four fields
    /// (halfmove clock, fullmove number) is optional and defaults to 0/1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::TooFewFields { found: fields.len() });
        }

        let mut pos = Position::empty();
        parse_board(&mut pos, fields[0])?;
        pos.side_to_move = parse_side_to_move(fields[1])?;
        pos.castling_rights = parse_castling(fields[2])?;
        pos.en_passant = parse_en_passant(fields[3])?;

        pos.halfmove_clock = if fields.len() > 4 {
            fields[4]
                .parse()
                .map_err(|_| FenError::InvalidHalfmoveClock { found: fields[4].to_string() })?
        } else {
            0
        };
        pos.fullmove_number = if fields.len() > 5 {
            fields[5]
                .parse()
                .map_err(|_| FenError::InvalidFullmoveNumber { found: fields[5].to_string() })?
        } else {
            1
        };

        for color in [Color::White, Color::Black] {
            let kings = pos.pieces_of(color, PieceKind::King).popcount();
            if kings == 0 {
                return Err(FenError::MissingKing { color });
            }
            if kings > 1 {
                return Err(FenError::TooManyKings { color });
            }
        }

        pos.key = pos.recompute_key();
        pos.history.push(pos.key);
        pos.recompute_derived();
        Ok(pos)
    }

    /// Recompute `in_check` and invalidate the attacked-squares cache;
    /// called after any bulk mutation that bypasses `make_move` (FEN
    /// parsing, test fixtures).
    pub(crate) fn recompute_derived(&mut self) {
        self.attacked_cache = [None, None];
        let us = self.side_to_move;
        let king_sq = self.king_square(us);
        self.in_check = self.is_attacked(king_sq, us.opposite());
    }

    /// Serialize to FEN. Round-trips with `from_fen` for any position
    /// this crate produces internally.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut s = String::new();
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                let kind = self.piece_on(sq);
                if kind == PieceKind::None {
                    empty_run += 1;
                    continue;
                }
                if empty_run > 0 {
                    s.push_str(&empty_run.to_string());
                    empty_run = 0;
                }
                let color = self.color_on(sq).expect("non-empty square has a color");
                s.push(kind.to_char(color));
            }
            if empty_run > 0 {
                s.push_str(&empty_run.to_string());
            }
            ranks.push(s);
        }
        let board = ranks.join("/");

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        if self.castling_rights & CASTLE_WHITE_KINGSIDE != 0 {
            castling.push('K');
        }
        if self.castling_rights & CASTLE_WHITE_QUEENSIDE != 0 {
            castling.push('Q');
        }
        if self.castling_rights & CASTLE_BLACK_KINGSIDE != 0 {
            castling.push('k');
        }
        if self.castling_rights & CASTLE_BLACK_QUEENSIDE != 0 {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = if self.en_passant.is_none() {
            "-".to_string()
        } else {
            self.en_passant.to_algebraic()
        };

        format!(
            "{board} {side} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }
}

fn parse_board(pos: &mut Position, board_field: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                if file > 8 {
                    return Err(FenError::TooManyFiles { rank: rank as usize });
                }
                continue;
            }
            if file >= 8 {
                return Err(FenError::TooManyFiles { rank: rank as usize });
            }
            let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
            let kind = PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
            pos.set_piece(Square::from_file_rank(file, rank), color, kind);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::TooFewFiles { rank: rank as usize });
        }
    }
    Ok(())
}

fn parse_side_to_move(field: &str) -> Result<Color, FenError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(FenError::InvalidSideToMove { found: other.to_string() }),
    }
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for c in field.chars() {
        rights |= match c {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            other => return Err(FenError::InvalidCastling { char: other }),
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Square, FenError> {
    if field == "-" {
        return Ok(NO_SQUARE);
    }
    Square::from_algebraic(field).map_err(|_| FenError::InvalidEnPassant { found: field.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const KIWIPETE_FEN: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn startpos_round_trips() {
        let pos = Position::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(pos.to_fen(), STARTPOS_FEN);
    }

    #[test]
    fn kiwipete_round_trips() {
        let pos = Position::from_fen(KIWIPETE_FEN).unwrap();
        assert_eq!(pos.to_fen(), KIWIPETE_FEN);
    }

    #[test]
    fn rejects_board_missing_a_king() {
        let err = Position::from_fen("8/8/8/8/8/8/8/7K w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::MissingKing { color: Color::Black });
    }

    #[test]
    fn rejects_wrong_rank_count() {
        let err = Position::from_fen("8/8/8 w - - 0 1").unwrap_err();
        assert_eq!(err, FenError::WrongRankCount { found: 3 });
    }

    #[test]
    fn rejects_bad_side_to_move() {
        let err = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
        )
        .unwrap_err();
        assert_eq!(err, FenError::InvalidSideToMove { found: "x".to_string() });
    }

    #[test]
    fn en_passant_target_parses() {
        let pos = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        )
        .unwrap();
        assert_eq!(pos.en_passant, Square::from_algebraic("d6").unwrap());
    }
}
