//! Static exchange evaluation: the material balance left on a square
//! after both sides trade off every attacker and defender in ascending
//! value order. Used by the move picker to sort captures and by search
//! pruning to discard exchanges that lose material outright.

use crate::bitboard::Bitboard;
use crate::movegen::attackers_to;
use crate::position::{bishop_attacks, rook_attacks, Color, Move, PieceKind, Position, Square};

/// Piece values for the exchange ladder, independent of [`crate::position::PIECE_VALUE`]'s
/// evaluation weights: SEE only needs their relative ascending order.
const SEE_VALUES: [i32; 7] = [20000, 900, 500, 330, 320, 100, 0];

/// The exchange-ladder value `see()` assigns a captured piece kind,
/// independent of [`crate::position::PIECE_VALUE`]'s evaluation weights.
#[inline]
#[must_use]
pub fn value_of(kind: PieceKind) -> i32 {
    SEE_VALUES[kind.index()]
}

/// Recompute the sliding attackers a removed piece may have unmasked,
/// restricted to sliders that can actually reach `target` through
/// `occ`. Cheaper than calling [`attackers_to`] for every piece kind
/// again: only bishops/rooks/queens can gain new lines of sight when a
/// blocker is removed.
fn reveal_sliders(pos: &Position, target: Square, occ: Bitboard) -> Bitboard {
    let mut revealed = Bitboard::EMPTY;
    for color in [Color::White, Color::Black] {
        let diag = bishop_attacks(target, occ) & (pos.pieces_of(color, PieceKind::Bishop) | pos.pieces_of(color, PieceKind::Queen));
        revealed |= diag & occ;
        let ortho = rook_attacks(target, occ) & (pos.pieces_of(color, PieceKind::Rook) | pos.pieces_of(color, PieceKind::Queen));
        revealed |= ortho & occ;
    }
    revealed
}

fn least_valuable_attacker(pos: &Position, attackers: Bitboard, color: Color) -> Option<(Square, PieceKind)> {
    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let candidates = attackers & pos.pieces_of(color, kind);
        if let Some(sq) = candidates.first_square() {
            return Some((sq, kind));
        }
    }
    None
}

/// Static exchange evaluation for `mv`, assumed to be a capture (or en
/// passant) pseudo-legal from `pos`. Returns the net material gain in
/// centipawns from the mover's perspective after both sides exhaust
/// every profitable recapture on `mv.to()`; zero for non-captures.
#[must_use]
pub fn see(pos: &Position, mv: Move) -> i32 {
    let to = mv.to();
    let from = mv.from();

    let victim_kind = if mv.is_en_passant() {
        PieceKind::Pawn
    } else {
        let captured = pos.piece_on(to);
        if captured == PieceKind::None {
            return 0;
        }
        captured
    };
    let attacker_kind = pos.piece_on(from);
    if attacker_kind == PieceKind::None {
        return 0;
    }

    let mut side = pos.side_to_move.opposite();
    let mut occ = pos.occupancy_all();
    occ.clear(from);
    if mv.is_en_passant() {
        let captured_sq = Square::from_file_rank(to.file(), from.rank());
        occ.clear(captured_sq);
    } else {
        occ.clear(to);
    }
    occ.set(to);

    let mut attackers = attackers_to(pos, to, occ) & occ;
    attackers |= reveal_sliders(pos, to, occ) & occ;

    let mut gains = [0i32; 32];
    let mut depth = 0usize;
    gains[0] = value_of(victim_kind);
    let mut current_value = value_of(attacker_kind);

    loop {
        let side_attackers = attackers & pos.occupancy_of(side);
        if side_attackers.is_empty() {
            break;
        }
        let Some((sq, kind)) = least_valuable_attacker(pos, side_attackers, side) else {
            break;
        };

        depth += 1;
        if depth >= gains.len() {
            break;
        }
        gains[depth] = current_value - gains[depth - 1];

        if (-gains[depth - 1]).max(gains[depth]) < 0 {
            depth -= 1;
            break;
        }

        occ.clear(sq);
        attackers.clear(sq);
        attackers |= reveal_sliders(pos, to, occ) & occ;

        if kind == PieceKind::King {
            let opponent_attackers = attackers & pos.occupancy_of(side.opposite());
            if !opponent_attackers.is_empty() {
                depth -= 1;
                break;
            }
        }

        current_value = value_of(kind);
        side = side.opposite();
    }

    while depth > 0 {
        depth -= 1;
        gains[depth] = -(-gains[depth]).max(gains[depth + 1]);
    }
    gains[0]
}

/// True when `see(pos, mv) >= threshold`, the form search pruning and
/// move ordering actually want (avoids callers re-deriving the sign
/// convention of [`see`]).
#[must_use]
pub fn see_ge(pos: &Position, mv: Move, threshold: i32) -> bool {
    see(pos, mv) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn winning_pawn_capture_is_undefended() {
        let pos = Position::from_fen("8/8/8/3p4/4P3/8/8/8 w - - 0 1").unwrap();
        let mv = crate::movegen::find_legal_move(
            &mut pos.clone(),
            Square::from_algebraic("e4").unwrap(),
            Square::from_algebraic("d5").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(see(&pos, mv), 100);
    }

    #[test]
    fn equal_pawn_trade_is_zero() {
        let pos = Position::from_fen("8/8/2p5/3p4/4P3/8/8/8 w - - 0 1").unwrap();
        let mv = crate::movegen::find_legal_move(
            &mut pos.clone(),
            Square::from_algebraic("e4").unwrap(),
            Square::from_algebraic("d5").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(see(&pos, mv), 0);
    }

    #[test]
    fn knight_takes_defended_pawn_loses_material() {
        let pos = Position::from_fen("8/8/2p5/3p4/4N3/8/8/8 w - - 0 1").unwrap();
        let mv = crate::movegen::find_legal_move(
            &mut pos.clone(),
            Square::from_algebraic("e4").unwrap(),
            Square::from_algebraic("d5").unwrap(),
            None,
        )
        .unwrap();
        assert!(see(&pos, mv) < 0);
    }

    #[test]
    fn undefended_rook_capture_wins_its_full_value() {
        let pos = Position::from_fen("8/8/8/3r4/8/8/8/3R4 w - - 0 1").unwrap();
        let mv = crate::movegen::find_legal_move(
            &mut pos.clone(),
            Square::from_algebraic("d1").unwrap(),
            Square::from_algebraic("d5").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(see(&pos, mv), 500);
    }

    #[test]
    fn see_ge_matches_see_threshold() {
        let pos = Position::from_fen("8/8/8/3p4/4P3/8/8/8 w - - 0 1").unwrap();
        let mv = crate::movegen::find_legal_move(
            &mut pos.clone(),
            Square::from_algebraic("e4").unwrap(),
            Square::from_algebraic("d5").unwrap(),
            None,
        )
        .unwrap();
        assert!(see_ge(&pos, mv, 100));
        assert!(!see_ge(&pos, mv, 101));
    }
}
