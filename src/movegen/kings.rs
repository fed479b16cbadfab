use super::MoveList;
use crate::position::{king_attacks, Move, MoveFlag, PieceKind, Position, Square};

pub(crate) fn generate(pos: &Position, from: Square, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let targets = king_attacks(from) & !pos.occupancy_of(us);
    for to in targets {
        let flag = if pos.color_on(to).is_some() { MoveFlag::Capture } else { MoveFlag::Quiet };
        moves.push(Move::new(from, to, flag));
    }
    generate_castles(pos, from, moves);
}

pub(crate) fn generate_tactical(pos: &Position, from: Square, moves: &mut MoveList) {
    let them = pos.side_to_move.opposite();
    let targets = king_attacks(from) & pos.occupancy_of(them);
    for to in targets {
        moves.push(Move::new(from, to, MoveFlag::Capture));
    }
}

/// Emit castle pseudo-moves gated on rights and an empty path between
/// king and rook. Whether the king passes through or lands on an
/// attacked square is checked later, during legal-move filtering,
/// since that's where attacked-square computation already happens.
fn generate_castles(pos: &Position, from: Square, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let rank = from.rank();
    let occ = pos.occupancy_all();

    if pos.can_castle_kingside(us) {
        let rook_sq = Square::from_file_rank(7, rank);
        let path = crate::position::ray_between(from, rook_sq);
        if (path & occ).is_empty() && pos.piece_on(rook_sq) == PieceKind::Rook {
            moves.push(Move::new(from, Square::from_file_rank(6, rank), MoveFlag::CastleKingside));
        }
    }
    if pos.can_castle_queenside(us) {
        let rook_sq = Square::from_file_rank(0, rank);
        let path = crate::position::ray_between(from, rook_sq);
        if (path & occ).is_empty() && pos.piece_on(rook_sq) == PieceKind::Rook {
            moves.push(Move::new(from, Square::from_file_rank(2, rank), MoveFlag::CastleQueenside));
        }
    }
}
