use super::MoveList;
use crate::bitboard::Bitboard;
use crate::position::{bishop_attacks, queen_attacks, rook_attacks, Move, MoveFlag, PieceKind, Position, Square};

#[derive(Clone, Copy)]
pub(crate) enum SliderKind {
    Bishop,
    Rook,
    Queen,
}

fn attacks_for(kind: SliderKind, sq: Square, occ: Bitboard) -> Bitboard {
    match kind {
        SliderKind::Bishop => bishop_attacks(sq, occ),
        SliderKind::Rook => rook_attacks(sq, occ),
        SliderKind::Queen => queen_attacks(sq, occ),
    }
}

pub(crate) fn generate(pos: &Position, from: Square, kind: SliderKind, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let occ = pos.occupancy_all();
    let targets = attacks_for(kind, from, occ) & !pos.occupancy_of(us);
    for to in targets {
        let flag = if pos.color_on(to).is_some() { MoveFlag::Capture } else { MoveFlag::Quiet };
        moves.push(Move::new(from, to, flag));
    }
}

pub(crate) fn generate_tactical(pos: &Position, from: Square, kind: SliderKind, moves: &mut MoveList) {
    let them = pos.side_to_move.opposite();
    let occ = pos.occupancy_all();
    let targets = attacks_for(kind, from, occ) & pos.occupancy_of(them);
    for to in targets {
        moves.push(Move::new(from, to, MoveFlag::Capture));
    }
}

#[allow(dead_code)]
pub(crate) fn kind_for(piece: PieceKind) -> SliderKind {
    match piece {
        PieceKind::Bishop => SliderKind::Bishop,
        PieceKind::Rook => SliderKind::Rook,
        PieceKind::Queen => SliderKind::Queen,
        _ => unreachable!("kind_for called with a non-slider piece kind"),
    }
}
