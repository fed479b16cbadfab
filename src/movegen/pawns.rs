use super::MoveList;
use crate::position::{Color, Move, MoveFlag, Position, Square, PROMOTION_KINDS};

pub(crate) fn generate(pos: &Position, from: Square, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let them = us.opposite();
    let occ = pos.occupancy_all();
    let dir: i8 = if us == Color::White { 1 } else { -1 };
    let start_rank: u8 = if us == Color::White { 1 } else { 6 };
    let promo_rank: u8 = if us == Color::White { 7 } else { 0 };

    let file = from.file() as i8;
    let rank = from.rank() as i8;
    let forward_rank = rank + dir;

    if (0..8).contains(&forward_rank) {
        let forward_sq = Square::from_file_rank(file as u8, forward_rank as u8);
        if !occ.test(forward_sq) {
            if forward_sq.rank() == promo_rank {
                push_promotions(moves, from, forward_sq, false);
            } else {
                moves.push(Move::new(from, forward_sq, MoveFlag::Quiet));
                if from.rank() == start_rank {
                    let double_rank = rank + 2 * dir;
                    let double_sq = Square::from_file_rank(file as u8, double_rank as u8);
                    if !occ.test(double_sq) {
                        moves.push(Move::new(from, double_sq, MoveFlag::DoublePawnPush));
                    }
                }
            }
        }

        for df in [-1i8, 1i8] {
            let capture_file = file + df;
            if !(0..8).contains(&capture_file) {
                continue;
            }
            let target = Square::from_file_rank(capture_file as u8, forward_rank as u8);
            if pos.color_on(target) == Some(them) {
                if target.rank() == promo_rank {
                    push_promotions(moves, from, target, true);
                } else {
                    moves.push(Move::new(from, target, MoveFlag::Capture));
                }
            } else if target == pos.en_passant {
                moves.push(Move::new(from, target, MoveFlag::EnPassant));
            }
        }
    }
}

/// Tactical-only pawn moves (captures, en passant, promotions) for
/// quiescence search; quiet promotions to queen are still "noisy"
/// enough to matter so they're included, underpromotions are not.
pub(crate) fn generate_tactical(pos: &Position, from: Square, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let them = us.opposite();
    let dir: i8 = if us == Color::White { 1 } else { -1 };
    let promo_rank: u8 = if us == Color::White { 7 } else { 0 };

    let file = from.file() as i8;
    let rank = from.rank() as i8;
    let forward_rank = rank + dir;
    if !(0..8).contains(&forward_rank) {
        return;
    }

    let forward_sq = Square::from_file_rank(file as u8, forward_rank as u8);
    if forward_sq.rank() == promo_rank && !pos.occupancy_all().test(forward_sq) {
        moves.push(Move::new(from, forward_sq, MoveFlag::PromoQueen));
    }

    for df in [-1i8, 1i8] {
        let capture_file = file + df;
        if !(0..8).contains(&capture_file) {
            continue;
        }
        let target = Square::from_file_rank(capture_file as u8, forward_rank as u8);
        if pos.color_on(target) == Some(them) {
            if target.rank() == promo_rank {
                push_promotions(moves, from, target, true);
            } else {
                moves.push(Move::new(from, target, MoveFlag::Capture));
            }
        } else if target == pos.en_passant {
            moves.push(Move::new(from, target, MoveFlag::EnPassant));
        }
    }
}

fn push_promotions(moves: &mut MoveList, from: Square, to: Square, capture: bool) {
    for kind in PROMOTION_KINDS {
        moves.push(Move::new(from, to, MoveFlag::for_promotion(kind, capture)));
    }
}
