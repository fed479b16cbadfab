use super::MoveList;
use crate::position::{knight_attacks, Move, MoveFlag, Position, Square};

pub(crate) fn generate(pos: &Position, from: Square, moves: &mut MoveList) {
    let us = pos.side_to_move;
    let targets = knight_attacks(from) & !pos.occupancy_of(us);
    for to in targets {
        let flag = if pos.color_on(to).is_some() { MoveFlag::Capture } else { MoveFlag::Quiet };
        moves.push(Move::new(from, to, flag));
    }
}

pub(crate) fn generate_tactical(pos: &Position, from: Square, moves: &mut MoveList) {
    let them = pos.side_to_move.opposite();
    let targets = knight_attacks(from) & pos.occupancy_of(them);
    for to in targets {
        moves.push(Move::new(from, to, MoveFlag::Capture));
    }
}
