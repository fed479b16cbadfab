//! Quiescence search: extends the leaves of the main search through
//! tactical moves only (captures, promotions, en passant), so the
//! static evaluation that terminates the main search is never taken at
//! a node where a capture sequence is still pending.

use crate::eval;
use crate::movegen;
use crate::movepicker::MovePicker;
use crate::position::Move;
use crate::see;
use crate::tt::{Bound, TranspositionTable, TtEntry};
use crate::eval::nnue::NnueNetwork;

use super::negamax::mate_in;
use super::params;
use super::stack::ThreadData;
use super::{MATE_SCORE, MAX_PLY};

fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= super::MATE_FOUND {
        score - ply as i32
    } else if score <= -super::MATE_FOUND {
        score + ply as i32
    } else {
        score
    }
}

fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= super::MATE_FOUND {
        score + ply as i32
    } else if score <= -super::MATE_FOUND {
        score - ply as i32
    } else {
        score
    }
}

pub fn quiescence(
    td: &mut ThreadData,
    tt: &TranspositionTable,
    network: &NnueNetwork,
    mut alpha: i32,
    beta: i32,
    ply: usize,
) -> i32 {
    if td.stopped() {
        return 0;
    }
    td.bump_node();
    if ply + 1 > td.seldepth {
        td.seldepth = ply + 1;
    }

    if ply >= MAX_PLY - 1 {
        return if td.position.in_check() {
            0
        } else {
            eval::network_eval(&td.position, &td.accumulator, network)
        };
    }
    if td.position.is_draw() {
        return 0;
    }

    let in_check = td.position.in_check();
    let key = td.position.key;
    let tt_hit: Option<TtEntry> = tt.probe(key);
    let mut tt_move = Move::NONE;

    if let Some(entry) = tt_hit {
        tt_move = entry.best_move;
        let tt_score = score_from_tt(entry.score as i32, ply);
        let cutoff = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => tt_score >= beta,
            Bound::Upper => tt_score <= alpha,
            Bound::None => false,
        };
        if cutoff {
            return tt_score;
        }
    }

    let raw_eval = if in_check {
        0
    } else if let Some(entry) = tt_hit {
        let mut e = entry.eval as i32;
        let tt_score = score_from_tt(entry.score as i32, ply);
        match entry.bound {
            Bound::Lower if tt_score > e => e = tt_score,
            Bound::Upper if tt_score < e => e = tt_score,
            _ => {}
        }
        e
    } else {
        eval::network_eval(&td.position, &td.accumulator, network)
    };

    let mut best_score = if in_check { -(MATE_SCORE + 1) } else { raw_eval };
    if !in_check {
        if best_score >= beta {
            return best_score;
        }
        alpha = alpha.max(best_score);
    }

    let mut best_move = Move::NONE;
    let orig_alpha = alpha;
    let empty_continuations = [None; 4];
    let mut picker = MovePicker::new_qsearch(tt_move, in_check);
    let mut legal_moves_found = 0usize;

    while let Some(mv) = picker.next(&td.position, &td.history, &empty_continuations, true) {
        if !movegen::is_legal(&mut td.position, mv) {
            continue;
        }
        legal_moves_found += 1;

        if !in_check && mv.is_tactical() {
            if raw_eval + params::QSEARCH_DELTA_MARGIN <= alpha && !see::see_ge(&td.position, mv, 1) {
                continue;
            }
        }

        let acc_snapshot = td.accumulator.clone();
        let (undo, delta) = td.position.make_move(mv);
        eval::sync_accumulator(&mut td.accumulator, &td.position, &delta, network);
        let score = -quiescence(td, tt, network, -beta, -alpha, ply + 1);
        td.position.unmake_move(mv, undo);
        td.accumulator = acc_snapshot;

        if td.stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    if in_check && legal_moves_found == 0 {
        return mate_in(ply);
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if best_score <= orig_alpha {
        Bound::Upper
    } else {
        Bound::Exact
    };
    tt.store(
        key,
        TtEntry {
            eval: raw_eval.clamp(i16::MIN as i32 + 1, i16::MAX as i32) as i16,
            score: score_to_tt(best_score, ply).clamp(i16::MIN as i32 + 1, i16::MAX as i32) as i16,
            best_move,
            depth: 0,
            bound,
        },
    );

    best_score.clamp(-MATE_SCORE, MATE_SCORE)
}
