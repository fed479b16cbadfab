//! The principal variation search routine: alpha-beta negamax with
//! null-move pruning, reverse futility, razoring, late-move reductions,
//! late-move/futility/SEE pruning, singular extensions, and internal
//! iterative reduction. Structured in a fixed order per node: base
//! cases, TT probe, static eval, non-PV pruning, the staged move loop,
//! then the terminal/TT-store bookkeeping.

use crate::eval;
use crate::movegen;
use crate::movepicker::MovePicker;
use crate::position::{Move, PieceKind};
use crate::see;
use crate::tt::{Bound, TranspositionTable, TtEntry};
use crate::eval::nnue::NnueNetwork;

use super::params;
use super::quiescence::quiescence;
use super::{MATE_FOUND, MATE_SCORE, MAX_PLY};
use super::stack::ThreadData;

/// Score a checkmate finds at `ply`, expressed so that shallower mates
/// (found sooner) always outrank deeper ones once negated up the tree.
#[must_use]
pub fn mate_in(ply: usize) -> i32 {
    -MATE_SCORE + ply as i32
}

fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_FOUND {
        score + ply as i32
    } else if score <= -MATE_FOUND {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_FOUND {
        score - ply as i32
    } else if score <= -MATE_FOUND {
        score + ply as i32
    } else {
        score
    }
}

fn has_non_pawn_material(pos: &crate::position::Position, color: crate::position::Color) -> bool {
    use crate::position::PieceKind as Pk;
    let occ = pos.occupancy_of(color);
    let minor_major = occ & !(pos.pieces_of(color, Pk::Pawn) | pos.pieces_of(color, Pk::King));
    !minor_major.is_empty()
}

fn clamp_tt_score(score: i32) -> i16 {
    score.clamp(i16::MIN as i32 + 1, i16::MAX as i32) as i16
}

/// Principal variation search over one node. `alpha`/`beta` are from
/// the side to move's perspective; `cut_node` flags a node expected to
/// fail high, used to bias LMR and the singular-extension reduction.
#[allow(clippy::too_many_arguments)]
pub fn negamax(
    td: &mut ThreadData,
    tt: &TranspositionTable,
    network: &NnueNetwork,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    cut_node: bool,
    ply: usize,
) -> i32 {
    let pv_node = beta - alpha > 1;
    let is_root = ply == 0;

    if td.stopped() {
        return 0;
    }
    td.bump_node();
    if ply + 1 > td.seldepth {
        td.seldepth = ply + 1;
    }

    if depth <= 0 {
        return quiescence(td, tt, network, alpha, beta, ply);
    }

    if !is_root && td.position.is_draw() {
        return 0;
    }

    if ply >= MAX_PLY - 1 {
        return if td.position.in_check() {
            0
        } else {
            eval::network_eval(&td.position, &td.accumulator, network)
        };
    }

    // Mate-distance pruning: a shorter mate than one already guaranteed
    // elsewhere in the tree can never improve the result.
    alpha = alpha.max(mate_in(ply));
    beta = beta.min(-mate_in(ply + 1));
    if alpha >= beta {
        return alpha;
    }

    let in_check = td.position.in_check();
    let excluded = td.stack[ply].excluded_move;
    let key = td.position.key;

    let tt_hit: Option<TtEntry> = if excluded.is_none() { tt.probe(key) } else { None };
    let mut tt_move = Move::NONE;
    let mut depth = depth;

    if let Some(entry) = tt_hit {
        tt_move = entry.best_move;
        if entry.depth as i32 >= depth && !pv_node {
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
    } else if depth >= params::IIR_MIN_DEPTH as i32 && !pv_node {
        depth -= 1;
    }

    // Static evaluation, refined by whatever the TT already knows.
    let raw_eval: i32;
    let static_eval: Option<i32>;
    if in_check {
        raw_eval = 0;
        static_eval = None;
    } else if !excluded.is_none() {
        raw_eval = td.stack[ply].static_eval.unwrap_or(0);
        static_eval = td.stack[ply].static_eval;
    } else if let Some(entry) = tt_hit {
        let mut e = entry.eval as i32;
        let tt_score = score_from_tt(entry.score as i32, ply);
        match entry.bound {
            Bound::Lower if tt_score > e => e = tt_score,
            Bound::Upper if tt_score < e => e = tt_score,
            _ => {}
        }
        raw_eval = entry.eval as i32;
        static_eval = Some(e);
    } else {
        raw_eval = eval::network_eval(&td.position, &td.accumulator, network);
        static_eval = Some(raw_eval);
    }
    td.stack[ply].static_eval = static_eval;

    let corrected_eval = static_eval.map(|e| {
        e + td
            .history
            .correction
            .correction(td.position.side_to_move, td.position.pawn_key())
    });
    let eval = corrected_eval.unwrap_or(0);

    let improving = !in_check
        && match (ply >= 2, ply >= 4) {
            (true, _) if td.stack[ply - 2].static_eval.is_some() => {
                static_eval.unwrap() > td.stack[ply - 2].static_eval.unwrap()
            }
            (_, true) if td.stack[ply - 4].static_eval.is_some() => {
                static_eval.unwrap() > td.stack[ply - 4].static_eval.unwrap()
            }
            _ => true,
        };

    // Non-PV pruning: skipped at root since the root call always uses a
    // full window, and skipped whenever in check or searching under an
    // exclusion (singular-extension verification).
    if !pv_node && !in_check && excluded.is_none() {
        if depth <= params::REVERSE_FUTILITY_MAX_DEPTH as i32
            && eval.abs() < MATE_FOUND
            && eval - params::REVERSE_FUTILITY_MARGIN * (depth - improving as i32) >= beta
        {
            return eval;
        }

        let prev_was_null = ply > 0 && td.stack[ply - 1].current_move == crate::position::NULL_MOVE;
        if eval >= beta
            && !prev_was_null
            && ply >= td.nmp_min_ply
            && has_non_pawn_material(&td.position, td.position.side_to_move)
        {
            let r = params::NMP_BASE
                + depth / params::NMP_DEPTH_DIV
                + ((eval - beta) / params::NMP_EVAL_DIV).min(params::NMP_EVAL_CAP);
            let reduced = (depth - 1 - r).max(0);
            let undo = td.position.make_null_move();
            td.stack[ply].current_move = crate::position::NULL_MOVE;
            td.stack[ply].moved_piece = PieceKind::None;
            let null_score = -negamax(td, tt, network, reduced, -beta, -beta + 1, !cut_node, ply + 1);
            td.position.unmake_null_move(undo);

            if null_score >= beta {
                let clamped = if null_score > MATE_FOUND { beta } else { null_score };
                if depth < params::NMP_VERIFY_DEPTH as i32 || td.nmp_verification_guard {
                    return clamped;
                }
                let prior_guard = td.nmp_verification_guard;
                let prior_min_ply = td.nmp_min_ply;
                td.nmp_verification_guard = true;
                td.nmp_min_ply = ply + 3 * (depth - r).max(0) as usize / 4;
                let verify = negamax(td, tt, network, reduced, beta - 1, beta, false, ply);
                td.nmp_verification_guard = prior_guard;
                td.nmp_min_ply = prior_min_ply;
                if verify >= beta {
                    return clamped;
                }
            }
        }

        if depth <= params::RAZORING_MAX_DEPTH as i32 && eval + params::RAZORING_MARGIN * depth < alpha {
            let razor_score = quiescence(td, tt, network, alpha, alpha + 1, ply);
            if razor_score <= alpha {
                return razor_score;
            }
        }
    }

    let prev_frame = if ply > 0 { Some(td.stack[ply - 1]) } else { None };
    let counter_move = match prev_frame {
        Some(f) if !f.current_move.is_none() && f.moved_piece != PieceKind::None => {
            td.history.counter_move.get(f.moved_piece, f.current_move.to())
        }
        _ => Move::NONE,
    };
    let continuations = td.continuations_at(ply);
    let killers = td.stack[ply].killers;

    let mut picker = MovePicker::new(tt_move, killers, counter_move);
    let mut skip_quiets = false;
    let mut moves_tried: usize = 0;
    let mut legal_moves_found: usize = 0;
    let mut best_score = -(MATE_SCORE + 1);
    let mut best_move = Move::NONE;
    let orig_alpha = alpha;
    let mut tried_quiets: Vec<Move> = Vec::new();
    let mut tried_captures: Vec<Move> = Vec::new();

    td.pv.clear_ply(ply + 1);

    while let Some(mv) = picker.next(&td.position, &td.history, &continuations, skip_quiets) {
        if mv == excluded {
            continue;
        }
        if !movegen::is_legal(&mut td.position, mv) {
            continue;
        }

        legal_moves_found += 1;
        moves_tried += 1;
        let is_quiet = !mv.is_tactical();

        if !pv_node
            && !in_check
            && moves_tried > params::lmp_margin((depth.max(0)) as u32, improving)
        {
            skip_quiets = true;
        }

        if !in_check && is_quiet {
            let lmr_depth = (depth - params::lmr_reduction(true, depth.max(0) as u32, moves_tried)).max(0);
            if lmr_depth < params::FUTILITY_MAX_LMR_DEPTH
                && eval + params::FUTILITY_BASE + params::FUTILITY_DEPTH_MULT * lmr_depth <= alpha
            {
                skip_quiets = true;
                continue;
            }
        }

        if depth <= params::SEE_PRUNE_MAX_DEPTH as i32 && !is_root {
            let lmr_depth =
                (depth - params::lmr_reduction(is_quiet, depth.max(0) as u32, moves_tried)).max(0);
            let margin = if is_quiet {
                params::see_margin_quiet(lmr_depth)
            } else {
                params::see_margin_noisy(lmr_depth)
            };
            if !see::see_ge(&td.position, mv, margin) {
                continue;
            }
        }

        let mut extension = 0i32;
        if !is_root
            && depth >= params::SINGULAR_MIN_DEPTH as i32
            && mv == tt_move
            && excluded.is_none()
        {
            if let Some(entry) = tt_hit {
                if entry.bound == Bound::Lower
                    && (entry.score as i32).abs() < MATE_SCORE
                    && entry.depth as i32 >= depth - 3
                {
                    let singular_beta = entry.score as i32 - depth;
                    td.stack[ply].excluded_move = mv;
                    let sing_depth = (depth - 1) / 2;
                    let sing_score =
                        negamax(td, tt, network, sing_depth, singular_beta - 1, singular_beta, cut_node, ply);
                    td.stack[ply].excluded_move = Move::NONE;

                    if sing_score < singular_beta {
                        extension = 1;
                        if !pv_node
                            && sing_score < singular_beta - params::SINGULAR_DEPTH_MARGIN
                            && td.stack[ply].double_extensions < params::DOUBLE_EXTENSION_LIMIT
                        {
                            extension = 2;
                            td.stack[ply].double_extensions += 1;
                        }
                    } else if singular_beta >= beta {
                        return singular_beta;
                    } else if entry.score as i32 >= beta {
                        extension = -2;
                    } else if cut_node {
                        extension = -1;
                    }
                }
            }
        }

        let moved_kind = td.position.piece_on(mv.from());
        let acc_snapshot = td.accumulator.clone();
        let nodes_before = td.nodes;
        let (undo, delta) = td.position.make_move(mv);
        eval::sync_accumulator(&mut td.accumulator, &td.position, &delta, network);
        let gives_check = td.position.in_check();

        td.stack[ply].current_move = mv;
        td.stack[ply].moved_piece = moved_kind;
        td.pv.clear_ply(ply + 1);

        let new_depth = depth - 1 + extension;
        let score = if moves_tried == 1 {
            -negamax(td, tt, network, new_depth, -beta, -alpha, false, ply + 1)
        } else {
            let mut s;
            if moves_tried > (1 + pv_node as usize) && depth >= 3 && is_quiet {
                let mut r = params::lmr_reduction(true, depth.max(0) as u32, moves_tried);
                r += if cut_node { 2 } else { 0 };
                r += if !improving { 1 } else { 0 };
                if mv == killers[0] || mv == killers[1] || mv == counter_move {
                    r -= 1;
                }
                if gives_check {
                    r -= 1;
                }
                let hist_score = td.history.quiet_score(&td.position, mv, &continuations);
                r -= hist_score / params::LMR_HISTORY_DIV;
                let reduced_depth = (new_depth - r).max(1);
                s = -negamax(td, tt, network, reduced_depth, -alpha - 1, -alpha, true, ply + 1);
                if s > alpha && reduced_depth < new_depth {
                    s = -negamax(td, tt, network, new_depth, -alpha - 1, -alpha, !cut_node, ply + 1);
                }
            } else {
                s = -negamax(td, tt, network, new_depth, -alpha - 1, -alpha, !cut_node, ply + 1);
            }
            if s > alpha && s < beta && pv_node {
                s = -negamax(td, tt, network, new_depth, -beta, -alpha, false, ply + 1);
            }
            s
        };

        td.position.unmake_move(mv, undo);
        td.accumulator = acc_snapshot;

        if is_root {
            td.move_nodes[mv.from().index() as usize][mv.to().index() as usize] +=
                td.nodes.saturating_sub(nodes_before);
        }

        if td.stopped() {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
            if pv_node {
                td.pv.update(ply, mv);
            }
        }
        alpha = alpha.max(best_score);

        if score >= beta {
            let depth_u8 = depth.clamp(0, u8::MAX as i32) as u8;
            if is_quiet {
                update_quiet_stats(td, mv, depth_u8, ply, &continuations, &tried_quiets, counter_move);
            } else {
                update_noisy_stats(td, mv, depth_u8, &tried_captures);
            }
            break;
        }

        if is_quiet {
            tried_quiets.push(mv);
        } else {
            tried_captures.push(mv);
        }
    }

    if legal_moves_found == 0 {
        if !excluded.is_none() {
            return -(MATE_SCORE + 1);
        }
        return if in_check { mate_in(ply) } else { 0 };
    }

    if excluded.is_none() {
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
                score: clamp_tt_score(score_to_tt(best_score, ply)),
                best_move,
                depth: depth.clamp(0, u8::MAX as i32) as u8,
                bound,
            },
        );

        if !in_check && (best_move.is_none() || !best_move.is_tactical()) {
            let eligible = match bound {
                Bound::Lower => best_score >= raw_eval,
                Bound::Upper => best_score <= raw_eval,
                Bound::Exact => true,
                Bound::None => false,
            };
            if eligible {
                td.history.correction.update(
                    td.position.side_to_move,
                    td.position.pawn_key(),
                    best_score,
                    raw_eval,
                    depth.clamp(0, u8::MAX as i32) as u8,
                );
            }
        }
    }

    best_score
}

#[allow(clippy::too_many_arguments)]
fn update_quiet_stats(
    td: &mut ThreadData,
    mv: Move,
    depth: u8,
    ply: usize,
    continuations: &crate::movepicker::Continuations,
    tried_quiets: &[Move],
    counter_move: Move,
) {
    let _ = counter_move;
    let bonus = crate::history::history_bonus(depth);
    let malus = crate::history::history_malus(depth);
    let us = td.position.side_to_move;

    if mv != td.stack[ply].killers[0] {
        td.stack[ply].killers[1] = td.stack[ply].killers[0];
        td.stack[ply].killers[0] = mv;
    }
    if ply > 0 {
        let prev = td.stack[ply - 1];
        if !prev.current_move.is_none() && prev.moved_piece != PieceKind::None {
            td.history
                .counter_move
                .set(prev.moved_piece, prev.current_move.to(), mv);
        }
    }

    td.history.butterfly.update(us, mv, bonus);
    let piece = td.position.piece_on(mv.from());
    for anc in continuations.iter().flatten() {
        td.history.continuation.update(anc.0, anc.1, piece, mv.to(), bonus);
    }
    for &prev in tried_quiets {
        td.history.butterfly.update(us, prev, malus);
        let prev_piece = td.position.piece_on(prev.from());
        for anc in continuations.iter().flatten() {
            td.history
                .continuation
                .update(anc.0, anc.1, prev_piece, prev.to(), malus);
        }
    }
}

fn update_noisy_stats(td: &mut ThreadData, mv: Move, depth: u8, tried_captures: &[Move]) {
    let bonus = crate::history::history_bonus(depth);
    let malus = crate::history::history_malus(depth);
    let attacker = td.position.piece_on(mv.from());
    let victim = if mv.is_en_passant() {
        PieceKind::Pawn
    } else {
        td.position.piece_on(mv.to())
    };
    td.history.capture.update(attacker, mv.to(), victim, bonus);
    for &prev in tried_captures {
        let prev_attacker = td.position.piece_on(prev.from());
        let prev_victim = if prev.is_en_passant() {
            PieceKind::Pawn
        } else {
            td.position.piece_on(prev.to())
        };
        td.history.capture.update(prev_attacker, prev.to(), prev_victim, malus);
    }
}
