//! Iterative-deepening principal variation search over the primitives
//! defined elsewhere in the crate: `Position` for board state,
//! `MovePicker` for move ordering, `TranspositionTable` for shared
//! search memory, and the NNUE evaluator for leaf scoring. Worker
//! coordination built on top of this module lives in
//! [`crate::workers`].

pub mod negamax;
pub mod params;
pub mod pv;
pub mod quiescence;
pub mod stack;

pub use negamax::negamax;
pub use params::SearchParams;
pub use pv::PvTable;
pub use quiescence::quiescence;
pub use stack::{SearchInfo, StackFrame, ThreadData};

use crate::eval;
use crate::eval::nnue::NnueNetwork;
use crate::movegen;
use crate::position::Move;
use crate::tt::TranspositionTable;

/// Ply depth beyond which the search stack, PV table, and killer/
/// continuation-history lookups stop indexing: deep enough that no
/// reasonable search configuration reaches it through ordinary
/// recursion, shallow enough to keep the per-thread stack allocations
/// (`MAX_PLY` squared for the PV table) modest.
pub const MAX_PLY: usize = 128;

/// Score assigned to "mate in 0" at the root; every shallower mate is
/// `MATE_SCORE - ply`, every deeper one more negative, so comparisons
/// between mates found at different plies order correctly once negated
/// up the tree.
pub const MATE_SCORE: i32 = 32_000;

/// Any score at or above this magnitude is treated as "a mate was
/// found somewhere in this subtree" for TT mate-distance adjustment
/// and reverse-futility/NMP bailouts, leaving enough headroom below
/// `MATE_SCORE` to absorb `MAX_PLY` of distance adjustment.
pub const MATE_FOUND: i32 = MATE_SCORE - MAX_PLY as i32;

/// Sentinel alpha/beta bound wider than any real evaluation or mate
/// score, used to seed the root call of iterative deepening.
pub const INFINITY: i32 = MATE_SCORE + 1;

/// One completed (or aborted) iteration's result, handed to the
/// driver's `info` callback so it can report depth/score/nodes/PV as
/// iterative deepening proceeds.
#[derive(Clone, Debug)]
pub struct IterationInfo {
    pub depth: u32,
    pub seldepth: usize,
    pub score: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// Run iterative deepening from `td.position`'s current state up to
/// `max_depth`, widening an aspiration window around each iteration's
/// previous score and re-searching on either side it fails. Returns
/// the best move and ponder move from the last iteration that
/// completed without being interrupted by `td.info.stop`.
pub fn iterative_deepening(
    td: &mut ThreadData,
    tt: &TranspositionTable,
    network: &NnueNetwork,
    max_depth: u32,
    mut on_iteration: Option<&mut dyn FnMut(&IterationInfo)>,
) -> (Move, Option<Move>) {
    let fallback_move = movegen::generate_legal(&mut td.position)
        .as_slice()
        .first()
        .copied()
        .unwrap_or(Move::NONE);

    let mut best_move = fallback_move;
    let mut ponder_move = None;
    let mut prev_score = eval::network_eval(&td.position, &td.accumulator, network);

    for depth in 1..=max_depth {
        if td.stopped() {
            break;
        }
        td.root_depth = depth;
        td.seldepth = 0;

        let mut window = if depth <= 4 { INFINITY } else { 16 };
        let (mut alpha, mut beta) = if depth <= 4 {
            (-INFINITY, INFINITY)
        } else {
            ((prev_score - window).max(-INFINITY), (prev_score + window).min(INFINITY))
        };

        let score = loop {
            let s = negamax(td, tt, network, depth as i32, alpha, beta, false, 0);
            if td.stopped() {
                break s;
            }
            if s <= alpha {
                alpha = (alpha - window).max(-INFINITY);
                window *= 2;
            } else if s >= beta {
                beta = (beta + window).min(INFINITY);
                window *= 2;
            } else {
                break s;
            }
        };

        if td.stopped() && depth > 1 {
            break;
        }

        prev_score = score;
        let pv_line = td.pv.line(0);
        if !pv_line.is_empty() {
            best_move = pv_line[0];
            ponder_move = pv_line.get(1).copied();
        }

        if let Some(cb) = on_iteration.as_deref_mut() {
            cb(&IterationInfo {
                depth,
                seldepth: td.seldepth,
                score,
                nodes: td.nodes,
                pv: pv_line.to_vec(),
            });
        }

        if td.stopped() {
            break;
        }
    }

    (best_move, ponder_move)
}
