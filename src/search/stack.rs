//! Per-thread and per-ply search state. A `ThreadData` is exclusive to
//! one worker; nothing in it is shared except through the `Arc`s it
//! holds onto the transposition table, the NNUE network, and the
//! cooperative stop flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::eval::NnueAccumulator;
use crate::history::HistoryTables;
use crate::position::{Move, PieceKind, Position, Square};

use super::pv::PvTable;
use super::MAX_PLY;

/// Per-ply state threaded through the negamax recursion: ply, static
/// eval, current move, excluded move, killer moves, and a
/// double-extension counter. The continuation-history "pointer" is
/// just the `(piece, to)` pair of the move played at this ply, which
/// `MovePicker`'s continuation lookup walks back through via
/// [`ThreadData::continuations_at`].
#[derive(Clone, Copy)]
pub struct StackFrame {
    pub ply: usize,
    pub static_eval: Option<i32>,
    pub current_move: Move,
    pub moved_piece: PieceKind,
    pub excluded_move: Move,
    pub killers: [Move; 2],
    pub double_extensions: u32,
}

impl StackFrame {
    fn blank(ply: usize) -> Self {
        StackFrame {
            ply,
            static_eval: None,
            current_move: Move::NONE,
            moved_piece: PieceKind::None,
            excluded_move: Move::NONE,
            killers: [Move::NONE; 2],
            double_extensions: 0,
        }
    }
}

/// Time/node limits and the cooperative-cancellation flag shared by
/// every worker in a search. Thread 0 is the only one that evaluates
/// the clock and writes `stop`; every other thread only reads it.
pub struct SearchInfo {
    pub stop: Arc<AtomicBool>,
    pub node_limit: Option<u64>,
    pub hard_deadline: Option<Instant>,
    pub soft_deadline: Option<Instant>,
    pub start: Instant,
    pub is_main: bool,
    /// Aggregate node counter shared across all workers, bumped
    /// relaxed by each thread and summed by the driver on join.
    pub shared_nodes: Arc<AtomicU64>,
}

impl SearchInfo {
    #[must_use]
    pub fn infinite(stop: Arc<AtomicBool>, shared_nodes: Arc<AtomicU64>, is_main: bool) -> Self {
        SearchInfo {
            stop,
            node_limit: None,
            hard_deadline: None,
            soft_deadline: None,
            start: Instant::now(),
            is_main,
            shared_nodes,
        }
    }

    #[must_use]
    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Checked every 1024 nodes to amortize the clock read. Only
    /// thread 0 may set the shared flag; helper threads
    /// just observe whatever thread 0 (or an external `stop()` call)
    /// has already written.
    pub fn check_stop(&self, nodes_this_thread: u64) {
        if !self.is_main || nodes_this_thread % 1024 != 0 {
            return;
        }
        if let Some(limit) = self.node_limit {
            if self.shared_nodes.load(Ordering::Relaxed) >= limit {
                #[cfg(feature = "logging")]
                log::debug!("search stopped: node limit {limit} reached");
                self.stop.store(true, Ordering::Relaxed);
                return;
            }
        }
        if let Some(deadline) = self.hard_deadline {
            if Instant::now() >= deadline {
                #[cfg(feature = "logging")]
                log::debug!("search stopped: hard time deadline reached");
                self.stop.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// Everything one worker thread owns for the duration of a search.
/// Never shared: each worker gets its own `Position` (a deep copy of
/// the driver's root), its own PV/history tables, and its own NNUE
/// accumulator — only the transposition table and NNUE weights are
/// `Arc`-shared read access.
pub struct ThreadData {
    pub id: usize,
    pub position: Position,
    pub accumulator: NnueAccumulator,
    pub pv: PvTable,
    pub history: HistoryTables,
    pub stack: Box<[StackFrame; MAX_PLY]>,
    pub info: SearchInfo,
    pub nodes: u64,
    pub seldepth: usize,
    pub root_depth: u32,
    /// Ply below which null-move pruning may not recurse into another
    /// null move.
    pub nmp_min_ply: usize,
    /// Set while a null-move cutoff's verification re-search is in
    /// flight, so that re-search doesn't itself try to null-move-prune.
    pub nmp_verification_guard: bool,
    /// Per-move node counters indexed `[from][to]`, used to weight time
    /// allocation toward the root move the search spent the most
    /// effort on.
    pub move_nodes: Box<[[u64; 64]; 64]>,
}

impl ThreadData {
    #[must_use]
    pub fn new(id: usize, position: Position, accumulator: NnueAccumulator, info: SearchInfo) -> Self {
        ThreadData {
            id,
            position,
            accumulator,
            pv: PvTable::new(),
            history: HistoryTables::new(),
            stack: Box::new(std::array::from_fn(StackFrame::blank)),
            info,
            nodes: 0,
            seldepth: 0,
            root_depth: 0,
            nmp_min_ply: 0,
            nmp_verification_guard: false,
            move_nodes: Box::new([[0u64; 64]; 64]),
        }
    }

    #[inline]
    pub fn bump_node(&mut self) {
        self.nodes += 1;
        self.info.shared_nodes.fetch_add(1, Ordering::Relaxed);
        self.info.check_stop(self.nodes);
    }

    #[must_use]
    pub fn stopped(&self) -> bool {
        self.info.stopped()
    }

    /// The `(piece, to)` pairs of the ancestors at offsets 1, 2, 4, 6
    /// plies back from `ply`, for continuation-history lookup.
    #[must_use]
    pub fn continuations_at(&self, ply: usize) -> [Option<(PieceKind, Square)>; 4] {
        let mut out = [None; 4];
        for (slot, offset) in out.iter_mut().zip([1usize, 2, 4, 6]) {
            if offset <= ply {
                let frame = &self.stack[ply - offset];
                if !frame.current_move.is_none() && frame.moved_piece != PieceKind::None {
                    *slot = Some((frame.moved_piece, frame.current_move.to()));
                }
            }
        }
        out
    }
}
