//! Lazy-SMP worker pool: spawns N threads that each run iterative
//! deepening independently over a private copy of the root position,
//! sharing only the transposition table and NNUE weights.
//! Odd-numbered helper threads search one ply deeper than the main
//! thread so they seed the shared TT with results the main thread
//! hasn't reached yet, rather than all threads duplicating identical
//! work.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::eval;
use crate::eval::nnue::NnueNetwork;
use crate::movegen;
use crate::position::{Move, Position};
use crate::search::{iterative_deepening, IterationInfo, SearchInfo, ThreadData};
use crate::tt::TranspositionTable;

/// 32 MiB: deep negamax recursion (`MAX_PLY` frames, each carrying a
/// `Position` and an NNUE accumulator snapshot on the stack) needs more
/// than a thread's default 2-8 MiB stack.
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// `go(limits)`'s input: every field optional, mirroring the usual
/// UCI-style knobs. `depth`/`nodes`/`movetime_ms` are absolute caps;
/// the `*time_ms`/`*inc_ms`/`moves_to_go` group feeds the time
/// allocation formula in [`compute_time_budget`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Limits {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub moves_to_go: Option<u32>,
    pub infinite: bool,
}

/// Soft/hard deadlines derived from `Limits`, already resolved to this
/// side to move's clock via the time/inc/moves_to_go formula.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    pub soft_ms: Option<u64>,
    pub hard_ms: Option<u64>,
}

/// `base = time / (moves_to_go + 2) + inc * 3/4`; hard cap is `5 *
/// base`, clamped to leave `50ms` of clock before flagging.
#[must_use]
pub fn compute_time_budget(time_ms: u64, inc_ms: u64, moves_to_go: Option<u32>) -> TimeBudget {
    let movestogo = moves_to_go.unwrap_or(30);
    let base = time_ms / (movestogo as u64 + 2) + inc_ms * 3 / 4;
    let hard_ceiling = time_ms.saturating_sub(50);
    let hard = (base * 5).min(hard_ceiling).max(1);
    let soft = base.min(hard).max(1);
    TimeBudget {
        soft_ms: Some(soft),
        hard_ms: Some(hard),
    }
}

impl Limits {
    #[must_use]
    pub fn time_budget(&self, side_to_move_is_white: bool) -> TimeBudget {
        if let Some(movetime) = self.movetime_ms {
            return TimeBudget {
                soft_ms: Some(movetime),
                hard_ms: Some(movetime),
            };
        }
        let (time_ms, inc_ms) = if side_to_move_is_white {
            (self.wtime_ms, self.winc_ms.unwrap_or(0))
        } else {
            (self.btime_ms, self.binc_ms.unwrap_or(0))
        };
        match time_ms {
            Some(t) => compute_time_budget(t, inc_ms, self.moves_to_go),
            None => TimeBudget {
                soft_ms: None,
                hard_ms: None,
            },
        }
    }
}

/// One worker's outcome, used by the driver to pick a result after all
/// threads join: the best move comes from thread 0's most recently
/// completed iteration's PV[0].
#[derive(Clone, Debug)]
pub struct WorkerResult {
    pub worker_id: usize,
    pub best_move: Move,
    pub ponder_move: Option<Move>,
    pub depth: u32,
    pub nodes: u64,
}

/// Per-search configuration shared by every worker, distinct from
/// [`crate::search::SearchParams`]'s compile-time pruning tunables:
/// this is the caller-supplied envelope for one `go()` call.
#[derive(Clone)]
pub struct SearchConfig {
    pub num_threads: usize,
    pub max_depth: u32,
    pub node_limit: Option<u64>,
    pub budget: TimeBudget,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            num_threads: 1,
            max_depth: crate::search::MAX_PLY as u32 - 1,
            node_limit: None,
            budget: TimeBudget {
                soft_ms: None,
                hard_ms: None,
            },
        }
    }
}

/// Odd-numbered helper threads search one ply deeper than the target
/// depth, seeding the shared TT with entries the main thread (worker
/// 0, which always reports `info` and is authoritative for stopping)
/// hasn't reached yet by the time it gets there.
fn worker_depth_offset(worker_id: usize) -> i32 {
    match worker_id % 4 {
        1 | 3 => 1,
        _ => 0,
    }
}

/// Spawn `config.num_threads` workers over `root`, run iterative
/// deepening on each, join them all, and return thread 0's result
/// (falling back to the helper with the greatest completed depth if
/// thread 0 somehow produced no move at all).
pub fn run(
    root: &Position,
    tt: Arc<TranspositionTable>,
    network: Arc<NnueNetwork>,
    config: SearchConfig,
    stop: Arc<AtomicBool>,
    mut on_iteration: Option<Box<dyn FnMut(&IterationInfo) + Send>>,
) -> WorkerResult {
    let num_threads = config.num_threads.max(1);
    tt.new_search();

    let shared_nodes = Arc::new(AtomicU64::new(0));
    let start = Instant::now();
    let hard_deadline = config.budget.hard_ms.map(|ms| start + Duration::from_millis(ms));
    let soft_deadline = config.budget.soft_ms.map(|ms| start + Duration::from_millis(ms));

    let main_callback = on_iteration.take();
    let mut handles: Vec<JoinHandle<WorkerResult>> = Vec::with_capacity(num_threads);

    for worker_id in 0..num_threads {
        let position = root.clone();
        let tt = Arc::clone(&tt);
        let network = Arc::clone(&network);
        let stop = Arc::clone(&stop);
        let shared_nodes = Arc::clone(&shared_nodes);
        let node_limit = config.node_limit;
        let depth = ((config.max_depth as i32) + worker_depth_offset(worker_id)).max(1) as u32;
        let is_main = worker_id == 0;
        let mut cb = if is_main { main_callback.take() } else { None };

        let handle = thread::Builder::new()
            .name(format!("search-{worker_id}"))
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let mut info = SearchInfo::infinite(stop, shared_nodes, is_main);
                info.node_limit = node_limit;
                info.hard_deadline = hard_deadline;
                info.soft_deadline = soft_deadline;

                let accumulator = eval::refresh_accumulator(&position, &network);
                let mut td = ThreadData::new(worker_id, position, accumulator, info);

                let callback: Option<&mut dyn FnMut(&IterationInfo)> = match cb.as_mut() {
                    Some(f) => Some(f.as_mut()),
                    None => None,
                };
                let (best_move, ponder_move) =
                    iterative_deepening(&mut td, &tt, &network, depth, callback);

                WorkerResult {
                    worker_id,
                    best_move,
                    ponder_move,
                    depth: td.root_depth,
                    nodes: td.nodes,
                }
            })
            .expect("failed to spawn search worker thread");

        #[cfg(feature = "logging")]
        log::debug!("spawned search worker {worker_id} (depth {depth})");
        handles.push(handle);
    }

    let mut results: Vec<WorkerResult> = Vec::with_capacity(num_threads);
    for handle in handles {
        if let Ok(result) = handle.join() {
            #[cfg(feature = "logging")]
            log::debug!(
                "worker {} joined: depth {} nodes {}",
                result.worker_id,
                result.depth,
                result.nodes
            );
            results.push(result);
        }
    }
    stop.store(true, Ordering::Relaxed);

    let total_nodes: u64 = results.iter().map(|r| r.nodes).sum();

    let main_result = results.iter().find(|r| r.worker_id == 0 && !r.best_move.is_none());
    let mut chosen = main_result
        .or_else(|| results.iter().filter(|r| !r.best_move.is_none()).max_by_key(|r| r.depth))
        .cloned()
        .unwrap_or(WorkerResult {
            worker_id: 0,
            best_move: Move::NONE,
            ponder_move: None,
            depth: 0,
            nodes: 0,
        });

    if chosen.best_move.is_none() {
        let mut scratch = root.clone();
        chosen.best_move = movegen::generate_legal(&mut scratch)
            .as_slice()
            .first()
            .copied()
            .unwrap_or(Move::NONE);
    }
    chosen.nodes = total_nodes;
    chosen
}
