//! Binds an external front-end to the search core through an
//! `init` / `set_position` / `go` / `stop` / `quit` surface, trimmed to
//! what the core itself owns — no UCI/XBoard command parsing, no
//! pondering protocol, since those live in the front end.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{EngineError, MoveParseError, PositionError};
use crate::eval::nnue::NnueNetwork;
use crate::movegen;
use crate::position::{Color, Move, Position};
use crate::search::{IterationInfo, MAX_PLY};
use crate::tt::TranspositionTable;
use crate::workers::{self, SearchConfig};

pub use crate::workers::Limits;

const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// The result of one `go()` call: the move to play and, if the search
/// completed at least one full iteration past it, a ponder move drawn
/// from the same principal variation.
#[derive(Clone, Copy, Debug)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub ponder_move: Option<Move>,
    pub depth: u32,
    pub nodes: u64,
}

/// A `go()` still running in the background, tracked so `stop()`/`quit()`
/// can cancel and join it.
struct SearchJob {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<SearchOutcome>,
}

impl SearchJob {
    fn stop_and_join(self) -> SearchOutcome {
        self.stop.store(true, Ordering::Relaxed);
        self.handle.join().unwrap_or(SearchOutcome {
            best_move: Move::NONE,
            ponder_move: None,
            depth: 0,
            nodes: 0,
        })
    }
}

/// The embedding point a front end talks to. Owns the root position,
/// the shared transposition table, and the NNUE weights; hands searches
/// off to [`crate::workers::run`] on a background thread so `stop()` can
/// be called from whatever thread is reading the next front-end command.
pub struct Engine {
    position: Position,
    tt: Arc<TranspositionTable>,
    network: Arc<NnueNetwork>,
    num_threads: usize,
    current_job: Option<SearchJob>,
}

impl Engine {
    /// `init(tt_size_mb)`: allocate the transposition table and the
    /// NNUE weight buffers. The embedded network (all-zero weights,
    /// behind the `embedded_nnue` feature) is used until
    /// [`Engine::load_nnue`] replaces it.
    ///
    /// # Errors
    /// Returns [`EngineError::TtTooSmall`] if `tt_size_mb` can't hold
    /// even one bucket.
    pub fn init(tt_size_mb: usize) -> Result<Self, EngineError> {
        let tt = TranspositionTable::new(tt_size_mb)?;
        #[cfg(feature = "embedded_nnue")]
        let network = NnueNetwork::from_embedded();
        #[cfg(not(feature = "embedded_nnue"))]
        let network = NnueNetwork::zeroed();

        Ok(Engine {
            position: Position::startpos(),
            tt: Arc::new(tt),
            network: Arc::new(network),
            num_threads: 1,
            current_job: None,
        })
    }

    /// Replace the network weights, loaded from a file in the binary
    /// weights format. Fatal to the caller on failure: the driver
    /// should refuse to start searching rather than fall back silently.
    ///
    /// # Errors
    /// Propagates [`NnueNetwork::load`]'s I/O and shape-mismatch errors.
    pub fn load_nnue(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        self.stop();
        self.network = Arc::new(NnueNetwork::load(path)?);
        Ok(())
    }

    /// Number of worker threads subsequent `go()` calls fan out to.
    pub fn set_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads.max(1);
    }

    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// `set_position(fen, moves)`: parse `fen`, then apply each move in
    /// `moves` (coordinate notation, e.g. `"e2e4"`, `"e7e8q"`) in order.
    /// On any failure the engine's position is left unchanged. Cancels
    /// any in-flight search first, since it holds a clone of the old
    /// root.
    ///
    /// # Errors
    /// Returns [`PositionError::Fen`] if `fen` doesn't parse, or
    /// [`PositionError::Move`] if a listed move doesn't parse or isn't
    /// legal from wherever the list has reached so far.
    pub fn set_position(&mut self, fen: &str, moves: &[String]) -> Result<(), PositionError> {
        let mut pos = Position::from_fen(fen)?;
        for notation in moves {
            let (from, to, promotion) = Move::parse_coordinate(notation)?;
            let mv = movegen::find_legal_move(&mut pos, from, to, promotion).ok_or_else(|| {
                PositionError::Move(MoveParseError::IllegalMove {
                    notation: notation.clone(),
                })
            })?;
            pos.make_move(mv);
        }
        self.stop();
        self.position = pos;
        Ok(())
    }

    /// Reset to the standard starting position and clear search memory,
    /// as a front end's "new game" command would.
    pub fn new_game(&mut self) {
        self.stop();
        self.position = Position::startpos();
        if let Some(tt) = Arc::get_mut(&mut self.tt) {
            tt.clear();
        }
    }

    fn build_config(&self, limits: &Limits) -> SearchConfig {
        let side_white = self.position.side_to_move == Color::White;
        let budget = if limits.infinite {
            workers::TimeBudget {
                soft_ms: None,
                hard_ms: None,
            }
        } else {
            limits.time_budget(side_white)
        };
        SearchConfig {
            num_threads: self.num_threads,
            max_depth: limits.depth.unwrap_or(MAX_PLY as u32 - 1).min(MAX_PLY as u32 - 1),
            node_limit: limits.nodes,
            budget,
        }
    }

    /// `go(limits)`: start a search in the background. `on_iteration`
    /// (if given) is called, from the search thread, once per completed
    /// iterative-deepening iteration; `on_complete` is called, also from
    /// the search thread, once the search stops (by limit, by `stop()`,
    /// or by `quit()`). Cancels and joins any search already running.
    pub fn go<F>(&mut self, limits: Limits, on_iteration: Option<Box<dyn FnMut(&IterationInfo) + Send>>, on_complete: F)
    where
        F: FnOnce(SearchOutcome) + Send + 'static,
    {
        self.stop();

        let config = self.build_config(&limits);
        let root = self.position.clone();
        let tt = Arc::clone(&self.tt);
        let network = Arc::clone(&self.network);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("search-driver".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = workers::run(&root, tt, network, config, stop_for_thread, on_iteration);
                let outcome = SearchOutcome {
                    best_move: result.best_move,
                    ponder_move: result.ponder_move,
                    depth: result.depth,
                    nodes: result.nodes,
                };
                on_complete(outcome);
                outcome
            })
            .expect("failed to spawn search driver thread");

        self.current_job = Some(SearchJob { stop, handle });
    }

    /// Blocking convenience wrapper over [`Engine::go`]: runs the search
    /// to completion (by whatever limit fires first) and returns the
    /// outcome directly, for callers that don't need asynchronous
    /// cancellation — embedding tests, primarily.
    #[must_use]
    pub fn go_sync(&mut self, limits: Limits) -> SearchOutcome {
        self.stop();
        let config = self.build_config(&limits);
        let stop = Arc::new(AtomicBool::new(false));
        let result = workers::run(&self.position, Arc::clone(&self.tt), Arc::clone(&self.network), config, stop, None);
        SearchOutcome {
            best_move: result.best_move,
            ponder_move: result.ponder_move,
            depth: result.depth,
            nodes: result.nodes,
        }
    }

    /// `stop()`: asynchronously cancel any in-flight search, then join
    /// the background thread so no search outlives this call. A no-op
    /// if nothing is running.
    pub fn stop(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_join();
        }
    }

    /// Whether a `go()` is currently running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.is_some()
    }

    /// `quit()`: cancel and join any in-flight search, then drop the
    /// engine's search memory.
    pub fn quit(mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_allocates_a_table_and_starts_at_startpos() {
        let engine = Engine::init(1).unwrap();
        assert_eq!(engine.position().side_to_move, Color::White);
    }

    #[test]
    fn tt_too_small_is_a_resource_error() {
        assert!(matches!(Engine::init(0), Err(EngineError::TtTooSmall { .. })));
    }

    #[test]
    fn set_position_applies_follow_up_moves() {
        let mut engine = Engine::init(1).unwrap();
        engine
            .set_position(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                &["e2e4".to_string(), "e7e5".to_string()],
            )
            .unwrap();
        assert_eq!(engine.position().side_to_move, Color::White);
        let e2 = Move::parse_coordinate("e2e4").unwrap().0;
        assert_eq!(engine.position().piece_on(e2), crate::position::PieceKind::None);
    }

    #[test]
    fn set_position_rejects_illegal_follow_up_move_and_keeps_old_state() {
        let mut engine = Engine::init(1).unwrap();
        let before = engine.position().to_fen();
        let err = engine.set_position("startpos-placeholder", &[]);
        assert!(err.is_err());
        assert_eq!(engine.position().to_fen(), before);
    }

    #[test]
    fn go_sync_returns_a_legal_root_move() {
        let mut engine = Engine::init(1).unwrap();
        let outcome = engine.go_sync(Limits {
            depth: Some(3),
            ..Default::default()
        });
        assert!(!outcome.best_move.is_none());
    }

    #[test]
    fn stop_with_no_search_running_is_a_no_op() {
        let mut engine = Engine::init(1).unwrap();
        engine.stop();
        assert!(!engine.is_searching());
    }

    #[test]
    fn async_go_can_be_stopped_and_still_returns_a_move() {
        let mut engine = Engine::init(1).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        engine.go(
            Limits {
                infinite: true,
                ..Default::default()
            },
            None,
            move |outcome| {
                let _ = tx.send(outcome);
            },
        );
        std::thread::sleep(std::time::Duration::from_millis(20));
        engine.stop();
        let outcome = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(!outcome.best_move.is_none());
    }
}
