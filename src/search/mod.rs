//! Search: Lazy-SMP iterative deepening over a PVS/negamax core with the
//! usual pruning and reduction package (null move, late-move reductions,
//! futility, reverse futility, late-move pruning, SEE pruning, singular
//! extension, internal iterative reduction) and a quiescence search that
//! extends through captures.
//!
//! [`Searcher`] is the one entry point a UCI front end needs: it owns the
//! transposition table, pawn hash table, and NNUE evaluator, and hands
//! back a [`SearchResult`] once the time manager (or an external
//! [`Searcher::stop`]) ends the search.

pub mod constants;
pub mod history;
mod iterative;
pub mod params;
pub mod picker;
mod pvs;
mod quiescence;
mod smp;
mod timeman;
pub mod tracer;
mod worker;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::board::Board;
use crate::eval::Evaluator;
use crate::pawn_hash::PawnHashTable;
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::types::Move;

pub use iterative::SearchInfo;
pub use params::SearchParams;
pub use timeman::{TimeAllotment, TimeControl};
pub use tracer::{NullTracer, SearchTracer};

pub const DEFAULT_TT_MB: usize = 16;
pub const DEFAULT_PAWN_HASH_KB: usize = 2048;

/// Final result of a `Searcher::search` call.
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub pv: Vec<Move>,
    pub nodes: u64,
}

/// Owns every piece of state that must survive across searches: the
/// transposition table, pawn hash table, and loaded NNUE network. Every
/// method takes `&self` so a UCI front end can hold one `Arc<Searcher>`
/// and run searches on a background thread while the main loop keeps
/// handling `stop`/`setoption` concurrently.
pub struct Searcher {
    evaluator: Arc<Evaluator>,
    tt: Arc<RwLock<TranspositionTable>>,
    pawn_hash: Arc<PawnHashTable>,
    stop: StopFlag,
    params: RwLock<SearchParams>,
    threads: AtomicUsize,
}

impl Searcher {
    #[must_use]
    pub fn new(evaluator: Evaluator, tt_mb: usize, threads: usize) -> Self {
        Searcher {
            evaluator: Arc::new(evaluator),
            tt: Arc::new(RwLock::new(TranspositionTable::new(tt_mb))),
            pawn_hash: Arc::new(PawnHashTable::new(DEFAULT_PAWN_HASH_KB)),
            stop: StopFlag::new(),
            params: RwLock::new(SearchParams::default()),
            threads: AtomicUsize::new(threads.max(1)),
        }
    }

    pub fn set_params(&self, params: SearchParams) {
        *self.params.write() = params;
    }

    #[must_use]
    pub fn params(&self) -> SearchParams {
        self.params.read().clone()
    }

    pub fn set_threads(&self, threads: usize) {
        self.threads.store(threads.max(1), Ordering::Relaxed);
    }

    pub fn resize_tt(&self, mb: usize) {
        self.tt.write().resize(mb);
    }

    pub fn clear_tt(&self) {
        self.tt.write().clear();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.read().hashfull_per_mille()
    }

    /// Resets all state that shouldn't carry over to an unrelated game:
    /// the transposition table, pawn hash table, and any pending stop.
    pub fn new_game(&self) {
        self.tt.write().clear();
        self.pawn_hash.clear();
        self.stop.reset();
    }

    /// Requests the in-progress search end as soon as its workers next
    /// check the stop flag.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Runs a blocking Lazy-SMP search from `board`. `on_info` is called
    /// from the main search thread once per completed depth.
    pub fn search(
        &self,
        board: &Board,
        max_depth: u32,
        allotment: TimeAllotment,
        on_info: impl FnMut(&SearchInfo) + Send,
    ) -> SearchResult {
        self.stop.reset();
        let limits = smp::SearchLimits { max_depth, allotment, threads: self.threads.load(Ordering::Relaxed) };
        let result = smp::run(
            board,
            Arc::clone(&self.evaluator),
            Arc::clone(&self.tt),
            Arc::clone(&self.pawn_hash),
            self.stop.clone(),
            self.params(),
            limits,
            on_info,
        );
        SearchResult { best_move: result.best_move, score: result.score, depth: result.depth, pv: result.pv, nodes: result.nodes }
    }
}
