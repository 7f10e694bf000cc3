//! Per-thread search state: one [`Worker`] per Lazy-SMP thread, each with
//! its own board, history tables, and NNUE accumulator stack, sharing only
//! the transposition table, pawn hash table, and stop flag with its peers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::board::Board;
use crate::eval::Evaluator;
use crate::nnue::NnueAccumulator;
use crate::pawn_hash::PawnHashTable;
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::types::{Move, MAX_PLY};

use super::history::HistoryTables;
use super::params::SearchParams;
use super::tracer::{NullTracer, SearchTracer};

/// Every `NODE_CHECK_INTERVAL` nodes, a worker reads the clock and the
/// shared stop flag instead of every node, since both are comparatively
/// expensive relative to a single search node.
pub const NODE_CHECK_INTERVAL: u64 = 1024;

pub struct Worker {
    pub board: Board,
    pub history: HistoryTables,
    pub accumulators: Vec<NnueAccumulator>,
    pub evaluator: Arc<Evaluator>,
    pub tt: Arc<RwLock<TranspositionTable>>,
    pub pawn_hash: Arc<PawnHashTable>,
    pub stop: StopFlag,
    pub params: SearchParams,
    pub tracer: Box<dyn SearchTracer + Send>,

    pub nodes: u64,
    pub seldepth: u32,
    /// Node count at the previous time/stop check.
    nodes_at_last_check: u64,
    pub hard_deadline: Instant,
    /// Set once a node check finds the deadline passed or the stop flag
    /// raised; every frame still on the stack unwinds as soon as it sees
    /// this, so results from a partial depth are never trusted.
    pub aborted: bool,
    /// Nodes searched for each root move, keyed by index into the root
    /// move list — used by the time manager's stability heuristic.
    pub root_move_nodes: Vec<u64>,
}

impl Worker {
    #[must_use]
    pub fn new(
        board: Board,
        evaluator: Arc<Evaluator>,
        tt: Arc<RwLock<TranspositionTable>>,
        pawn_hash: Arc<PawnHashTable>,
        stop: StopFlag,
        params: SearchParams,
        hard_deadline: Instant,
    ) -> Self {
        Worker {
            board,
            history: HistoryTables::default(),
            accumulators: vec![NnueAccumulator::default(); MAX_PLY],
            evaluator,
            tt,
            pawn_hash,
            stop,
            params,
            tracer: Box::new(NullTracer),
            nodes: 0,
            seldepth: 0,
            nodes_at_last_check: 0,
            hard_deadline,
            aborted: false,
            root_move_nodes: Vec::new(),
        }
    }

    /// Refreshes ply-0's accumulator from scratch; call once before the
    /// first search at the root of a new position.
    pub fn init_accumulators(&mut self) {
        self.accumulators[0] = self.evaluator.refresh(&self.board);
    }

    /// Plays `m`, incrementally updating ply `ply + 1`'s accumulator from
    /// ply `ply`'s. Returns the unmake info the caller must pass back to
    /// [`Worker::unmake`].
    pub fn make(&mut self, m: Move, ply: usize) -> crate::board::UnmakeInfo {
        let diff = self.evaluator.feature_diff_for_move(&self.board, m);
        let info = self.board.make_move(m);
        self.accumulators[ply + 1] = self.accumulators[ply].clone();
        self.evaluator.apply_diff(&mut self.accumulators[ply + 1], &diff);
        self.nodes += 1;
        info
    }

    pub fn unmake(&mut self, m: Move, info: crate::board::UnmakeInfo) {
        self.board.unmake_move(m, info);
    }

    /// Static eval at `ply`, including the pawn correction history term.
    #[must_use]
    pub fn static_eval(&self, ply: usize, noise_seed: Option<u64>) -> i32 {
        let correction = self.pawn_correction();
        self.evaluator.evaluate(&self.board, &self.accumulators[ply], correction, noise_seed)
    }

    fn pawn_correction(&self) -> i32 {
        let key = pawn_structure_key(&self.board);
        self.history.corrhist.correction(self.board.side_to_move(), key)
    }

    pub fn record_correction(&mut self, depth: u32, observed: i32, static_eval: i32) {
        let key = pawn_structure_key(&self.board);
        self.history.corrhist.update(self.board.side_to_move(), key, depth, observed - static_eval);
    }

    /// Returns true once the deadline or an external stop request fires.
    /// Cheap on most calls: only touches the clock/atomic every
    /// [`NODE_CHECK_INTERVAL`] nodes.
    pub fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.nodes - self.nodes_at_last_check < NODE_CHECK_INTERVAL {
            return false;
        }
        self.nodes_at_last_check = self.nodes;
        if self.stop.is_stopped() || Instant::now() >= self.hard_deadline {
            self.aborted = true;
        }
        self.aborted
    }
}

/// Zobrist hash of just the pawns-plus-kings skeleton, computed on demand
/// (cheap relative to a search node, and simpler than threading an
/// incremental pawn key through make/unmake for a cache that's only
/// consulted once per node).
#[must_use]
pub fn pawn_structure_key(board: &Board) -> u64 {
    use crate::types::{Color, PieceType};
    use crate::zobrist::piece_key;

    let mut key = 0u64;
    for color in [Color::White, Color::Black] {
        for sq in board.pieces_of(color, PieceType::Pawn).iter() {
            key ^= piece_key(PieceType::Pawn, color, sq);
        }
        key ^= piece_key(PieceType::King, color, board.king_square(color));
    }
    key
}

/// Shared counter across all workers of one search, used for Lazy-SMP
/// aggregate node reporting without coordinating through a mutex.
#[derive(Default)]
pub struct SharedNodeCounter(AtomicU64);

impl SharedNodeCounter {
    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
