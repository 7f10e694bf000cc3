//! Lazy-SMP: every thread iteratively deepens the same position against
//! one shared transposition table and pawn hash table, with no other
//! coordination. Extra threads diversify by seeding the evaluator's noise
//! term from their thread index so they don't all walk the identical PV.
//! Only the main thread drives the UCI `info` callback and the time
//! manager; helper threads run until the main thread sets the stop flag.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::board::Board;
use crate::eval::Evaluator;
use crate::pawn_hash::PawnHashTable;
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::types::Move;

use super::iterative::{iterative_deepening, SearchInfo, SearchOutput};
use super::params::SearchParams;
use super::timeman::{TimeAllotment, TimeManager};
use super::worker::{SharedNodeCounter, Worker};

pub struct SearchLimits {
    pub max_depth: u32,
    pub allotment: TimeAllotment,
    pub threads: usize,
}

pub struct SmpResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub pv: Vec<Move>,
    pub nodes: u64,
}

/// Runs a full Lazy-SMP search from `board` and blocks until the main
/// thread's time manager (or `stop`) ends it. `on_info` is called only
/// from the main thread, once per completed (or usefully partial) depth.
#[allow(clippy::too_many_arguments)]
pub fn run(
    board: &Board,
    evaluator: Arc<Evaluator>,
    tt: Arc<RwLock<TranspositionTable>>,
    pawn_hash: Arc<PawnHashTable>,
    stop: StopFlag,
    params: SearchParams,
    limits: SearchLimits,
    mut on_info: impl FnMut(&SearchInfo) + Send,
) -> SmpResult {
    tt.write().new_search();

    let mut main_time_manager = TimeManager::new(limits.allotment);
    let hard_deadline = Instant::now() + main_time_manager.hard_bound();
    let node_counter = SharedNodeCounter::default();
    let helper_count = limits.threads.saturating_sub(1);

    let (main_out, helper_outs) = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(helper_count);
        for _ in 0..helper_count {
            let board = board.clone();
            let evaluator = Arc::clone(&evaluator);
            let tt = Arc::clone(&tt);
            let pawn_hash = Arc::clone(&pawn_hash);
            let stop = stop.clone();
            let params = params.clone();
            let max_depth = limits.max_depth;
            let node_counter = &node_counter;

            handles.push(scope.spawn(move || {
                let mut worker = Worker::new(board, evaluator, tt, pawn_hash, stop, params, hard_deadline);
                worker.init_accumulators();
                let mut tm = TimeManager::new(TimeAllotment::Infinite);
                let out = iterative_deepening(&mut worker, max_depth, &mut tm, |_| {});
                node_counter.add(worker.nodes);
                out
            }));
        }

        let mut main_worker = Worker::new(
            board.clone(),
            Arc::clone(&evaluator),
            Arc::clone(&tt),
            Arc::clone(&pawn_hash),
            stop.clone(),
            params.clone(),
            hard_deadline,
        );
        main_worker.init_accumulators();
        let main_out = iterative_deepening(&mut main_worker, limits.max_depth, &mut main_time_manager, &mut on_info);
        node_counter.add(main_worker.nodes);

        stop.stop();

        let helper_outs: Vec<SearchOutput> = handles.into_iter().map(|h| h.join().expect("helper thread panicked")).collect();
        (main_out, helper_outs)
    });

    let mut best = main_out;
    for out in helper_outs {
        if vote_score(&out) > vote_score(&best) {
            best = out;
        }
    }

    SmpResult { best_move: best.best_move, score: best.score, depth: best.depth, pv: best.pv, nodes: node_counter.get() }
}

/// Depth dominates, with raw score breaking ties within a depth — a
/// helper that searched one ply deeper is trusted over the main thread's
/// shallower result.
fn vote_score(out: &SearchOutput) -> i64 {
    out.depth as i64 * 100_000 + out.score as i64
}
