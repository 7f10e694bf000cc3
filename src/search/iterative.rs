//! Iterative deepening driver: searches depth 1, 2, 3, ... using each
//! completed depth's score to center the next depth's aspiration window,
//! stopping when the time manager says to or the requested depth is hit.

use std::time::{Duration, Instant};

use crate::types::{Move, MAX_PLY};

use super::constants::SCORE_INFINITE;
use super::pvs;
use super::timeman::TimeManager;
use super::worker::Worker;

/// One line of UCI-style progress, handed to the caller's callback after
/// every completed (or aborted-but-usable) depth.
pub struct SearchInfo<'a> {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub nodes: u64,
    pub time: Duration,
    pub pv: &'a [Move],
}

pub struct SearchOutput {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub pv: Vec<Move>,
}

pub fn iterative_deepening(
    worker: &mut Worker,
    max_depth: u32,
    time_manager: &mut TimeManager,
    mut on_info: impl FnMut(&SearchInfo),
) -> SearchOutput {
    worker.tracer.new_search();
    worker.history.new_search();
    let start = Instant::now();

    let mut best = SearchOutput { best_move: Move::null(), score: 0, depth: 0, pv: Vec::new() };
    let mut prev_score = 0;

    for depth in 1..=max_depth {
        worker.seldepth = 0;
        worker.tracer.new_tree(best.best_move);

        let use_aspiration = depth >= worker.params.aspiration_min_depth;
        let mut window = worker.params.aspiration_window as f64;
        let (mut alpha, mut beta) = if use_aspiration {
            (prev_score - window as i32, prev_score + window as i32)
        } else {
            (-SCORE_INFINITE, SCORE_INFINITE)
        };

        let (mv, score) = loop {
            let (mv, s) = pvs::search_root(worker, depth as i32, alpha, beta);
            if worker.aborted {
                break (mv, s);
            }
            if s <= alpha && alpha > -SCORE_INFINITE {
                window *= worker.params.aspiration_widen_factor;
                alpha = (s - window as i32).max(-SCORE_INFINITE);
                continue;
            }
            if s >= beta && beta < SCORE_INFINITE {
                window *= worker.params.aspiration_widen_factor;
                beta = (s + window as i32).min(SCORE_INFINITE);
                continue;
            }
            break (mv, s);
        };

        if !mv.is_null() {
            prev_score = score;
            best.best_move = mv;
            best.score = score;
            best.depth = depth;
            best.pv = extract_pv(worker, MAX_PLY);

            let elapsed = start.elapsed();
            on_info(&SearchInfo {
                depth,
                seldepth: worker.seldepth,
                score: best.score,
                nodes: worker.nodes,
                time: elapsed,
                pv: &best.pv,
            });
        }

        if worker.aborted {
            break;
        }

        let elapsed = start.elapsed();
        let stability = root_move_node_fraction(worker);
        time_manager.on_depth_complete(elapsed, stability);
        if time_manager.must_stop(elapsed) || !time_manager.should_start_next_depth(elapsed) {
            break;
        }
    }

    worker.tracer.finish_tree();
    worker.tracer.finish_search();
    best
}

fn root_move_node_fraction(worker: &Worker) -> f64 {
    let total: u64 = worker.root_move_nodes.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let max = *worker.root_move_nodes.iter().max().unwrap_or(&0);
    max as f64 / total as f64
}

/// Walks the transposition table from the root to reconstruct the
/// principal variation, leaving `worker.board` exactly as found.
fn extract_pv(worker: &mut Worker, max_len: usize) -> Vec<Move> {
    let mut played = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for _ in 0..max_len {
        let hash = worker.board.hash();
        if !seen.insert(hash) {
            break;
        }
        let mv = match worker.tt.read().probe(hash, 0) {
            Some(entry) if !entry.best_move.is_null() => entry.best_move,
            _ => break,
        };
        if !worker.board.generate_legal_moves().as_slice().contains(&mv) {
            break;
        }
        let info = worker.board.make_move(mv);
        played.push((mv, info));
    }

    let pv: Vec<Move> = played.iter().map(|(m, _)| *m).collect();
    for (mv, info) in played.into_iter().rev() {
        worker.board.unmake_move(mv, info);
    }
    pv
}
