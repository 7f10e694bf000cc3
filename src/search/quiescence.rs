//! Quiescence search: extends the main search past its nominal depth
//! through captures and promotions only, so the static eval at a leaf is
//! never measured in the middle of a trade.

use crate::tt::BoundType;
use crate::types::{Move, MAX_PLY};

use super::constants::{MATE_SCORE, MAX_QSEARCH_PLY, SCORE_INFINITE};
use super::picker::{MovePicker, PickerMode};
use super::worker::Worker;

pub fn quiescence(worker: &mut Worker, ply: u32, qdepth: i32, mut alpha: i32, beta: i32) -> i32 {
    if worker.should_stop() {
        return 0;
    }

    worker.seldepth = worker.seldepth.max(ply);

    if ply as usize >= MAX_PLY - 1 {
        return worker.static_eval(ply as usize, None);
    }

    let in_check = worker.board.in_check();
    let hash = worker.board.hash();

    let tt_entry = worker.tt.read().probe(hash, ply);
    let mut tt_move = Move::null();
    if let Some(entry) = &tt_entry {
        tt_move = entry.best_move;
        let cutoff = match entry.bound_type {
            BoundType::Exact => true,
            BoundType::LowerBound => entry.score >= beta,
            BoundType::UpperBound => entry.score <= alpha,
        };
        if cutoff {
            return entry.score;
        }
    }

    let static_eval = if in_check { -SCORE_INFINITE } else { worker.static_eval(ply as usize, None) };
    let original_alpha = alpha;
    let mut best_score = static_eval;
    let mut best_move = Move::null();

    if !in_check {
        if static_eval >= beta {
            return static_eval;
        }
        alpha = alpha.max(static_eval);
    }

    let mut picker = MovePicker::new(&mut worker.board, &worker.history, tt_move, ply as usize, Move::null(), PickerMode::Quiescence);

    if in_check && picker.is_empty() {
        return -MATE_SCORE + ply as i32;
    }

    if qdepth < MAX_QSEARCH_PLY {
        while let Some(m) = picker.next() {
            if !in_check && m.is_capture() && !worker.board.see_ge(m, 0) {
                continue;
            }

            let info = worker.make(m, ply as usize);
            let score = -quiescence(worker, ply + 1, qdepth + 1, -beta, -alpha);
            worker.unmake(m, info);

            if worker.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = m;
                if score > alpha {
                    alpha = score;
                    if score >= beta {
                        break;
                    }
                }
            }
        }
    }

    let bound = if best_score >= beta {
        BoundType::LowerBound
    } else if best_score > original_alpha {
        BoundType::Exact
    } else {
        BoundType::UpperBound
    };
    worker.tt.write().store(hash, 0, ply, best_score, bound, best_move);

    best_score
}
