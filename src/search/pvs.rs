//! The core recursive search: negamax with alpha-beta pruning, principal
//! variation search re-searches, null-move pruning, late-move reductions,
//! futility/late-move/SEE pruning, and a singular-extension test for the
//! transposition move. The root is handled separately by [`search_root`]
//! so per-root-move node counts (used by the time manager) don't need to
//! thread through the interior recursion.

use once_cell::sync::Lazy;

use crate::board::Board;
use crate::tt::BoundType;
use crate::types::{Color, Move, MAX_PLY};

use super::constants::{MATE_SCORE, MATE_THRESHOLD, SCORE_INFINITE};
use super::constants::{LMR_MIN_MOVE_IDX, LMR_TABLE_MAX_DEPTH, LMR_TABLE_MAX_IDX, NULL_MOVE_BASE_REDUCTION};
use super::picker::{MovePicker, PickerMode};
use super::worker::Worker;

static LMR_TABLE: Lazy<Vec<Vec<i32>>> = Lazy::new(|| {
    let mut table = vec![vec![0i32; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH];
    for (depth, row) in table.iter_mut().enumerate() {
        for (move_idx, slot) in row.iter_mut().enumerate() {
            if depth == 0 || move_idx == 0 {
                *slot = 0;
                continue;
            }
            let r = 0.5 + (depth as f64).ln() * (move_idx as f64).ln() / 2.25;
            *slot = r.max(0.0) as i32;
        }
    }
    table
});

fn lmr_reduction(depth: i32, move_idx: usize) -> i32 {
    let d = (depth.max(0) as usize).min(LMR_TABLE_MAX_DEPTH - 1);
    let m = move_idx.min(LMR_TABLE_MAX_IDX - 1);
    LMR_TABLE[d][m]
}

fn has_non_pawn_material(board: &Board, color: Color) -> bool {
    use crate::types::PieceType;
    !board.pieces_of(color, PieceType::Knight).is_empty()
        || !board.pieces_of(color, PieceType::Bishop).is_empty()
        || !board.pieces_of(color, PieceType::Rook).is_empty()
        || !board.pieces_of(color, PieceType::Queen).is_empty()
}

/// Interior search node. `excluded` is the move singular-extension testing
/// must skip at this exact node (null when not probing for singularity).
#[allow(clippy::too_many_arguments)]
pub fn negamax(
    worker: &mut Worker,
    ply: u32,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    prev_move: Move,
    excluded: Move,
) -> i32 {
    let pv_node = beta - alpha > 1;

    if worker.should_stop() {
        return 0;
    }

    alpha = alpha.max(-MATE_SCORE + ply as i32);
    let beta = beta.min(MATE_SCORE - ply as i32 - 1);
    if alpha >= beta {
        return alpha;
    }

    if worker.board.is_draw_by_clock_or_repetition() || worker.board.is_insufficient_material() {
        return 0;
    }

    if depth <= 0 {
        return super::quiescence::quiescence(worker, ply, 0, alpha, beta);
    }

    if ply as usize >= MAX_PLY - 1 {
        return worker.static_eval(ply as usize, None);
    }

    worker.seldepth = worker.seldepth.max(ply);
    worker.tracer.push_node(prev_move, depth as u32, alpha, beta);

    let in_check = worker.board.in_check();
    let hash = worker.board.hash();

    let tt_entry = if excluded.is_null() { worker.tt.read().probe(hash, ply) } else { None };
    let mut tt_move = Move::null();
    if let Some(entry) = &tt_entry {
        tt_move = entry.best_move;
        if !pv_node && entry.depth as i32 >= depth {
            let cutoff = match entry.bound_type {
                BoundType::Exact => true,
                BoundType::LowerBound => entry.score >= beta,
                BoundType::UpperBound => entry.score <= alpha,
            };
            if cutoff {
                worker.tracer.pop_node(entry.score);
                return entry.score;
            }
        }
    }

    let static_eval = if in_check { -SCORE_INFINITE } else { worker.static_eval(ply as usize, None) };

    if !pv_node && !in_check && excluded.is_null() {
        if depth <= 8 && static_eval - worker.params.rfp_margin * depth >= beta {
            return static_eval;
        }

        if depth >= worker.params.null_min_depth as i32
            && static_eval >= beta
            && has_non_pawn_material(&worker.board, worker.board.side_to_move())
        {
            let info = worker.board.make_null_move();
            worker.accumulators[ply as usize + 1] = worker.accumulators[ply as usize].clone();
            let r = NULL_MOVE_BASE_REDUCTION + depth / 4;
            let score = -negamax(worker, ply + 1, depth - 1 - r, -beta, -beta + 1, Move::null(), Move::null());
            worker.board.unmake_null_move(info);
            if worker.aborted {
                return 0;
            }
            if score >= beta {
                return if score >= MATE_THRESHOLD { beta } else { score };
            }
        }
    }

    let mut depth = depth;
    if tt_move.is_null() && pv_node && depth >= worker.params.iir_min_depth as i32 {
        depth -= 1;
    }

    let singular_extension = if !pv_node
        && excluded.is_null()
        && depth >= 8
        && !tt_move.is_null()
        && tt_entry.map(|e| e.bound_type != BoundType::UpperBound && e.depth as i32 >= depth - 3).unwrap_or(false)
    {
        let margin = worker.params.singular_margin;
        let target = tt_entry.unwrap().score - margin;
        let reduced = (depth - 1) / 2;
        let score = negamax(worker, ply, reduced, target - 1, target, prev_move, tt_move);
        i32::from(score < target)
    } else {
        0
    };

    let mut picker = MovePicker::new(&mut worker.board, &worker.history, tt_move, ply as usize, prev_move, PickerMode::Search);
    if picker.is_empty() {
        let score = if in_check { -MATE_SCORE + ply as i32 } else { 0 };
        worker.tracer.pop_node(score);
        return score;
    }

    let mut best_score = -SCORE_INFINITE;
    let mut best_move = Move::null();
    let original_alpha = alpha;
    let mut alpha = alpha;
    let mut move_idx = 0usize;
    let mut quiets_tried = Vec::new();

    while let Some(m) = picker.next() {
        if m == excluded {
            continue;
        }

        let is_quiet = m.is_quiet();

        if !pv_node && best_score > -MATE_THRESHOLD && move_idx > 0 {
            if is_quiet {
                if depth <= worker.params.lmp_min_depth as i32 && move_idx >= worker.params.lmp_move_limit {
                    continue;
                }
                if depth <= 8 && !in_check && static_eval + worker.params.futility_margin * depth <= alpha {
                    continue;
                }
            } else if depth <= 8 && !worker.board.see_ge(m, -80 * depth) {
                continue;
            }
        }

        let nodes_before = worker.nodes;
        let info = worker.make(m, ply as usize);
        move_idx += 1;
        if is_quiet {
            quiets_tried.push(m);
        }

        let child_in_check = worker.board.in_check();
        let extension = if child_in_check { 1 } else if m == tt_move { singular_extension } else { 0 };
        let new_depth = depth - 1 + extension;

        let score = if move_idx == 1 {
            -negamax(worker, ply + 1, new_depth, -beta, -alpha, m, Move::null())
        } else {
            let mut reduction = 0;
            if depth >= worker.params.lmr_min_depth as i32 && move_idx > LMR_MIN_MOVE_IDX && is_quiet {
                reduction = lmr_reduction(depth, move_idx);
            }
            let reduced_depth = (new_depth - reduction).max(0);
            let mut s = -negamax(worker, ply + 1, reduced_depth, -(alpha + 1), -alpha, m, Move::null());
            if s > alpha && reduction > 0 {
                s = -negamax(worker, ply + 1, new_depth, -(alpha + 1), -alpha, m, Move::null());
            }
            if s > alpha && s < beta {
                s = -negamax(worker, ply + 1, new_depth, -beta, -alpha, m, Move::null());
            }
            s
        };

        worker.unmake(m, info);
        let _ = worker.nodes - nodes_before;

        if worker.aborted {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = m;
            if score > alpha {
                alpha = score;
                if score >= beta {
                    worker.history.record_cutoff(
                        m,
                        &quiets_tried,
                        worker.board.side_to_move(),
                        prev_move,
                        depth as u32,
                        ply as usize,
                    );
                    break;
                }
            }
        }
    }

    if excluded.is_null() {
        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if best_score > original_alpha {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        worker.tt.write().store(hash, depth.max(0) as u32, ply, best_score, bound, best_move);

        if !in_check {
            worker.record_correction(depth.max(0) as u32, best_score, static_eval);
        }
    }

    worker.tracer.pop_node(best_score);
    best_score
}

/// Root search: PVS over the root move list with per-move node counts
/// recorded for the time manager, and TT storage using the now-final best
/// move/score.
pub fn search_root(worker: &mut Worker, depth: i32, mut alpha: i32, beta: i32) -> (Move, i32) {
    let hash = worker.board.hash();
    let tt_move = worker.tt.read().probe(hash, 0).map(|e| e.best_move).unwrap_or(Move::null());

    let mut picker = MovePicker::new(&mut worker.board, &worker.history, tt_move, 0, Move::null(), PickerMode::Search);
    worker.root_move_nodes.clear();

    let mut best_score = -SCORE_INFINITE;
    let mut best_move = Move::null();
    let mut move_idx = 0usize;

    while let Some(m) = picker.next() {
        let nodes_before = worker.nodes;
        let info = worker.make(m, 0);
        move_idx += 1;

        let new_depth = depth - 1;
        let score = if move_idx == 1 {
            -negamax(worker, 1, new_depth, -beta, -alpha, m, Move::null())
        } else {
            let mut s = -negamax(worker, 1, new_depth, -(alpha + 1), -alpha, m, Move::null());
            if s > alpha && s < beta {
                s = -negamax(worker, 1, new_depth, -beta, -alpha, m, Move::null());
            }
            s
        };

        worker.unmake(m, info);
        worker.root_move_nodes.push(worker.nodes - nodes_before);

        if worker.aborted {
            break;
        }

        if score > best_score {
            best_score = score;
            best_move = m;
            if score > alpha {
                alpha = score;
            }
        }
        if alpha >= beta {
            break;
        }
    }

    if !best_move.is_null() {
        let bound = if best_score >= beta { BoundType::LowerBound } else { BoundType::Exact };
        worker.tt.write().store(hash, depth.max(0) as u32, 0, best_score, bound, best_move);
    }

    (best_move, best_score)
}
