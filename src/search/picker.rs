//! Staged move picker: orders an already-legal move list so the search
//! loop tries the moves most likely to cut off first — hash move, then
//! winning captures, then killers/counters, then quiets by history, then
//! losing captures last.
//!
//! Legality is resolved up front by [`crate::board::Board::generate_legal_moves`]
//! (this board generates fully legal moves, not pseudo-legal ones), so the
//! picker's job is pure ordering: score every move once, then repeatedly
//! pull the highest-scoring move not yet returned. That's `O(n^2)` in the
//! move count, which is fine since `n` rarely exceeds a few dozen.

use crate::board::Board;
use crate::types::{Move, MoveList};

use super::constants::{
    BAD_CAPTURE_SCORE, CAPTURE_BASE_SCORE, COUNTER_MOVE_SCORE, KILLER1_SCORE, KILLER2_SCORE,
    QUEEN_PROMOTION_SCORE, TT_MOVE_SCORE, UNDER_PROMOTION_SCORE,
};
use super::history::HistoryTables;

/// Whether the picker should emit every legal move (normal search) or only
/// captures/promotions/check-evasions (quiescence search).
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Search,
    Quiescence,
}

pub struct MovePicker {
    scored: Vec<(Move, i32)>,
    taken: Vec<bool>,
}

impl MovePicker {
    /// Generates and scores every candidate move for `board` at `ply`.
    /// `prev_move` is the move played to reach this node (null at the
    /// root), used to look up counter-move history.
    pub fn new(
        board: &mut Board,
        history: &HistoryTables,
        tt_move: Move,
        ply: usize,
        prev_move: Move,
        mode: PickerMode,
    ) -> Self {
        let in_check = board.in_check();
        let candidates = if mode == PickerMode::Quiescence && !in_check {
            board.generate_legal_captures()
        } else {
            board.generate_legal_moves()
        };

        let mover = board.side_to_move();
        let killers = history.killers.get(ply);
        let counter = history.counter_moves.get(mover, prev_move);

        let scored: Vec<(Move, i32)> = candidates
            .as_slice()
            .iter()
            .map(|&m| (m, score_move(board, history, m, tt_move, killers, counter, mover, prev_move)))
            .collect();

        let taken = vec![false; scored.len()];
        MovePicker { scored, taken }
    }

    /// Returns the highest-scoring move not yet returned, or `Move::null()`
    /// once every candidate has been consumed.
    pub fn next(&mut self) -> Option<Move> {
        let mut best_idx = None;
        let mut best_score = i32::MIN;
        for (i, &(_, score)) in self.scored.iter().enumerate() {
            if !self.taken[i] && score > best_score {
                best_score = score;
                best_idx = Some(i);
            }
        }
        let idx = best_idx?;
        self.taken[idx] = true;
        Some(self.scored[idx].0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scored.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scored.is_empty()
    }
}

fn score_move(
    board: &Board,
    history: &HistoryTables,
    m: Move,
    tt_move: Move,
    killers: [Move; 2],
    counter: Option<Move>,
    mover: crate::types::Color,
    prev_move: Move,
) -> i32 {
    if m == tt_move {
        return TT_MOVE_SCORE;
    }

    if m.is_promotion() {
        let promo_score = if m.promotion_piece() == crate::types::PieceType::Queen {
            QUEEN_PROMOTION_SCORE
        } else {
            UNDER_PROMOTION_SCORE
        };
        return promo_score + board.see(m);
    }

    if m.is_capture() {
        let see = board.see(m);
        return if see >= 0 {
            CAPTURE_BASE_SCORE + see
        } else {
            BAD_CAPTURE_SCORE + see
        };
    }

    if m == killers[0] {
        return KILLER1_SCORE;
    }
    if m == killers[1] {
        return KILLER2_SCORE;
    }
    if counter == Some(m) {
        return COUNTER_MOVE_SCORE;
    }

    history.quiet_score(m, mover, prev_move, false)
}

/// Splits a freshly-generated legal move list into quiets (used by the
/// caller to apply history-table maluses to moves tried before a cutoff).
#[must_use]
pub fn quiets_only(moves: &MoveList) -> Vec<Move> {
    moves.as_slice().iter().copied().filter(|m| m.is_quiet()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STARTING_FEN;

    #[test]
    fn tt_move_is_always_first() {
        let mut board = Board::from_fen(STARTING_FEN);
        let legal = board.generate_legal_moves();
        let tt_move = *legal.as_slice().last().unwrap();
        let history = HistoryTables::default();
        let mut picker =
            MovePicker::new(&mut board, &history, tt_move, 0, Move::null(), PickerMode::Search);
        assert_eq!(picker.next(), Some(tt_move));
    }

    #[test]
    fn picker_exhausts_every_legal_move_exactly_once() {
        let mut board = Board::from_fen(STARTING_FEN);
        let legal_count = board.generate_legal_moves().as_slice().len();
        let history = HistoryTables::default();
        let mut picker =
            MovePicker::new(&mut board, &history, Move::null(), 0, Move::null(), PickerMode::Search);
        let mut seen = 0;
        while picker.next().is_some() {
            seen += 1;
        }
        assert_eq!(seen, legal_count);
    }

    #[test]
    fn quiescence_mode_skips_quiets_when_not_in_check() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let history = HistoryTables::default();
        let mut picker =
            MovePicker::new(&mut board, &history, Move::null(), 0, Move::null(), PickerMode::Quiescence);
        while let Some(m) = picker.next() {
            assert!(m.is_capture() || m.is_promotion());
        }
    }
}
