//! Search correctness tests: checkmate scores dominate any evaluator noise,
//! so these hold regardless of which NNUE weights (if any) are loaded.

use std::time::Instant;

use illumine::board::Board;
use illumine::eval::Evaluator;
use illumine::search::{Searcher, TimeAllotment};
use illumine::types::STARTING_FEN;

fn searcher() -> Searcher {
    Searcher::new(Evaluator::placeholder(), 16, 1)
}

#[test]
fn finds_mate_in_one_back_rank() {
    let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let result = searcher().search(&board, 4, TimeAllotment::Infinite, |_| {});
    assert_eq!(result.best_move.to_uci(false), "e1e8", "should find Qe8#");
}

#[test]
fn finds_mate_in_one_queen() {
    let board = Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4");
    let result = searcher().search(&board, 4, TimeAllotment::Infinite, |_| {});
    assert_eq!(result.best_move.to_uci(false), "h5f7", "should find Qxf7#");
}

#[test]
fn iterative_deepening_consistency() {
    let s = searcher();
    let mut board = Board::from_fen(STARTING_FEN);
    let legal = board.generate_legal_moves();

    let shallow = s.search(&board, 2, TimeAllotment::Infinite, |_| {});
    let deeper = s.search(&board, 4, TimeAllotment::Infinite, |_| {});

    assert!(legal.iter().any(|&m| m == shallow.best_move), "depth 2 move should be legal");
    assert!(legal.iter().any(|&m| m == deeper.best_move), "depth 4 move should be legal");
}

#[test]
fn handles_draw_by_repetition() {
    let mut board = Board::from_fen(STARTING_FEN);
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
        let m = board.parse_uci_move(mv).expect("legal move");
        board.make_move(m);
    }
    assert!(board.is_draw_by_clock_or_repetition(), "should be a draw by repetition");
}

#[test]
fn identifies_stalemate() {
    let mut board = Board::from_fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1");
    assert!(board.is_stalemate(), "position should be stalemate");
    assert!(!board.is_checkmate(), "position should not be checkmate");
}

#[test]
fn fifty_move_rule() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1");
    assert!(board.is_draw_by_clock_or_repetition(), "100-halfmove clock should be a draw");
}

#[test]
fn search_completes_at_depth_6() {
    let board = Board::from_fen(STARTING_FEN);
    let start = Instant::now();
    let result = searcher().search(&board, 6, TimeAllotment::Infinite, |_| {});
    let elapsed = start.elapsed();

    assert!(!result.best_move.is_null(), "should find a move at depth 6");
    assert!(elapsed.as_secs() < 60, "search at depth 6 took too long: {elapsed:?}");
}
