use std::time::Duration;

use illumine::board::Board;
use illumine::eval::Evaluator;
use illumine::search::{Searcher, TimeAllotment};
use illumine::types::STARTING_FEN;

fn searcher() -> Searcher {
    Searcher::new(Evaluator::placeholder(), 4, 1)
}

#[test]
fn fixed_depth_search_returns_a_legal_move() {
    let s = searcher();
    let mut board = Board::from_fen(STARTING_FEN);
    let legal = board.generate_legal_moves();

    let result = s.search(&board, 4, TimeAllotment::Infinite, |_| {});
    assert!(!result.best_move.is_null());
    assert!(legal.iter().any(|&m| m == result.best_move));
    assert_eq!(result.depth, 4);
}

#[test]
fn fixed_time_search_respects_the_budget() {
    let s = searcher();
    let board = Board::from_fen(STARTING_FEN);

    let start = std::time::Instant::now();
    let result = s.search(&board, 64, TimeAllotment::Fixed(Duration::from_millis(200)), |_| {});
    let elapsed = start.elapsed();

    assert!(!result.best_move.is_null());
    assert!(elapsed < Duration::from_millis(2000), "search overran its fixed time budget: {elapsed:?}");
}

#[test]
fn single_legal_move_is_forced() {
    let s = searcher();
    // White king in check from an undefended queen on e2; every other king
    // move walks into check, so Kxe2 is the only legal reply.
    let board = Board::from_fen("k7/8/8/8/8/8/4q3/4K3 w - - 0 1");
    let result = s.search(&board, 3, TimeAllotment::Infinite, |_| {});
    assert_eq!(result.best_move.source().to_string(), "e1");
    assert_eq!(result.best_move.destination().to_string(), "e2");
}

#[test]
fn no_move_in_checkmate() {
    let s = searcher();
    let board = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    let result = s.search(&board, 1, TimeAllotment::Infinite, |_| {});
    assert!(result.best_move.is_null());
}

#[test]
fn stop_before_search_has_no_effect_on_the_next_call() {
    let s = searcher();
    s.stop();
    let board = Board::from_fen(STARTING_FEN);
    let result = s.search(&board, 4, TimeAllotment::Infinite, |_| {});
    assert!(!result.best_move.is_null());
}

#[test]
fn new_game_clears_the_transposition_table() {
    let s = searcher();
    let board = Board::from_fen(STARTING_FEN);
    s.search(&board, 5, TimeAllotment::Infinite, |_| {});
    assert!(s.hashfull_per_mille() > 0);
    s.new_game();
    assert_eq!(s.hashfull_per_mille(), 0);
}
