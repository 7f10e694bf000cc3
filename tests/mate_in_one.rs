use serde::Deserialize;

use illumine::board::Board;
use illumine::eval::Evaluator;
use illumine::search::{Searcher, TimeAllotment};

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

/// Applies a problem's recorded solution move and checks the fixture itself
/// is sound: the move is legal and actually delivers mate.
#[test]
fn mate_in_one_suite() {
    let data = include_str!("data/problems.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid problems.json");

    for problem in set.problems.iter().filter(|p| p.kind == "Mate in One") {
        let mut board = Board::from_fen(&problem.fen);
        let mv = board.parse_uci_move(&problem.moves).unwrap_or_else(|e| {
            panic!("fixture move {} illegal in fen {}: {e}", problem.moves, problem.fen)
        });
        board.make_move(mv);

        assert!(board.is_checkmate(), "mate in one failed for fen: {} move: {}", problem.fen, problem.moves);
    }
}

/// Verifies the search itself finds each fixture's mating move, not just
/// that the recorded move is legal.
#[test]
fn mate_search_suite() {
    let data = include_str!("data/problems.json");
    let set: ProblemSet = serde_json::from_str(data).expect("invalid problems.json");
    let searcher = Searcher::new(Evaluator::placeholder(), 16, 1);

    for problem in set.problems.iter().filter(|p| p.kind == "Mate in One") {
        let board = Board::from_fen(&problem.fen);
        let result = searcher.search(&board, 3, TimeAllotment::Infinite, |_| {});
        assert_eq!(
            result.best_move.to_uci(false),
            problem.moves,
            "search missed the mate in fen: {}",
            problem.fen
        );
    }
}
