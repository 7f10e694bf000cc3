//! Deterministic internal benchmark: runs a fixed search depth over a fixed
//! set of positions and reports aggregate nodes/NPS. Exercises exactly the
//! same [`crate::search::Searcher::search`] contract a UCI `go depth N`
//! would use — this is a harness, not a distinct search mode.

use std::time::Instant;

use crate::board::Board;
use crate::eval::Evaluator;
use crate::search::{SearchResult, Searcher, TimeAllotment};

/// A fixed, checked-in set of positions spanning the opening, a tactical
/// middlegame, and an endgame, so a bench run always walks the same code
/// paths regardless of what position the engine was last asked about.
const BENCH_POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
];

/// Totals across the whole bench run, printed by the `bench` UCI command
/// and usable directly from a test.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenchResult {
    pub positions: usize,
    pub total_nodes: u64,
    pub elapsed_ms: u128,
    pub nps: u64,
}

/// Runs `depth`-ply searches over [`BENCH_POSITIONS`] using a fresh,
/// single-threaded [`Searcher`] so results are reproducible across
/// machines modulo raw speed.
#[must_use]
pub fn bench(depth: u32) -> BenchResult {
    let searcher = Searcher::new(Evaluator::placeholder(), crate::search::DEFAULT_TT_MB, 1);
    let start = Instant::now();
    let mut total_nodes = 0u64;

    for fen in BENCH_POSITIONS {
        searcher.new_game();
        let board = Board::from_fen(fen);
        let SearchResult { nodes, .. } = searcher.search(&board, depth, TimeAllotment::Infinite, |_| {});
        total_nodes += nodes;
    }

    let elapsed_ms = start.elapsed().as_millis();
    let nps = if elapsed_ms > 0 { total_nodes * 1000 / elapsed_ms as u64 } else { total_nodes };

    BenchResult { positions: BENCH_POSITIONS.len(), total_nodes, elapsed_ms, nps }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bench_visits_every_position_and_reports_nodes() {
        let result = bench(3);
        assert_eq!(result.positions, BENCH_POSITIONS.len());
        assert!(result.total_nodes > 0);
    }
}
