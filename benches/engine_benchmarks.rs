//! Benchmarks for engine performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use illumine::board::Board;
use illumine::eval::Evaluator;
use illumine::search::{Searcher, TimeAllotment};
use illumine::types::STARTING_FEN;

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Board::from_fen(STARTING_FEN);
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| illumine::perft::perft(&mut startpos, black_box(depth)))
        });
    }

    let mut kiwipete = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| illumine::perft::perft(&mut kiwipete, black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let mut startpos = Board::from_fen(STARTING_FEN);
    group.bench_function("startpos", |b| b.iter(|| black_box(startpos.generate_legal_moves())));

    let mut middlegame = Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
    group.bench_function("middlegame", |b| b.iter(|| black_box(middlegame.generate_legal_moves())));

    let mut kiwipete = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    group.bench_function("kiwipete", |b| b.iter(|| black_box(kiwipete.generate_legal_moves())));

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let searcher = Searcher::new(Evaluator::placeholder(), illumine::search::DEFAULT_TT_MB, 1);
                let board = Board::from_fen(STARTING_FEN);
                searcher.search(&board, depth, TimeAllotment::Infinite, |_| {})
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let searcher = Searcher::new(Evaluator::placeholder(), illumine::search::DEFAULT_TT_MB, 1);
                let board = Board::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
                searcher.search(&board, depth, TimeAllotment::Infinite, |_| {})
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", STARTING_FEN),
        ("middlegame", "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    let evaluator = Evaluator::placeholder();
    for (name, fen) in positions {
        let board = Board::from_fen(fen);
        let acc = evaluator.refresh(&board);
        group.bench_with_input(BenchmarkId::new("position", name), &(board, acc), |b, (board, acc)| {
            b.iter(|| black_box(evaluator.evaluate(board, acc, 0, None)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
