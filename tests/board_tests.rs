use illumine::board::Board;
use illumine::tt::{BoundType, TranspositionTable};
use illumine::types::{Move, STARTING_FEN};

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(u32, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: STARTING_FEN,
        depths: &[(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2_039), (3, 97_862)],
    },
    TestPosition {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2_812)],
    },
];

#[test]
fn perft_positions() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let nodes = illumine::perft::perft(&mut board, depth);
            assert_eq!(nodes, expected, "perft failed for {} at depth {}", position.name, depth);
        }
    }
}

#[test]
fn fifty_move_clock_is_a_draw() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 100 1");
    assert!(board.is_draw_by_clock_or_repetition());
}

#[test]
fn repeated_knight_shuffle_is_a_draw_by_repetition() {
    let mut board = Board::from_fen(STARTING_FEN);
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
        let m = board.parse_uci_move(mv).expect("legal move");
        board.make_move(m);
    }
    assert!(board.is_draw_by_clock_or_repetition());
}

#[test]
fn bare_kings_are_insufficient_material() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 0 1");
    assert!(board.is_insufficient_material());
}

#[test]
fn transposition_table_store_probe_keeps_deepest_entry() {
    let mut tt = TranspositionTable::new(1);
    let hash = 0xdead_beefu64;

    tt.store(hash, 1, 0, 100, BoundType::Exact, Move::null());
    let entry = tt.probe(hash, 0).expect("entry missing");
    assert_eq!(entry.depth, 1);

    tt.store(hash, 5, 0, 200, BoundType::Exact, Move::null());
    let entry = tt.probe(hash, 0).expect("entry missing after deeper store");
    assert_eq!(entry.depth, 5);
}
