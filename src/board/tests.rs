//! Board-level integration tests: FEN round-trips, make/undo symmetry, and
//! the draw/check-detection edge cases called out by spec §8.

use super::Board;
use crate::types::{Color, Move, MoveType, PieceType, Square};

#[test]
fn fen_round_trips_for_standard_positions() {
    for fen in [
        crate::types::STARTING_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ] {
        let board = Board::from_fen(fen);
        assert_eq!(board.to_fen(), fen);
    }
}

#[test]
fn make_unmake_restores_hash_and_occupancy() {
    let mut board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let before_hash = board.hash();
    let before_fen = board.to_fen();

    for &m in board.generate_legal_moves().as_slice() {
        let info = board.make_move(m);
        board.unmake_move(m, info);
        assert_eq!(board.hash(), before_hash, "hash not restored after {m:?}");
        assert_eq!(board.to_fen(), before_fen, "position not restored after {m:?}");
    }
}

#[test]
fn null_move_restores_state() {
    let mut board = Board::new();
    let before_hash = board.hash();
    let info = board.make_null_move();
    assert_ne!(board.hash(), before_hash);
    assert!(!board.white_to_move());
    board.unmake_null_move(info);
    assert_eq!(board.hash(), before_hash);
    assert!(board.white_to_move());
}

#[test]
fn double_check_only_generates_king_moves() {
    // Black king on e8 is attacked by the rook on e1 and the bishop on
    // h5, a genuine double check with no blocker in common.
    let mut board = Board::from_fen("4k3/8/8/7B/8/8/8/4R3 b - - 0 1");
    let moves = board.generate_legal_moves();
    for &m in moves.as_slice() {
        assert_eq!(m.source_piece(), PieceType::King);
    }
}

#[test]
fn en_passant_discovered_check_is_rejected() {
    // White pawn on e5 could capture en passant onto d6, but doing so
    // would expose the white king on e1 to the black rook on a5 along
    // the rank once both the e5 pawn and its victim disappear.
    let mut board = Board::from_fen("8/8/8/R2Pp2k/8/8/8/4K3 w - e6 0 1");
    let ep_moves: Vec<Move> = board
        .generate_legal_moves()
        .as_slice()
        .iter()
        .copied()
        .filter(|m| m.move_type() == MoveType::EnPassant)
        .collect();
    assert!(ep_moves.is_empty(), "en passant should be pinned away: {ep_moves:?}");
}

#[test]
fn promotion_offers_all_four_pieces() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/4k2K w - - 0 1");
    let promotions: Vec<Move> = board
        .generate_legal_moves()
        .as_slice()
        .iter()
        .copied()
        .filter(|m| m.source() == Square::new(6, 0))
        .collect();
    assert_eq!(promotions.len(), 4);
}

#[test]
fn repetition_draw_after_three_occurrences() {
    let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    let shuffle = [
        Move::quiet(Square::new(0, 4), Square::new(0, 3), PieceType::King),
        Move::quiet(Square::new(7, 4), Square::new(7, 3), PieceType::King),
        Move::quiet(Square::new(0, 3), Square::new(0, 4), PieceType::King),
        Move::quiet(Square::new(7, 3), Square::new(7, 4), PieceType::King),
    ];
    for _ in 0..2 {
        for &m in &shuffle {
            board.make_move(m);
        }
    }
    assert!(board.is_draw_by_clock_or_repetition());
}

#[test]
fn insufficient_material_lone_kings_is_draw() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    assert!(board.is_insufficient_material());
}

#[test]
fn king_and_rook_is_not_insufficient_material() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    assert!(!board.is_insufficient_material());
}

#[test]
fn castling_right_implies_king_and_rook_on_home_squares() {
    let board = Board::from_fen(crate::types::STARTING_FEN);
    assert!(board.has_castling_right(Color::White, super::CastleRightsSide::King));
    assert_eq!(board.piece_at(Square::new(0, 4)).kind, PieceType::King);
    assert_eq!(board.piece_at(Square::new(0, 7)).kind, PieceType::Rook);
}
