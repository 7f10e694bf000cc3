//! Make/unmake move application with incremental Zobrist hash maintenance.

use crate::types::{CastleSide, Color, Move, MoveType, Piece, PieceType, Square, NULL_SQUARE};
use crate::zobrist;

use super::castling::{bit_for, CastleRightsSide};
use super::Board;

#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    captured: Piece,
    previous_ep: Square,
    previous_castling_rights: u8,
    previous_hash: u64,
    previous_halfmove_clock: u32,
    made_hash: u64,
    previous_repetition_count: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct NullMoveInfo {
    previous_ep: Square,
    previous_hash: u64,
}

impl Board {
    pub(crate) fn current_color(&self) -> Color {
        self.side_to_move()
    }

    fn remove_castling_right(&mut self, color: Color, side: CastleRightsSide, hash: &mut u64) {
        let bit = bit_for(color, side);
        if self.castling_rights & bit != 0 {
            self.castling_rights &= !bit;
            // XOR of the full-rights keys before/after collapses to the
            // single right's own key, since it's the only bit that changed.
            *hash ^= zobrist::castling_key(bit);
        }
    }

    /// Strip whichever castling rights `m` invalidates: king moves drop
    /// both of that color's rights, a rook move or capture on a rook's
    /// home square drops that single right.
    fn update_castling_rights_for(&mut self, m: Move, mover: Color, hash: &mut u64) {
        if m.source_piece() == PieceType::King {
            self.remove_castling_right(mover, CastleRightsSide::King, hash);
            self.remove_castling_right(mover, CastleRightsSide::Queen, hash);
        } else if m.source_piece() == PieceType::Rook {
            self.strip_rook_right_if_home(mover, m.source(), hash);
        }
        if m.is_capture() && m.captured_piece() == PieceType::Rook && m.move_type() != MoveType::EnPassant {
            self.strip_rook_right_if_home(mover.opponent(), m.destination(), hash);
        }
    }

    fn strip_rook_right_if_home(&mut self, color: Color, sq: Square, hash: &mut u64) {
        let back_rank = if color == Color::White { 0 } else { 7 };
        if sq.rank() != back_rank {
            return;
        }
        for (side, slot) in [(CastleRightsSide::King, 0usize), (CastleRightsSide::Queen, 1)] {
            if self.castle_rook_file[color.index()][slot] as usize == sq.file() {
                self.remove_castling_right(color, side, hash);
            }
        }
    }

    pub fn make_move(&mut self, m: Move) -> UnmakeInfo {
        let previous_hash = self.hash;
        let previous_ep = self.en_passant_target;
        let previous_castling_rights = self.castling_rights;
        let previous_halfmove_clock = self.halfmove_clock;

        let mover = self.current_color();
        let mut hash = self.hash;
        hash ^= zobrist::toggle_side_to_move_key();
        hash ^= zobrist::en_passant_key(ep_file(previous_ep));

        let captured = self.apply_capture(m, mover, &mut hash);
        self.relocate_moving_piece(m, mover, &mut hash);
        self.update_castling_rights_for(m, mover, &mut hash);

        self.en_passant_target = NULL_SQUARE;
        if m.move_type() == MoveType::DoublePush {
            let ep_rank = usize::midpoint(m.source().rank(), m.destination().rank());
            let ep_sq = Square::new(ep_rank, m.source().file());
            self.en_passant_target = ep_sq;
            hash ^= zobrist::en_passant_key(ep_file(ep_sq));
        }

        self.halfmove_clock = if m.source_piece() == PieceType::Pawn || m.is_capture() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };

        self.white_to_move = !self.white_to_move;
        self.hash = hash;

        let made_hash = hash;
        let previous_repetition_count = self.record_repetition(made_hash);

        UnmakeInfo {
            captured,
            previous_ep,
            previous_castling_rights,
            previous_hash,
            previous_halfmove_clock,
            made_hash,
            previous_repetition_count,
        }
    }

    fn apply_capture(&mut self, m: Move, mover: Color, hash: &mut u64) -> Piece {
        match m.move_type() {
            MoveType::EnPassant => {
                let captured_rank = if mover == Color::White {
                    m.destination().rank() - 1
                } else {
                    m.destination().rank() + 1
                };
                let captured_sq = Square::new(captured_rank, m.destination().file());
                let captured = Piece::new(mover.opponent(), PieceType::Pawn);
                self.remove_piece(captured_sq, captured);
                *hash ^= zobrist::piece_key(PieceType::Pawn, mover.opponent(), captured_sq);
                captured
            }
            MoveType::SimpleCapture | MoveType::PromotionCapture => {
                let captured = Piece::new(mover.opponent(), m.captured_piece());
                self.remove_piece(m.destination(), captured);
                *hash ^= zobrist::piece_key(m.captured_piece(), mover.opponent(), m.destination());
                captured
            }
            _ => Piece::NULL,
        }
    }

    fn relocate_moving_piece(&mut self, m: Move, mover: Color, hash: &mut u64) {
        if m.move_type() == MoveType::Castles {
            self.relocate_castling_pieces(m, mover, hash);
            return;
        }

        let moving_kind = m.source_piece();
        self.remove_piece(m.source(), Piece::new(mover, moving_kind));
        *hash ^= zobrist::piece_key(moving_kind, mover, m.source());

        let placed_kind = if m.is_promotion() { m.promotion_piece() } else { moving_kind };
        self.set_piece(m.destination(), Piece::new(mover, placed_kind));
        *hash ^= zobrist::piece_key(placed_kind, mover, m.destination());
    }

    fn relocate_castling_pieces(&mut self, m: Move, mover: Color, hash: &mut u64) {
        let back_rank = m.source().rank();
        self.remove_piece(m.source(), Piece::new(mover, PieceType::King));
        *hash ^= zobrist::piece_key(PieceType::King, mover, m.source());
        self.set_piece(m.destination(), Piece::new(mover, PieceType::King));
        *hash ^= zobrist::piece_key(PieceType::King, mover, m.destination());

        let rook_from = Square::new(back_rank, m.castle_rook_file() as usize);
        let rook_to_file = if m.castle_side() == CastleSide::King { 5 } else { 3 };
        let rook_to = Square::new(back_rank, rook_to_file);
        self.remove_piece(rook_from, Piece::new(mover, PieceType::Rook));
        *hash ^= zobrist::piece_key(PieceType::Rook, mover, rook_from);
        self.set_piece(rook_to, Piece::new(mover, PieceType::Rook));
        *hash ^= zobrist::piece_key(PieceType::Rook, mover, rook_to);
    }

    pub fn unmake_move(&mut self, m: Move, info: UnmakeInfo) {
        self.restore_repetition(info.made_hash, info.previous_repetition_count);

        self.white_to_move = !self.white_to_move;
        let mover = self.current_color();

        if m.move_type() == MoveType::Castles {
            self.undo_castling(m, mover);
        } else {
            self.undo_standard_move(m, mover, info.captured);
        }

        self.en_passant_target = info.previous_ep;
        self.castling_rights = info.previous_castling_rights;
        self.hash = info.previous_hash;
        self.halfmove_clock = info.previous_halfmove_clock;
    }

    fn undo_castling(&mut self, m: Move, mover: Color) {
        let back_rank = m.source().rank();
        self.remove_piece(m.destination(), Piece::new(mover, PieceType::King));
        self.set_piece(m.source(), Piece::new(mover, PieceType::King));

        let rook_to_file = if m.castle_side() == CastleSide::King { 5 } else { 3 };
        let rook_to = Square::new(back_rank, rook_to_file);
        let rook_from = Square::new(back_rank, m.castle_rook_file() as usize);
        self.remove_piece(rook_to, Piece::new(mover, PieceType::Rook));
        self.set_piece(rook_from, Piece::new(mover, PieceType::Rook));
    }

    fn undo_standard_move(&mut self, m: Move, mover: Color, captured: Piece) {
        let placed_kind = if m.is_promotion() { m.promotion_piece() } else { m.source_piece() };
        self.remove_piece(m.destination(), Piece::new(mover, placed_kind));
        self.set_piece(m.source(), Piece::new(mover, m.source_piece()));

        if m.move_type() == MoveType::EnPassant {
            let captured_rank = if mover == Color::White {
                m.destination().rank() - 1
            } else {
                m.destination().rank() + 1
            };
            let captured_sq = Square::new(captured_rank, m.destination().file());
            self.set_piece(captured_sq, captured);
        } else if !captured.is_null() {
            self.set_piece(m.destination(), captured);
        }
    }

    pub(crate) fn make_null_move(&mut self) -> NullMoveInfo {
        let previous_hash = self.hash;
        let previous_ep = self.en_passant_target;
        let mut hash = self.hash;
        hash ^= zobrist::toggle_side_to_move_key();
        hash ^= zobrist::en_passant_key(ep_file(previous_ep));
        self.en_passant_target = NULL_SQUARE;
        self.white_to_move = !self.white_to_move;
        self.hash = hash;
        NullMoveInfo { previous_ep, previous_hash }
    }

    pub(crate) fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.previous_ep;
        self.hash = info.previous_hash;
    }
}

fn ep_file(sq: Square) -> Option<u8> {
    if sq.is_null() {
        None
    } else {
        Some(sq.file() as u8)
    }
}
