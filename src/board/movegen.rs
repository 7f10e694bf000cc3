//! Pseudo-legal move generation per piece type, legality filtering via
//! make/unmake-and-check, and the attacker/checker queries SEE, search
//! extensions, and check detection all share.

use crate::attack_tables::{between, piece_attacks};
use crate::bitboard::Bitboard;
use crate::types::{CastleSide, Color, Move, MoveList, MoveType, PieceType, Square, PROMOTION_PIECES};

use super::castling::CastleRightsSide;
use super::Board;

impl Board {
    /// All squares from which `by` attacks `target`, given the current
    /// (or caller-supplied) occupancy. Used directly by static exchange
    /// evaluation to re-probe after each capture peels a blocker away.
    #[must_use]
    pub fn attackers_to(&self, target: Square, occupied: Bitboard) -> Bitboard {
        let mut attackers = Bitboard::EMPTY;
        for color in [Color::White, Color::Black] {
            let c = color.index();
            let pawn_sources = crate::attack_tables::pawn_attacks(color.opponent(), target.index());
            attackers |= pawn_sources & self.pieces[c][PieceType::Pawn.index()];
            attackers |=
                crate::attack_tables::knight_attacks(target.index()) & self.pieces[c][PieceType::Knight.index()];
            attackers |=
                crate::attack_tables::king_attacks(target.index()) & self.pieces[c][PieceType::King.index()];
            let bishops_queens = self.pieces[c][PieceType::Bishop.index()] | self.pieces[c][PieceType::Queen.index()];
            attackers |= piece_attacks(PieceType::Bishop, target, occupied) & bishops_queens;
            let rooks_queens = self.pieces[c][PieceType::Rook.index()] | self.pieces[c][PieceType::Queen.index()];
            attackers |= piece_attacks(PieceType::Rook, target, occupied) & rooks_queens;
        }
        attackers
    }

    #[must_use]
    pub fn is_square_attacked_by(&self, target: Square, by: Color) -> bool {
        !(self.attackers_to(target, self.all_occupied) & self.occupied[by.index()]).is_empty()
    }

    #[must_use]
    pub fn checkers(&self, color: Color) -> Bitboard {
        let king_sq = self.king_square(color);
        self.attackers_to(king_sq, self.all_occupied) & self.occupied[color.opponent().index()]
    }

    #[must_use]
    pub fn in_check(&self) -> bool {
        !self.checkers(self.side_to_move()).is_empty()
    }

    /// Bitboard of this color's pieces that are pinned to their own king,
    /// each paired implicitly with the ray back to the pinner (recovered
    /// via [`crate::attack_tables::between`] when needed).
    #[must_use]
    pub fn pinned(&self, color: Color) -> Bitboard {
        let king_sq = self.king_square(color);
        let opp = color.opponent();
        let mut pinned = Bitboard::EMPTY;

        let bishops_queens =
            self.pieces[opp.index()][PieceType::Bishop.index()] | self.pieces[opp.index()][PieceType::Queen.index()];
        let rooks_queens =
            self.pieces[opp.index()][PieceType::Rook.index()] | self.pieces[opp.index()][PieceType::Queen.index()];

        let candidate_pinners = (piece_attacks(PieceType::Bishop, king_sq, Bitboard::EMPTY) & bishops_queens)
            | (piece_attacks(PieceType::Rook, king_sq, Bitboard::EMPTY) & rooks_queens);

        for pinner_sq in candidate_pinners.iter() {
            let between_mask = between(king_sq, pinner_sq);
            let blockers = between_mask & self.all_occupied;
            if blockers.popcount() == 1 && !(blockers & self.occupied[color.index()]).is_empty() {
                pinned |= blockers;
            }
        }
        pinned
    }

    fn generate_pseudo_moves(&self, moves: &mut MoveList) {
        let color = self.side_to_move();
        let c = color.index();
        let own = self.occupied[c];
        let enemy = self.occupied[color.opponent().index()];

        self.generate_pawn_moves(color, moves);

        for from in self.pieces[c][PieceType::Knight.index()].iter() {
            let targets = crate::attack_tables::knight_attacks(from.index()) & !own;
            self.push_leaper_moves(from, targets, PieceType::Knight, enemy, moves);
        }
        for from in self.pieces[c][PieceType::Bishop.index()].iter() {
            let targets = piece_attacks(PieceType::Bishop, from, self.all_occupied) & !own;
            self.push_leaper_moves(from, targets, PieceType::Bishop, enemy, moves);
        }
        for from in self.pieces[c][PieceType::Rook.index()].iter() {
            let targets = piece_attacks(PieceType::Rook, from, self.all_occupied) & !own;
            self.push_leaper_moves(from, targets, PieceType::Rook, enemy, moves);
        }
        for from in self.pieces[c][PieceType::Queen.index()].iter() {
            let targets = piece_attacks(PieceType::Queen, from, self.all_occupied) & !own;
            self.push_leaper_moves(from, targets, PieceType::Queen, enemy, moves);
        }
        let king_sq = self.king_square(color);
        let king_targets = crate::attack_tables::king_attacks(king_sq.index()) & !own;
        self.push_leaper_moves(king_sq, king_targets, PieceType::King, enemy, moves);
        self.generate_castling_moves(color, king_sq, moves);
    }

    fn push_leaper_moves(
        &self,
        from: Square,
        targets: Bitboard,
        kind: PieceType,
        enemy: Bitboard,
        moves: &mut MoveList,
    ) {
        for to in targets.iter() {
            if enemy.contains(to) {
                moves.push(Move::capture(from, to, kind, self.piece_at(to).kind));
            } else {
                moves.push(Move::quiet(from, to, kind));
            }
        }
    }

    fn generate_pawn_moves(&self, color: Color, moves: &mut MoveList) {
        let c = color.index();
        let is_white = color == Color::White;
        let forward: isize = if is_white { 1 } else { -1 };
        let start_rank = if is_white { 1 } else { 6 };
        let promo_rank = if is_white { 7 } else { 0 };
        let enemy = self.occupied[color.opponent().index()];

        for from in self.pieces[c][PieceType::Pawn.index()].iter() {
            let r = from.rank() as isize;
            let f = from.file() as isize;
            let one_r = r + forward;

            if (0..8).contains(&one_r) {
                let one = Square::new(one_r as usize, f as usize);
                if self.is_empty(one) {
                    push_pawn_advance(from, one, promo_rank, moves);
                    if r as usize == start_rank {
                        let two = Square::new((one_r + forward) as usize, f as usize);
                        if self.is_empty(two) {
                            moves.push(Move::double_push(from, two, PieceType::Pawn));
                        }
                    }
                }
                for df in [-1isize, 1] {
                    let cf = f + df;
                    if !(0..8).contains(&cf) {
                        continue;
                    }
                    let target = Square::new(one_r as usize, cf as usize);
                    if enemy.contains(target) {
                        push_pawn_capture(from, target, self.piece_at(target).kind, promo_rank, moves);
                    } else if self.ep_matches(target) {
                        moves.push(Move::en_passant(from, target, PieceType::Pawn));
                    }
                }
            }
        }
    }

    fn ep_matches(&self, sq: Square) -> bool {
        !self.en_passant_target.is_null() && self.en_passant_target == sq
    }

    fn generate_castling_moves(&self, color: Color, king_sq: Square, moves: &mut MoveList) {
        if !self.checkers(color).is_empty() {
            return;
        }
        let back_rank = king_sq.rank();
        let opp = color.opponent();

        for (side, rook_slot) in [(CastleRightsSide::King, 0usize), (CastleRightsSide::Queen, 1)] {
            if !self.has_castling_right(color, side) {
                continue;
            }
            let rook_file = self.castle_rook_file[color.index()][rook_slot];
            let rook_sq = Square::new(back_rank, rook_file as usize);
            if self.piece_at(rook_sq).kind != PieceType::Rook {
                continue;
            }

            let king_dest_file = if side == CastleRightsSide::King { 6 } else { 2 };
            let rook_dest_file = if side == CastleRightsSide::King { 5 } else { 3 };
            let king_dest = Square::new(back_rank, king_dest_file);
            let rook_dest = Square::new(back_rank, rook_dest_file);

            if !self.castling_path_clear(king_sq, rook_sq, king_dest, rook_dest) {
                continue;
            }
            if self.castling_path_safe(king_sq, king_dest, opp) {
                moves.push(Move::castles(
                    king_sq,
                    king_dest,
                    rook_file,
                    if side == CastleRightsSide::King { CastleSide::King } else { CastleSide::Queen },
                ));
            }
        }
    }

    /// All squares that must be empty (excluding the king's and rook's own
    /// starting squares) for the rook and king to reach their destinations.
    fn castling_path_clear(&self, king_sq: Square, rook_sq: Square, king_dest: Square, rook_dest: Square) -> bool {
        let mut required = Bitboard::EMPTY;
        required |= span(king_sq, king_dest);
        required |= span(rook_sq, rook_dest);
        required &= !Bitboard::from_square(king_sq);
        required &= !Bitboard::from_square(rook_sq);
        (required & self.all_occupied).is_empty()
    }

    fn castling_path_safe(&self, king_sq: Square, king_dest: Square, opp: Color) -> bool {
        let step: isize = if king_dest.file() > king_sq.file() { 1 } else { -1 };
        let mut file = king_sq.file() as isize;
        let dest_file = king_dest.file() as isize;
        loop {
            let sq = Square::new(king_sq.rank(), file as usize);
            if self.is_square_attacked_by(sq, opp) {
                return false;
            }
            if file == dest_file {
                break;
            }
            file += step;
        }
        true
    }

    /// All pseudo-legal moves filtered for legality by make/unmake and a
    /// post-move check test. Simpler than maintaining a running pin set
    /// through generation and cheap enough at these node counts; castling
    /// legality (king not passing through check) is handled separately in
    /// [`Board::generate_castling_moves`].
    #[must_use]
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_moves(&mut pseudo);
        let mover = self.side_to_move();

        let mut legal = MoveList::new();
        for &m in pseudo.as_slice() {
            let info = self.make_move(m);
            if self.checkers(mover).is_empty() {
                legal.push(m);
            }
            self.unmake_move(m, info);
        }
        legal
    }

    /// Captures and promotions only, for quiescence search.
    #[must_use]
    pub fn generate_legal_captures(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_moves(&mut pseudo);
        let mover = self.side_to_move();

        let mut legal = MoveList::new();
        for &m in pseudo.as_slice() {
            if m.move_type() == MoveType::Normal || m.move_type() == MoveType::DoublePush {
                continue;
            }
            let info = self.make_move(m);
            if self.checkers(mover).is_empty() {
                legal.push(m);
            }
            self.unmake_move(m, info);
        }
        legal
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && self.generate_legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && self.generate_legal_moves().is_empty()
    }
}

fn push_pawn_advance(from: Square, to: Square, promo_rank: usize, moves: &mut MoveList) {
    if to.rank() == promo_rank {
        for &p in PROMOTION_PIECES.iter() {
            moves.push(Move::promotion(from, to, p, PieceType::None));
        }
    } else {
        moves.push(Move::quiet(from, to, PieceType::Pawn));
    }
}

fn push_pawn_capture(from: Square, to: Square, captured: PieceType, promo_rank: usize, moves: &mut MoveList) {
    if to.rank() == promo_rank {
        for &p in PROMOTION_PIECES.iter() {
            moves.push(Move::promotion(from, to, p, captured));
        }
    } else {
        moves.push(Move::capture(from, to, PieceType::Pawn, captured));
    }
}

/// Squares strictly between `a` and `b` plus `b` itself — the set a king
/// or rook sweeps through when sliding from `a` to `b` along a rank.
fn span(a: Square, b: Square) -> Bitboard {
    if a == b {
        return Bitboard::EMPTY;
    }
    let step: isize = if b.file() > a.file() { 1 } else { -1 };
    let mut mask = Bitboard::EMPTY;
    let mut file = a.file() as isize + step;
    let target = b.file() as isize;
    loop {
        mask |= Bitboard::from_square(Square::new(a.rank(), file as usize));
        if file == target {
            break;
        }
        file += step;
    }
    mask
}
