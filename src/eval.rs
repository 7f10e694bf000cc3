//! Static evaluation: known-endgame dictionary first, NNUE forward pass
//! otherwise. The accumulator that backs the NNUE pass lives outside
//! [`crate::board::Board`] — it's search-layer state, refreshed from
//! scratch at the root and updated incrementally as moves are made.

use std::path::Path;

use crate::board::Board;
use crate::endgame;
use crate::error::{EngineError, EngineResult};
use crate::nnue::{NnueAccumulator, NnueNetwork};
use crate::types::{Color, Move, MoveType, PieceType, Square};

/// Loads and evaluates positions against one NNUE network. Cheap to share
/// (`Arc<Evaluator>`) across Lazy-SMP workers: evaluation only ever reads
/// the network, never mutates it.
pub struct Evaluator {
    network: NnueNetwork,
}

impl Evaluator {
    /// Loads the network from `path` if given, falling back to the
    /// compiled-in default when the `embedded_nnue` feature is enabled.
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        if let Some(path) = path {
            let network = NnueNetwork::load(path).map_err(|e| EngineError::Nnue(e.to_string()))?;
            return Ok(Evaluator { network });
        }
        Self::embedded_or_err()
    }

    #[cfg(feature = "embedded_nnue")]
    fn embedded_or_err() -> EngineResult<Self> {
        Ok(Evaluator { network: NnueNetwork::from_embedded() })
    }

    #[cfg(not(feature = "embedded_nnue"))]
    fn embedded_or_err() -> EngineResult<Self> {
        Err(EngineError::Nnue(
            "no EvalFile configured and no embedded network compiled in".to_string(),
        ))
    }

    /// An all-zero network that lets search and UCI machinery run with no
    /// real evaluation signal. Used as a startup fallback when no EvalFile
    /// is configured and no network is embedded.
    #[must_use]
    pub fn placeholder() -> Self {
        Evaluator { network: NnueNetwork::zeroed() }
    }

    /// Builds a fresh accumulator for `board` from scratch. Called at the
    /// root of a search and whenever an incremental diff isn't available
    /// (e.g. after a null move, where no feature actually changes).
    #[must_use]
    pub fn refresh(&self, board: &Board) -> NnueAccumulator {
        let mut white_features = Vec::with_capacity(32);
        let mut black_features = Vec::with_capacity(32);
        for color in [Color::White, Color::Black] {
            for &kind in PieceType::ALL.iter() {
                for sq in board.pieces_of(color, kind).iter() {
                    white_features.push(feature_index(kind, color, sq, 0));
                    black_features.push(feature_index(kind, color, sq, 1));
                }
            }
        }
        let mut acc = NnueAccumulator::default();
        acc.refresh(&white_features, &black_features, &self.network);
        acc
    }

    /// Evaluates `board` given its current accumulator, from the side to
    /// move's perspective. `correction` is a centipawn nudge from the
    /// caller's pawn correction history; `noise_seed` diversifies helper
    /// threads in Lazy-SMP by perturbing the score a few centipawns based
    /// on the position hash.
    #[must_use]
    pub fn evaluate(&self, board: &Board, acc: &NnueAccumulator, correction: i32, noise_seed: Option<u64>) -> i32 {
        if let Some(known) = endgame::probe(board) {
            return if board.white_to_move() { known } else { -known };
        }

        let mut score = self.network.evaluate(acc, board.white_to_move()) + correction;

        if let Some(seed) = noise_seed {
            let span = (2 * NOISE_MAGNITUDE + 1) as u64;
            let noise = (board.hash().wrapping_mul(seed) % span) as i32 - NOISE_MAGNITUDE;
            score += noise;
        }

        score
    }

    /// Applies `diff`'s removed/added features to `acc` in place.
    pub fn apply_diff(&self, acc: &mut NnueAccumulator, diff: &FeatureDiff) {
        for &(kind, color, sq) in diff.removed() {
            acc.sub_feature(
                feature_index(kind, color, sq, 0),
                feature_index(kind, color, sq, 1),
                &self.network,
            );
        }
        for &(kind, color, sq) in diff.added() {
            acc.add_feature(
                feature_index(kind, color, sq, 0),
                feature_index(kind, color, sq, 1),
                &self.network,
            );
        }
    }

    /// Computes the feature changes `m` will cause, evaluated against
    /// `board` *before* the move is made (captured-piece and rook-move
    /// bookkeeping both need the pre-move occupancy).
    #[must_use]
    pub fn feature_diff_for_move(&self, board: &Board, m: Move) -> FeatureDiff {
        let mut diff = FeatureDiff::default();
        let mover = board.side_to_move();
        let moving_piece = m.source_piece();

        diff.remove(moving_piece, mover, m.source());

        match m.move_type() {
            MoveType::EnPassant => {
                let captured_sq = Square::new(m.source().rank(), m.destination().file());
                diff.remove(PieceType::Pawn, mover.opponent(), captured_sq);
                diff.add(PieceType::Pawn, mover, m.destination());
            }
            MoveType::SimplePromotion => {
                diff.add(m.promotion_piece(), mover, m.destination());
            }
            MoveType::PromotionCapture => {
                diff.remove(m.captured_piece(), mover.opponent(), m.destination());
                diff.add(m.promotion_piece(), mover, m.destination());
            }
            MoveType::SimpleCapture => {
                diff.remove(m.captured_piece(), mover.opponent(), m.destination());
                diff.add(moving_piece, mover, m.destination());
            }
            MoveType::Castles => {
                let back_rank = m.source().rank();
                let rook_from = Square::new(back_rank, m.castle_rook_file() as usize);
                let rook_dest_file = if m.destination().file() > m.source().file() { 5 } else { 3 };
                let rook_dest = Square::new(back_rank, rook_dest_file);
                diff.remove(PieceType::Rook, mover, rook_from);
                diff.add(PieceType::Rook, mover, rook_dest);
                diff.add(moving_piece, mover, m.destination());
            }
            MoveType::Normal | MoveType::DoublePush => {
                diff.add(moving_piece, mover, m.destination());
            }
        }

        diff
    }
}

const NOISE_MAGNITUDE: i32 = 3;

/// At most two pieces leave a square and two arrive, even for castling
/// (king + rook) — the only move types that touch more than one square.
#[derive(Default)]
pub struct FeatureDiff {
    removed: Vec<(PieceType, Color, Square)>,
    added: Vec<(PieceType, Color, Square)>,
}

impl FeatureDiff {
    fn remove(&mut self, kind: PieceType, color: Color, sq: Square) {
        self.removed.push((kind, color, sq));
    }

    fn add(&mut self, kind: PieceType, color: Color, sq: Square) {
        self.added.push((kind, color, sq));
    }

    #[must_use]
    pub fn removed(&self) -> &[(PieceType, Color, Square)] {
        &self.removed
    }

    #[must_use]
    pub fn added(&self) -> &[(PieceType, Color, Square)] {
        &self.added
    }
}

#[inline]
fn feature_index(kind: PieceType, color: Color, sq: Square, perspective: usize) -> usize {
    crate::nnue::network::feature_index(kind.index(), color.index(), sq.as_index(), perspective)
}

#[cfg(test)]
#[cfg(feature = "embedded_nnue")]
mod tests {
    use super::*;
    use crate::types::STARTING_FEN;

    #[test]
    fn refresh_then_evaluate_does_not_panic() {
        let evaluator = Evaluator::load(None).expect("embedded network");
        let board = Board::from_fen(STARTING_FEN);
        let acc = evaluator.refresh(&board);
        let _ = evaluator.evaluate(&board, &acc, 0, None);
    }

    #[test]
    fn known_endgame_overrides_network_output() {
        let evaluator = Evaluator::load(None).expect("embedded network");
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let acc = evaluator.refresh(&board);
        let score = evaluator.evaluate(&board, &acc, 0, None);
        assert!(score > crate::constants::KNOWN_WIN);
    }

    #[test]
    fn incremental_diff_matches_full_refresh() {
        let evaluator = Evaluator::load(None).expect("embedded network");
        let mut board = Board::from_fen(STARTING_FEN);
        let mut acc = evaluator.refresh(&board);

        let m = crate::types::Move::double_push(Square::new(1, 4), Square::new(3, 4), PieceType::Pawn);
        let diff = evaluator.feature_diff_for_move(&board, m);
        board.make_move(m);
        evaluator.apply_diff(&mut acc, &diff);

        let fresh = evaluator.refresh(&board);
        assert_eq!(acc.white, fresh.white);
        assert_eq!(acc.black, fresh.black);
    }
}
