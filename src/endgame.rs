//! Known-endgame dictionary: material signatures simple enough that a
//! closed-form score beats a few plies of NNUE noise. Checked before the
//! network on every call to [`crate::eval::Evaluator::evaluate`].

use crate::board::Board;
use crate::constants::KNOWN_WIN;
use crate::types::{Color, PieceType, Square};

/// Per-color non-king material signature: popcount of each piece type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Signature {
    pawns: u32,
    knights: u32,
    bishops: u32,
    rooks: u32,
    queens: u32,
}

impl Signature {
    fn of(board: &Board, color: Color) -> Self {
        Signature {
            pawns: board.pieces_of(color, PieceType::Pawn).popcount(),
            knights: board.pieces_of(color, PieceType::Knight).popcount(),
            bishops: board.pieces_of(color, PieceType::Bishop).popcount(),
            rooks: board.pieces_of(color, PieceType::Rook).popcount(),
            queens: board.pieces_of(color, PieceType::Queen).popcount(),
        }
    }

    fn is_bare_king(self) -> bool {
        self == Signature { pawns: 0, knights: 0, bishops: 0, rooks: 0, queens: 0 }
    }

    fn is_lone(self, piece: PieceType) -> bool {
        let bare = Signature { pawns: 0, knights: 0, bishops: 0, rooks: 0, queens: 0 };
        match piece {
            PieceType::Queen => self == Signature { queens: 1, ..bare },
            PieceType::Rook => self == Signature { rooks: 1, ..bare },
            _ => false,
        }
    }

    fn is_bishop_and_knight(self) -> bool {
        self == Signature { bishops: 1, knights: 1, pawns: 0, rooks: 0, queens: 0 }
    }

    /// A single minor piece (bishop xor knight) and nothing else.
    fn is_lone_minor(self) -> bool {
        let bare = Signature { pawns: 0, knights: 0, bishops: 0, rooks: 0, queens: 0 };
        self == Signature { bishops: 1, ..bare } || self == Signature { knights: 1, ..bare }
    }
}

/// Pushes the defending king toward a corner; weighted so the corner
/// closest to the board center of the attacking king matters least, and
/// the raw distance-to-corner matters most.
fn corner_distance(king: Square) -> i32 {
    let rank = king.rank() as i32;
    let file = king.file() as i32;
    let rank_edge = rank.min(7 - rank);
    let file_edge = file.min(7 - file);
    rank_edge + file_edge
}

/// Manhattan distance between the two kings; mating nets need the
/// attacking king nearby to cut off escape squares.
fn king_distance(a: Square, b: Square) -> i32 {
    a.manhattan_distance(b) as i32
}

/// Distance from `king` to the two corners matching `bishop`'s square
/// color (light or dark), whichever is nearer. A lone bishop can only
/// help deliver mate in the corner it controls.
fn bishop_corner_distance(king: Square, bishop_light_squared: bool) -> i32 {
    let corners: [(usize, usize); 2] = if bishop_light_squared {
        [(0, 7), (7, 0)]
    } else {
        [(0, 0), (7, 7)]
    };
    corners
        .iter()
        .map(|&(r, f)| king.chebyshev_distance(Square::new(r, f)) as i32)
        .min()
        .unwrap()
}

/// Score from `winner`'s perspective if `board`'s material matches a known
/// won endgame, else `None`.
#[must_use]
pub fn probe(board: &Board) -> Option<i32> {
    for winner in [Color::White, Color::Black] {
        let loser = winner.opponent();
        let winner_sig = Signature::of(board, winner);
        let loser_sig = Signature::of(board, loser);

        let winning_king = board.king_square(winner);
        let losing_king = board.king_square(loser);
        let push_bonus = 8 * (14 - corner_distance(losing_king)) - 4 * king_distance(winning_king, losing_king);

        if loser_sig.is_bare_king() {
            if winner_sig.is_lone(PieceType::Queen) || winner_sig.is_lone(PieceType::Rook) {
                let score = KNOWN_WIN + push_bonus;
                return Some(if winner == Color::White { score } else { -score });
            }

            if winner_sig.is_bishop_and_knight() {
                let bishop_sq = board.pieces_of(winner, PieceType::Bishop).lsb();
                let light_squared = (bishop_sq.rank() + bishop_sq.file()) % 2 == 1;
                let corner_bonus = 8 * (14 - bishop_corner_distance(losing_king, light_squared));
                let score = KNOWN_WIN + corner_bonus - 4 * king_distance(winning_king, losing_king);
                return Some(if winner == Color::White { score } else { -score });
            }
            continue;
        }

        // Lone queen against a lone rook or lone minor: the extra material
        // wins with any reasonable technique, just not as cleanly as mating
        // a bare king, so the push bonus carries less weight.
        if winner_sig.is_lone(PieceType::Queen) && (loser_sig.is_lone(PieceType::Rook) || loser_sig.is_lone_minor()) {
            let score = KNOWN_WIN + push_bonus / 2;
            return Some(if winner == Color::White { score } else { -score });
        }

        // Lone rook against a lone minor piece: a textbook fortress draw
        // regardless of king placement, so the material-count evaluator
        // must not be allowed to call this "up the exchange".
        if winner_sig.is_lone(PieceType::Rook) && loser_sig.is_lone_minor() {
            return Some(0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn krvk_is_a_known_win_for_the_rook_side() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let score = probe(&board).expect("KRvK should be recognized");
        assert!(score > KNOWN_WIN);
    }

    #[test]
    fn kqvk_is_a_known_win_for_the_queen_side() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1");
        assert!(probe(&board).unwrap() > KNOWN_WIN);
    }

    #[test]
    fn kbnvk_is_a_known_win_for_the_minor_side() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/BN2K3 w - - 0 1");
        assert!(probe(&board).unwrap() > 0);
    }

    #[test]
    fn kqvkr_is_a_known_win_for_the_queen_side() {
        let board = Board::from_fen("4k2r/8/8/8/8/8/8/Q3K3 w - - 0 1");
        assert!(probe(&board).unwrap() > KNOWN_WIN);
    }

    #[test]
    fn kqvkn_is_a_known_win_for_the_queen_side() {
        let board = Board::from_fen("4kn2/8/8/8/8/8/8/Q3K3 w - - 0 1");
        assert!(probe(&board).unwrap() > KNOWN_WIN);
    }

    #[test]
    fn krvkb_is_a_known_draw() {
        let board = Board::from_fen("4kb2/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(probe(&board), Some(0));
    }

    #[test]
    fn krvkn_is_a_known_draw() {
        let board = Board::from_fen("4kn2/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(probe(&board), Some(0));
    }

    #[test]
    fn material_with_both_sides_having_pieces_is_not_probed() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(probe(&board).is_none());
    }

    #[test]
    fn insufficient_material_for_any_known_win_is_none() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(probe(&board).is_none());
    }

    #[test]
    fn score_is_negated_for_black_winning_side() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert!(probe(&board).unwrap() < -KNOWN_WIN);
    }
}
