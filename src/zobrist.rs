//! Zobrist hashing for chess positions.
//!
//! `hash = EMPTY_KEY ^ piece_square[piece][color][sq] ^ (black_to_move ? btm : 0)
//!         ^ castling[rights] ^ ep_square[file]`
//!
//! `EMPTY_KEY` is XORed in unconditionally so the hash of a fully empty
//! board with no rights/ep/side-to-move component is `1`, keeping `0`
//! free as the transposition table's "unused slot" sentinel.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::types::{Color, PieceType, Square};

/// Deterministic seed: two runs of the engine hash identical positions
/// identically (search determinism property, spec §8 item 6).
const ZOBRIST_SEED: u64 = 0x5EED_C0DE_CAFE_1234;

pub const EMPTY_KEY: u64 = 1;

struct ZobristKeys {
    /// `[piece_type_index][color][square]`
    piece_square: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    /// Indexed by the raw 4-bit castling-rights mask (0..16), each a
    /// precomputed XOR of the per-right keys so lookup is O(1).
    castling: [u64; 16],
    /// Indexed by file (0..8); only the file of the en-passant target matters.
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_square = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_square {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move = rng.gen();

        let mut right_keys = [0u64; 4];
        for key in &mut right_keys {
            *key = rng.gen();
        }
        let mut castling = [0u64; 16];
        for (mask, slot) in castling.iter_mut().enumerate() {
            let mut xor = 0u64;
            for (bit, key) in right_keys.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    xor ^= key;
                }
            }
            *slot = xor;
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_square,
            black_to_move,
            castling,
            en_passant_file,
        }
    }
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[inline]
#[must_use]
pub fn piece_key(kind: PieceType, color: Color, sq: Square) -> u64 {
    debug_assert!(!kind.is_none());
    ZOBRIST.piece_square[kind.index()][color.index()][sq.index()]
}

#[inline]
#[must_use]
pub fn side_to_move_key(white_to_move: bool) -> u64 {
    if white_to_move {
        0
    } else {
        ZOBRIST.black_to_move
    }
}

/// The raw black-to-move key, for toggling the hash incrementally in
/// make/unmake (XOR is its own inverse, so the same key flips both ways).
#[inline]
#[must_use]
pub fn toggle_side_to_move_key() -> u64 {
    ZOBRIST.black_to_move
}

#[inline]
#[must_use]
pub fn castling_key(rights: u8) -> u64 {
    ZOBRIST.castling[(rights & 0xF) as usize]
}

/// `ep`: `None` when there is no en-passant target this ply.
#[inline]
#[must_use]
pub fn en_passant_key(ep_file: Option<u8>) -> u64 {
    match ep_file {
        Some(file) => ZOBRIST.en_passant_file[file as usize],
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_hash_is_one() {
        let hash = EMPTY_KEY ^ side_to_move_key(true) ^ castling_key(0) ^ en_passant_key(None);
        assert_eq!(hash, 1);
    }

    #[test]
    fn keys_are_deterministic_across_calls() {
        assert_eq!(
            piece_key(PieceType::Queen, Color::Black, Square::new(3, 3)),
            piece_key(PieceType::Queen, Color::Black, Square::new(3, 3))
        );
    }

    #[test]
    fn distinct_pieces_get_distinct_keys() {
        let a = piece_key(PieceType::Pawn, Color::White, Square::new(1, 0));
        let b = piece_key(PieceType::Knight, Color::White, Square::new(1, 0));
        assert_ne!(a, b);
    }
}
