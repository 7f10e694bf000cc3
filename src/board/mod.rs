//! Board representation: bitboards, make/unmake, FEN I/O, and move generation.
//!
//! The board stores only the minimal mutable state a position needs
//! (piece bitboards, side to move, rights, hash, clocks). Evaluation state
//! (NNUE accumulators) is maintained alongside it by the search stack, not
//! inside [`Board`] itself, so a bare `Board` stays cheap to clone for
//! perft/divide and for each Lazy-SMP worker.

mod castling;
mod fen;
mod make_unmake;
mod movegen;
mod state;

#[cfg(test)]
mod tests;

pub use castling::{CastleRights, CastleRightsSide, BLACK_KING, BLACK_QUEEN, WHITE_KING, WHITE_QUEEN};
pub use make_unmake::{NullMoveInfo, UnmakeInfo};
pub use state::Board;
