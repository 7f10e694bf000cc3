//! Crate-wide score constants shared by the transposition table, search,
//! and evaluation. Kept at the crate root (rather than nested under
//! `search`) since [`crate::tt`] is a sibling of `search`, not a child of
//! it, and needs these without reaching into a private module.

/// Scores with absolute value at or above this are checkmate scores; the
/// exact distance to mate is `MATE_SCORE - |score|` plies.
pub const MATE_THRESHOLD: i32 = 28000;

/// Mate score at ply 0; decremented by one per ply the mate is found deeper.
pub const MATE_SCORE: i32 = 29000;

/// Maximum score magnitude used as the initial alpha-beta window bound.
pub const SCORE_INFINITE: i32 = 30000;

/// Safe clamp bound for correction-history-adjusted evaluations, kept
/// comfortably below any mate score so a corrected eval never reads as one.
pub const SCORE_SAFE_MAX: i32 = 29000;

/// Additive bonus for a recognized won known-endgame (see [`crate::endgame`]).
pub const KNOWN_WIN: i32 = 10000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds_are_ordered() {
        assert!(SCORE_INFINITE > SCORE_SAFE_MAX);
        assert!(SCORE_SAFE_MAX >= MATE_SCORE);
        assert!(MATE_SCORE > MATE_THRESHOLD);
    }
}
