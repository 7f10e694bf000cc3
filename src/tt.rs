//! Transposition table for caching search results.
//!
//! Fixed-size open-addressed array indexed by Zobrist hash, single-entry
//! buckets (no replacement chain, per the known-endgame budget this engine
//! targets). Entries store mate scores normalized to "distance from this
//! node" rather than "distance from the search root", so a mate score
//! found deep in one subtree and reused from a shallower node still
//! reports the right number of moves to mate.
//! [`TranspositionTable::store`]/[`TranspositionTable::probe`] do that
//! normalization at the boundary so callers only ever see root-relative
//! scores.

use crate::constants::MATE_THRESHOLD;
use crate::types::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    /// Score is the exact value.
    Exact,
    /// Score is at least this value (failed high, raised alpha past beta).
    LowerBound,
    /// Score is at most this value (failed low, never raised alpha).
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
struct TTEntry {
    hash: u64,
    depth: u32,
    score: i32,
    bound_type: BoundType,
    best_move: Move,
    generation: u16,
}

/// A probed entry with its score already converted back to root-relative
/// terms for the probing node's ply.
#[derive(Clone, Copy, Debug)]
pub struct ProbedEntry {
    pub depth: u32,
    pub score: i32,
    pub bound_type: BoundType,
    pub best_move: Move,
}

pub struct TranspositionTable {
    table: Vec<Option<TTEntry>>,
    mask: usize,
    occupied: usize,
    generation: u16,
}

impl TranspositionTable {
    /// `size_mb`: desired size in megabytes; rounded down to a power-of-two
    /// slot count so hash lookups are a mask instead of a modulo.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let mut num_slots = (size_mb * 1024 * 1024) / entry_size.max(1);
        num_slots = num_slots.next_power_of_two() / 2;
        if num_slots == 0 {
            num_slots = 1024;
        }

        TranspositionTable {
            table: vec![None; num_slots],
            mask: num_slots - 1,
            occupied: 0,
            generation: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Clears all entries without reallocating, and resets the aging clock.
    pub fn clear(&mut self) {
        for slot in &mut self.table {
            *slot = None;
        }
        self.occupied = 0;
        self.generation = 0;
    }

    /// Resizes to approximately `size_mb` megabytes, discarding all entries.
    pub fn resize(&mut self, size_mb: usize) {
        *self = Self::new(size_mb);
    }

    /// Advances the aging clock. Called once per `go` so stale entries from
    /// prior searches lose replacement priority against fresh ones even at
    /// equal depth.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn probe(&self, hash: u64, ply: u32) -> Option<ProbedEntry> {
        let entry = self.table[self.index(hash)].as_ref()?;
        if entry.hash != hash {
            return None;
        }
        Some(ProbedEntry {
            depth: entry.depth,
            score: score_from_tt(entry.score, ply),
            bound_type: entry.bound_type,
            best_move: entry.best_move,
        })
    }

    /// Store policy: a slot holding the same key is always overwritten
    /// (keeping its best move if the new one is null). A slot holding a
    /// different key is only replaced if the existing entry is from a
    /// stale generation, is shallower than the new entry, or is a
    /// non-exact bound being superseded by an exact one at equal-or-greater
    /// depth.
    pub fn store(&mut self, hash: u64, depth: u32, ply: u32, score: i32, bound_type: BoundType, best_move: Move) {
        let score = score_to_tt(score, ply);
        let generation = self.generation;
        let index = self.index(hash);
        let slot = &mut self.table[index];

        match slot {
            Some(existing) if existing.hash == hash => {
                let keep_move = if best_move.is_null() { existing.best_move } else { best_move };
                *existing = TTEntry { hash, depth, score, bound_type, best_move: keep_move, generation };
            }
            Some(existing) => {
                let stale = existing.generation != generation;
                let shallower = existing.depth <= depth;
                let upgrading_to_exact =
                    existing.bound_type != BoundType::Exact && bound_type == BoundType::Exact && depth >= existing.depth;
                if stale || shallower || upgrading_to_exact {
                    *existing = TTEntry { hash, depth, score, bound_type, best_move, generation };
                }
            }
            None => {
                *slot = Some(TTEntry { hash, depth, score, bound_type, best_move, generation });
                self.occupied += 1;
            }
        }
    }

    /// Fraction of entries (per mille) whose generation matches the
    /// current search, sampled over the first 1000 slots per spec.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.table.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let filled = self.table[..sample]
            .iter()
            .filter(|slot| matches!(slot, Some(e) if e.generation == self.generation))
            .count();
        ((filled * 1000) / sample) as u32
    }
}

/// Converts a root-relative score into one relative to the node being
/// stored, so it reads back correctly no matter how deep a later probe is.
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`]: converts a node-relative mate score stored at
/// some earlier ply back into one relative to the probing node's ply.
fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceType, Square};

    fn some_move() -> Move {
        Move::quiet(Square::new(1, 4), Square::new(3, 4), PieceType::Pawn)
    }

    #[test]
    fn store_then_probe_round_trips() {
        let mut tt = TranspositionTable::new(1);
        let m = some_move();
        tt.store(0xDEAD_BEEF, 5, 0, 123, BoundType::Exact, m);
        let probed = tt.probe(0xDEAD_BEEF, 0).expect("entry present");
        assert_eq!(probed.depth, 5);
        assert_eq!(probed.score, 123);
        assert_eq!(probed.bound_type, BoundType::Exact);
        assert_eq!(probed.best_move, m);
    }

    #[test]
    fn probe_miss_returns_none() {
        let tt = TranspositionTable::new(1);
        assert!(tt.probe(0x1234, 0).is_none());
    }

    #[test]
    fn mate_score_normalizes_across_differing_ply() {
        let mut tt = TranspositionTable::new(1);
        let m = some_move();
        // Mate in 3 plies found 5 plies into the tree: stored node-relative.
        let mate_score = MATE_THRESHOLD + 3;
        tt.store(0x42, 10, 5, mate_score, BoundType::Exact, m);

        // Probed from the root (ply 0), the same forced mate is now 5 plies
        // further away, so the reported score should read as mate in 8.
        let probed = tt.probe(0x42, 0).unwrap();
        assert_eq!(probed.score, mate_score + 5);

        // Probed again from the exact ply it was stored at, the score is
        // unchanged.
        let probed_same_ply = tt.probe(0x42, 5).unwrap();
        assert_eq!(probed_same_ply.score, mate_score);
    }

    #[test]
    fn losing_mate_score_normalizes_the_other_direction() {
        let mut tt = TranspositionTable::new(1);
        let m = some_move();
        let mate_score = -(MATE_THRESHOLD + 2);
        tt.store(0x99, 10, 4, mate_score, BoundType::Exact, m);
        let probed = tt.probe(0x99, 1).unwrap();
        assert_eq!(probed.score, mate_score - 3);
    }

    #[test]
    fn same_key_always_overwrites() {
        let mut tt = TranspositionTable::new(1);
        let m = some_move();
        tt.store(0x1, 4, 0, 10, BoundType::Exact, m);
        tt.store(0x1, 2, 0, 20, BoundType::LowerBound, m);
        let probed = tt.probe(0x1, 0).unwrap();
        assert_eq!(probed.depth, 2);
        assert_eq!(probed.score, 20);
        assert_eq!(probed.bound_type, BoundType::LowerBound);
    }

    #[test]
    fn null_best_move_does_not_clobber_existing_best_move() {
        let mut tt = TranspositionTable::new(1);
        let m = some_move();
        tt.store(0x7, 4, 0, 10, BoundType::Exact, m);
        tt.store(0x7, 6, 0, 15, BoundType::UpperBound, Move::null());
        let probed = tt.probe(0x7, 0).unwrap();
        assert_eq!(probed.best_move, m);
    }

    #[test]
    fn clear_resets_occupancy() {
        let mut tt = TranspositionTable::new(1);
        tt.store(0x1, 4, 0, 10, BoundType::Exact, some_move());
        assert!(tt.hashfull_per_mille() > 0);
        tt.clear();
        assert_eq!(tt.hashfull_per_mille(), 0);
        assert!(tt.probe(0x1, 0).is_none());
    }

    #[test]
    fn deeper_entry_survives_shallower_different_key_collision() {
        let mut tt = TranspositionTable::new(1);
        // Force a collision: both hashes land on slot 0 of the power-of-two
        // table (1 MB rounds to 1024 slots here).
        let slots = 1usize << 10;
        let a = 0u64;
        let b = (slots as u64) * 3;
        tt.store(a, 8, 0, 10, BoundType::Exact, some_move());
        tt.store(b, 2, 0, 20, BoundType::Exact, some_move());
        assert!(tt.probe(a, 0).is_some());
        assert!(tt.probe(b, 0).is_none());
    }
}
