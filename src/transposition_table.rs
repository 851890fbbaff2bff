/*
 * Pincer, the core of a UCI-compatible chess engine
 * Copyright (C) 2025 the Pincer developers
 *
 * Pincer is free software: you can redistribute it and/or modify it under
 * the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * Pincer is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
 * FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
 * details.
 *
 * You should have received a copy of the GNU General Public License along
 * with Pincer. If not, see <https://www.gnu.org/licenses/>.
 */

use std::mem::size_of;

use crate::{
    board::Key,
    evaluation::{Eval, MATE_BOUND},
    movegen::Move,
    search::Depth,
};

/// The bound of a score depending on how it was obtained.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    /// A lower bound: `best_score >= beta`.
    Lower,
    /// An exact bound: `alpha < best_score < beta`.
    Exact,
    /// An upper bound: `best_score <= alpha`.
    Upper,
}

/// A single entry in a transposition table.
///
/// It contains a key as a checksum and various other fields that are
/// useful in future identical positions.
#[derive(Clone, Copy)]
struct TranspositionEntry {
    /// The key, used as a checksum.
    key: Key,
    /// The score of the position, relative to the node it was found at.
    score: Eval,
    /// The best move in the position, if one was found.
    mv: Option<Move>,
    /// The depth at which the score was obtained.
    depth: Depth,
    /// The bound of the score.
    bound: Bound,
    /// Which search this entry was stored during.
    generation: u8,
    /// Whether the entry has ever been written.
    valid: bool,
}

/// The information from a successful transposition table lookup.
#[derive(Clone, Copy)]
pub struct TranspositionHit {
    /// The score of the position, relative to the probing node.
    score: Eval,
    /// The best move in the position, if one was found.
    mv: Option<Move>,
    /// The depth at which the score was obtained.
    depth: Depth,
    /// The bound of the score.
    bound: Bound,
}

/// A transposition table: a cache of previously-searched positions and
/// what was learned about each of them.
///
/// The length is always a power of two so a key maps to a slot with a
/// single mask. The search is single-threaded, so no synchronisation is
/// needed.
pub struct TranspositionTable {
    /// The entries. `entries.len()` is a power of two.
    entries: Vec<TranspositionEntry>,
    /// The current search generation.
    ///
    /// Entries from older generations are always worth replacing.
    generation: u8,
}

impl TranspositionEntry {
    /// An entry that has never been written.
    const INVALID: Self = Self {
        key: 0,
        score: 0,
        mv: None,
        depth: 0,
        bound: Bound::Upper,
        generation: 0,
        valid: false,
    };
}

impl TranspositionHit {
    /// Returns the score, relative to the probing node.
    pub const fn score(self) -> Eval {
        self.score
    }

    /// Returns the best move.
    pub const fn mv(self) -> Option<Move> {
        self.mv
    }

    /// Returns the depth at which the score was obtained.
    pub const fn depth(self) -> Depth {
        self.depth
    }

    /// Returns the bound of the score.
    pub const fn bound(self) -> Bound {
        self.bound
    }
}

impl TranspositionTable {
    /// Creates a new, zero-sized [`TranspositionTable`].
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: 0,
        }
    }

    /// Creates a new, zeroed [`TranspositionTable`] with the given size in
    /// MiB.
    pub fn with_capacity(size_mib: usize) -> Self {
        let mut tt = Self::new();
        tt.resize(size_mib);
        tt
    }

    /// Resizes the table to the largest power-of-two entry count that fits
    /// in the given size in MiB, and zeroes it.
    pub fn resize(&mut self, size_mib: usize) {
        let max_entries = size_mib * 1024 * 1024 / size_of::<TranspositionEntry>();
        let entries = if max_entries == 0 {
            1
        } else {
            1 << max_entries.ilog2()
        };
        self.entries = vec![TranspositionEntry::INVALID; entries];
        self.generation = 0;
    }

    /// Zeroes the table, as on `ucinewgame`.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = TranspositionEntry::INVALID;
        }
        self.generation = 0;
    }

    /// Starts a new search: entries stored from now on belong to a fresh
    /// generation.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns the entry with the given key, or [`None`] if it does not
    /// exist.
    ///
    /// Mate scores come back adjusted to be relative to the probing node:
    /// the caller's `height` is subtracted from winning scores and added to
    /// losing ones.
    pub fn load(&self, key: Key, height: Depth) -> Option<TranspositionHit> {
        if self.entries.is_empty() {
            return None;
        }

        let entry = self.entries[self.index(key)];
        if !entry.valid || entry.key != key {
            return None;
        }

        Some(TranspositionHit {
            score: denormalise(entry.score, height),
            mv: entry.mv,
            depth: entry.depth,
            bound: entry.bound,
        })
    }

    /// Stores a search result.
    ///
    /// The slot is replaced when it is invalid, from an older generation,
    /// when the new depth is within two plies of the stored depth, or on an
    /// equal-depth exact result. An entry that survives still has its best
    /// move filled in if it had none.
    pub fn store(
        &mut self,
        key: Key,
        score: Eval,
        mv: Option<Move>,
        depth: Depth,
        bound: Bound,
        height: Depth,
    ) {
        if self.entries.is_empty() {
            return;
        }

        let generation = self.generation;
        let index = self.index(key);
        let entry = &mut self.entries[index];

        let replace = !entry.valid
            || entry.generation != generation
            || depth + 2 >= entry.depth
            || (depth == entry.depth && bound == Bound::Exact);

        if replace {
            *entry = TranspositionEntry {
                key,
                score: normalise(score, height),
                mv,
                depth,
                bound,
                generation,
                valid: true,
            };
        } else if entry.mv.is_none() {
            entry.mv = mv;
        }
    }

    /// Converts a key into a valid index.
    fn index(&self, key: Key) -> usize {
        (key & (self.entries.len() as u64 - 1)) as usize
    }
}

/// If `score` is a mate score, assume it is relative to the root node and
/// turn it into a mate score relative to the current node.
fn normalise(score: Eval, height: Depth) -> Eval {
    if score >= MATE_BOUND {
        score + Eval::from(height)
    } else if score <= -MATE_BOUND {
        score - Eval::from(height)
    } else {
        score
    }
}

/// If `score` is a mate score, assume it is relative to the current node
/// and turn it into a mate score relative to the root node.
fn denormalise(score: Eval, height: Depth) -> Eval {
    if score >= MATE_BOUND {
        score - Eval::from(height)
    } else if score <= -MATE_BOUND {
        score + Eval::from(height)
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TranspositionTable};
    use crate::{
        defs::{Piece, Square},
        evaluation::{mate_in, mated_in, MATE},
        movegen::{Move, MoveKind},
    };

    /// An arbitrary move for the entries.
    fn some_move() -> Move {
        Move::new(Square::E1, Square::G1, Piece::WKING, MoveKind::Castle)
    }

    #[test]
    fn length_is_a_power_of_two() {
        for size_mib in [1, 3, 16, 100] {
            let tt = TranspositionTable::with_capacity(size_mib);
            assert!(tt.entries.len().is_power_of_two());
        }
    }

    #[test]
    fn probe_returns_what_was_stored() {
        let mut tt = TranspositionTable::with_capacity(1);
        tt.store(0xdead_beef, 123, Some(some_move()), 5, Bound::Exact, 0);

        let hit = tt.load(0xdead_beef, 0).unwrap();
        assert_eq!(hit.score(), 123);
        assert_eq!(hit.depth(), 5);
        assert_eq!(hit.bound(), Bound::Exact);
        assert_eq!(hit.mv(), Some(some_move()));

        // a different key in the same slot misses
        assert!(tt.load(0xdead_beef ^ (1 << 63), 0).is_none());
    }

    #[test]
    fn mate_scores_are_adjusted_by_height() {
        let mut tt = TranspositionTable::with_capacity(1);

        // a mate found 5 plies from the root, stored at height 2: the entry
        // keeps "mate in 3 from this node"
        tt.store(42, mate_in(5), None, 8, Bound::Exact, 2);

        // probing the same position at height 4 must report the mate as 7
        // plies from the root: 4 to reach the node, 3 more to mate
        let hit = tt.load(42, 4).unwrap();
        assert_eq!(hit.score(), mate_in(7));

        // and symmetrically for being mated
        tt.new_search();
        tt.store(43, mated_in(5), None, 8, Bound::Exact, 2);
        let hit = tt.load(43, 4).unwrap();
        assert_eq!(hit.score(), mated_in(7));

        // a non-mate score is left alone
        tt.new_search();
        tt.store(44, 77, None, 8, Bound::Exact, 6);
        assert_eq!(tt.load(44, 1).unwrap().score(), 77);
        assert!(mate_in(7) < MATE);
    }

    #[test]
    fn deep_entries_survive_shallow_stores_within_a_search() {
        let mut tt = TranspositionTable::with_capacity(1);
        tt.new_search();

        tt.store(7, 100, None, 10, Bound::Exact, 0);

        // a much shallower upper bound does not evict it, but does donate
        // its move to the empty slot
        tt.store(7, -3, Some(some_move()), 1, Bound::Upper, 0);
        let hit = tt.load(7, 0).unwrap();
        assert_eq!(hit.score(), 100);
        assert_eq!(hit.depth(), 10);
        assert_eq!(hit.mv(), Some(some_move()));

        // within two plies of the stored depth, the new result wins
        tt.store(7, 50, None, 8, Bound::Lower, 0);
        assert_eq!(tt.load(7, 0).unwrap().score(), 50);

        // an entry from an earlier generation is always replaced
        tt.store(7, 60, None, 10, Bound::Exact, 0);
        tt.new_search();
        tt.store(7, -1, None, 1, Bound::Upper, 0);
        assert_eq!(tt.load(7, 0).unwrap().score(), -1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut tt = TranspositionTable::with_capacity(1);
        tt.store(9, 5, None, 3, Bound::Exact, 0);
        tt.clear();
        assert!(tt.load(9, 0).is_none());
    }
}
