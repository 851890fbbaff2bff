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

use lazy_static::lazy_static;

use crate::{
    bitboard::Bitboard,
    defs::{PieceType, Side, Square},
};
use magic::{Magic, BISHOP_MAGICS, ROOK_MAGICS};

/// Items related to magic bitboards.
pub mod magic;

/// Contains lookup tables for each piece.
pub struct Lookup {
    /// The pawn attack table. `pawn_attacks[side][square] == attack bitboard
    /// for that square`.
    pawn_attacks: [[Bitboard; Square::TOTAL]; Side::TOTAL],
    /// The knight attack table. `knight_attacks[square] == attack bitboard
    /// for that square`.
    knight_attacks: [Bitboard; Square::TOTAL],
    /// The king attack table. `king_attacks[square] == attack bitboard for
    /// that square`.
    king_attacks: [Bitboard; Square::TOTAL],
    /// The magic lookup table for rooks and bishops.
    ///
    /// The rook attacks come before all the bishop attacks. It uses the
    /// 'fancy' approach. See
    /// <https://www.chessprogramming.org/Magic_Bitboards>.
    magic_table: Vec<Bitboard>,
    /// The (wrapped) magic numbers for the bishop. One per square.
    bishop_magics: [Magic; Square::TOTAL],
    /// The (wrapped) magic numbers for the rook. One per square.
    rook_magics: [Magic; Square::TOTAL],
}

/// The number of bitboards required to store all bishop attacks, where each
/// element corresponds to one permutation of blockers.
///
/// Some elements will be duplicates, as different blockers can have the same
/// attacks.
const BISHOP_SIZE: usize = 5_248;
/// The number of bitboards required to store all rook attacks, where each
/// element corresponds to one permutation of blockers.
const ROOK_SIZE: usize = 102_400;

lazy_static! {
    /// The lookup tables, built and verified once at startup.
    ///
    /// Construction panics if a magic collision carries disagreeing attack
    /// sets; a broken table must never be searched on.
    pub static ref LOOKUPS: Lookup = Lookup::new();
}

impl Lookup {
    /// Creates and verifies new lookup tables.
    ///
    /// This is meant to be called once at startup.
    fn new() -> Self {
        let pawn_attacks = Self::init_pawn_attacks();
        let knight_attacks = Self::init_knight_attacks();
        let king_attacks = Self::init_king_attacks();
        let (magic_table, bishop_magics, rook_magics) = Self::init_magics();

        Self {
            pawn_attacks,
            knight_attacks,
            king_attacks,
            magic_table,
            bishop_magics,
            rook_magics,
        }
    }

    /// Calculates and returns lookup tables for both pawns.
    fn init_pawn_attacks() -> [[Bitboard; Square::TOTAL]; Side::TOTAL] {
        let mut pawn_attacks = [[Bitboard::empty(); Square::TOTAL]; Side::TOTAL];
        for square in 0..Square::TOTAL {
            let pawn = Bitboard::from(Square(square as u8));
            let pushed_white = pawn.north();
            let pushed_black = pawn.south();
            pawn_attacks[Side::WHITE.to_index()][square] =
                pushed_white.east() | pushed_white.west();
            pawn_attacks[Side::BLACK.to_index()][square] =
                pushed_black.east() | pushed_black.west();
        }
        pawn_attacks
    }

    /// Calculates and returns a lookup table for the knight.
    fn init_knight_attacks() -> [Bitboard; Square::TOTAL] {
        let mut knight_attacks = [Bitboard::empty(); Square::TOTAL];
        for square in 0..Square::TOTAL {
            let knight = Bitboard::from(Square(square as u8));
            let mut e = knight.east();
            let mut w = knight.west();
            let mut attacks = (e | w).north().north();
            attacks |= (e | w).south().south();

            e = e.east();
            w = w.west();
            attacks |= (e | w).north();
            attacks |= (e | w).south();

            knight_attacks[square] = attacks;
        }
        knight_attacks
    }

    /// Calculates and returns a lookup table for the king.
    fn init_king_attacks() -> [Bitboard; Square::TOTAL] {
        let mut king_attacks = [Bitboard::empty(); Square::TOTAL];
        for square in 0..Square::TOTAL {
            let king = Bitboard::from(Square(square as u8));

            let mut attacks = king.east() | king.west() | king;
            attacks |= attacks.north() | attacks.south();
            attacks ^= king;

            king_attacks[square] = attacks;
        }
        king_attacks
    }

    /// Builds the magic lookup table and magic structs for both sliders.
    ///
    /// Every blocker subset of every square is pushed through the magic
    /// index and compared against the ray walker. Distinct subsets are
    /// allowed to collide only when they produce the identical attack set;
    /// a disagreeing collision means the hardcoded constants are broken, so
    /// construction panics rather than let a corrupt table be used.
    #[allow(clippy::similar_names)]
    fn init_magics() -> (
        Vec<Bitboard>,
        [Magic; Square::TOTAL],
        [Magic; Square::TOTAL],
    ) {
        let mut magic_table = vec![Bitboard::empty(); ROOK_SIZE + BISHOP_SIZE];
        let mut bishop_magics = [Magic::null(); Square::TOTAL];
        let mut rook_magics = [Magic::null(); Square::TOTAL];
        let mut b_offset = ROOK_SIZE;
        let mut r_offset = 0;

        for square in 0..Square::TOTAL {
            let square = Square(square as u8);
            let edges = Bitboard::edges_without(square);
            let b_mask =
                sliding_attacks::<{ PieceType::BISHOP.0 }>(square, Bitboard::empty()) & !edges;
            let r_mask =
                sliding_attacks::<{ PieceType::ROOK.0 }>(square, Bitboard::empty()) & !edges;
            let b_mask_bits = b_mask.count_ones();
            let r_mask_bits = r_mask.count_ones();
            let b_perms = 2_usize.pow(b_mask_bits);
            let r_perms = 2_usize.pow(r_mask_bits);

            let b_magic = Magic::new(
                BISHOP_MAGICS[square.to_index()],
                b_mask,
                b_offset,
                64 - b_mask_bits,
            );
            bishop_magics[square.to_index()] = b_magic;
            let r_magic = Magic::new(
                ROOK_MAGICS[square.to_index()],
                r_mask,
                r_offset,
                64 - r_mask_bits,
            );
            rook_magics[square.to_index()] = r_magic;

            let mut blockers = b_mask;
            for _ in 0..b_perms {
                let attacks = sliding_attacks::<{ PieceType::BISHOP.0 }>(square, blockers);
                fill_checked(&mut magic_table, b_magic.get_table_index(blockers), attacks);
                // Carry-Rippler trick
                blockers = blockers.wrapping_sub(1) & b_mask;
            }

            let mut blockers = r_mask;
            for _ in 0..r_perms {
                let attacks = sliding_attacks::<{ PieceType::ROOK.0 }>(square, blockers);
                fill_checked(&mut magic_table, r_magic.get_table_index(blockers), attacks);
                blockers = blockers.wrapping_sub(1) & r_mask;
            }

            b_offset += b_perms;
            r_offset += r_perms;
        }

        (magic_table, bishop_magics, rook_magics)
    }

    /// Finds the pawn attacks from `square`.
    pub fn pawn_attacks(&self, side: Side, square: Square) -> Bitboard {
        self.pawn_attacks[side.to_index()][square.to_index()]
    }

    /// Finds the knight attacks from `square`.
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.knight_attacks[square.to_index()]
    }

    /// Finds the king attacks from `square`.
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.king_attacks[square.to_index()]
    }

    /// Finds the bishop attacks from `square` with the given blockers.
    pub fn bishop_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        self.magic_table[self.bishop_magics[square.to_index()].get_table_index(blockers)]
    }

    /// Finds the rook attacks from `square` with the given blockers.
    pub fn rook_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        self.magic_table[self.rook_magics[square.to_index()].get_table_index(blockers)]
    }

    /// Finds the queen attacks from `square` with the given blockers.
    pub fn queen_attacks(&self, square: Square, blockers: Bitboard) -> Bitboard {
        self.bishop_attacks(square, blockers) | self.rook_attacks(square, blockers)
    }
}

/// Writes `attacks` into `table[index]`, panicking on a disagreeing
/// collision.
///
/// An attack set is never empty, so an empty slot means "not yet written".
fn fill_checked(table: &mut [Bitboard], index: usize, attacks: Bitboard) {
    let slot = &mut table[index];
    if slot.is_empty() {
        *slot = attacks;
    } else if *slot != attacks {
        panic!("destructive magic collision at table index {index}");
    }
}

/// Generates the attack set for `PIECE` on `square` by walking each ray up
/// to and including the first square in `blockers`, or the board edge.
///
/// This is the reference algorithm the magic tables are populated from and
/// verified against. Panics if `PIECE` is not the piece type of a bishop or
/// rook.
pub fn sliding_attacks<const PIECE: u8>(square: Square, blockers: Bitboard) -> Bitboard {
    let steps: [fn(Bitboard) -> Bitboard; 4] = if PIECE == PieceType::BISHOP.0 {
        [
            |bb| bb.north().east(),
            |bb| bb.south().east(),
            |bb| bb.south().west(),
            |bb| bb.north().west(),
        ]
    } else if PIECE == PieceType::ROOK.0 {
        [
            Bitboard::north,
            Bitboard::east,
            Bitboard::south,
            Bitboard::west,
        ]
    } else {
        panic!("sliding piece type not a bishop or rook");
    };

    let mut attacks = Bitboard::empty();
    for step in steps {
        let mut ray = Bitboard::from(square);
        loop {
            ray = step(ray);
            if ray.is_empty() {
                break;
            }
            attacks |= ray;
            if !(ray & blockers).is_empty() {
                break;
            }
        }
    }
    attacks
}

#[cfg(test)]
mod tests {
    use oorandom::Rand64;

    use super::{sliding_attacks, LOOKUPS};
    use crate::{
        bitboard::Bitboard,
        defs::{PieceType, Side, Square},
    };

    #[test]
    fn leaper_attacks_are_clipped_at_the_edges() {
        // a knight on a1 reaches only b3 and c2
        assert_eq!(
            LOOKUPS.knight_attacks(Square::A1),
            Bitboard::from(Square(17)) | Bitboard::from(Square(10))
        );
        // a White pawn on h4 attacks only g5
        assert_eq!(
            LOOKUPS.pawn_attacks(Side::WHITE, Square::H4),
            Bitboard::from(Square(38))
        );
        // a king in the corner has three neighbours
        assert_eq!(LOOKUPS.king_attacks(Square::H8).count_ones(), 3);
        // a king in the centre has eight
        assert_eq!(LOOKUPS.king_attacks(Square(28)).count_ones(), 8);
    }

    #[test]
    fn magic_lookups_match_the_ray_walker() {
        // the defining invariant of the magic tables: for any full
        // occupancy, the indexed lookup equals a fresh ray walk
        let mut rand_gen = Rand64::new(0x1234_5678_9abc_def0);
        for square in 0..Square::TOTAL {
            let square = Square(square as u8);
            for _ in 0..200 {
                let occupancies = Bitboard(rand_gen.rand_u64() & rand_gen.rand_u64());
                assert_eq!(
                    LOOKUPS.bishop_attacks(square, occupancies),
                    sliding_attacks::<{ PieceType::BISHOP.0 }>(square, occupancies),
                    "bishop mismatch on {square}"
                );
                assert_eq!(
                    LOOKUPS.rook_attacks(square, occupancies),
                    sliding_attacks::<{ PieceType::ROOK.0 }>(square, occupancies),
                    "rook mismatch on {square}"
                );
            }
        }
    }

    #[test]
    fn slider_attacks_stop_at_the_first_blocker() {
        // rook on a1, blocker on a4: the north ray is a2-a4 inclusive
        let blockers = Bitboard::from(Square::A4);
        let attacks = sliding_attacks::<{ PieceType::ROOK.0 }>(Square::A1, blockers);
        assert!(!(attacks & Bitboard::from(Square::A4)).is_empty());
        assert!((attacks & Bitboard::from(Square::A5)).is_empty());
    }
}
