//! Target-square tables for leapers and ray walks for sliders.

use crate::Bitboard;
use chess_core::{Color, Square};

/// (file, rank) steps of a knight.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// (file, rank) steps of a king, excluding castling.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const KNIGHT_TARGETS: [Bitboard; 64] = leaper_table(&KNIGHT_OFFSETS);

const KING_TARGETS: [Bitboard; 64] = leaper_table(&KING_OFFSETS);

/// Builds, for every square, the set reachable by one of `offsets`.
const fn leaper_table(offsets: &[(i8, i8); 8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            let (f, r) = (file + df, rank + dr);
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }

    table
}

/// Squares a knight on `sq` jumps to, ignoring occupancy.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_TARGETS[sq.index() as usize]
}

/// Squares a king on `sq` steps to, ignoring occupancy.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_TARGETS[sq.index() as usize]
}

/// The one or two diagonal squares in front of a pawn of `color` on `sq`.
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    [-1, 1]
        .into_iter()
        .filter_map(|df| sq.offset(df, color.forward()))
        .collect()
}

/// Walks each direction from `sq` until the board edge or the first occupied
/// square, which is included.
pub fn ray_attacks(sq: Square, directions: &[(i8, i8)], occupied: Bitboard) -> Bitboard {
    let mut targets = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(df, dr) {
            targets.insert(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    targets
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, &BISHOP_DIRECTIONS, occupied)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, &ROOK_DIRECTIONS, occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}
