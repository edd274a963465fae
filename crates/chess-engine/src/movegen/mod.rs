//! Pseudo-legal move generation.
//!
//! Moves obey each piece's movement rules and board occupancy. Nothing is
//! filtered for leaving the mover's own king in check, and castling does not
//! look at attacked squares.

mod attacks;

use crate::apply::castling_rook;
use crate::{Bitboard, Position};
use chess_core::{Color, File, Move, Piece, PieceKind, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, ray_attacks,
    rook_attacks, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

/// A list of generated moves.
///
/// Pseudo-legal output on an arbitrary placement has no useful upper bound,
/// so the list grows as needed. It starts with room for a typical position.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Initial capacity; ordinary positions fit without reallocating.
    pub const TYPICAL_MOVES: usize = 64;

    /// Creates an empty move list.
    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(Self::TYPICAL_MOVES),
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        self.moves.retain(f);
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// How a pawn reaching the far rank is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Promotions {
    /// One move per promotion kind: queen, rook, bishop, knight.
    #[default]
    All,
    /// A single queen promotion.
    QueenOnly,
}

impl Promotions {
    fn kinds(self) -> &'static [PieceKind] {
        match self {
            Promotions::All => &PieceKind::PROMOTIONS,
            Promotions::QueenOnly => &[PieceKind::Queen],
        }
    }
}

/// Generates every pseudo-legal move for `color`, all promotion kinds included.
pub fn generate_moves(position: &Position, color: Color) -> MoveList {
    generate_moves_with(position, color, Promotions::All)
}

/// Generates every pseudo-legal move for `color` with the given promotion policy.
pub fn generate_moves_with(position: &Position, color: Color, promotions: Promotions) -> MoveList {
    let mut moves = MoveList::new();
    for kind in PieceKind::ALL {
        for from in position.pieces(kind, color) {
            piece_moves(position, from, Piece::new(kind, color), promotions, &mut moves);
        }
    }
    moves
}

/// Pseudo-legal moves of whatever stands on `from`; empty when the square is empty.
pub fn moves_from(position: &Position, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    if let Some(piece) = position.piece_at(from) {
        piece_moves(position, from, piece, Promotions::All, &mut moves);
    }
    moves
}

fn piece_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    promotions: Promotions,
    moves: &mut MoveList,
) {
    let occupied = position.occupied();
    match piece.kind {
        PieceKind::Pawn => pawn_moves(position, from, piece, promotions, moves),
        PieceKind::Knight => target_moves(position, from, piece, knight_attacks(from), moves),
        PieceKind::Bishop => {
            target_moves(position, from, piece, bishop_attacks(from, occupied), moves)
        }
        PieceKind::Rook => target_moves(position, from, piece, rook_attacks(from, occupied), moves),
        PieceKind::Queen => {
            target_moves(position, from, piece, queen_attacks(from, occupied), moves)
        }
        PieceKind::King => {
            target_moves(position, from, piece, king_attacks(from), moves);
            castling_moves(position, from, piece, moves);
        }
    }
}

/// Emits a quiet move or a capture for every target not held by our own side.
fn target_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    targets: Bitboard,
    moves: &mut MoveList,
) {
    for to in targets - position.occupied_by(piece.color) {
        match position.piece_at(to) {
            Some(captured) => moves.push(Move::capture(from, to, piece, captured)),
            None => moves.push(Move::quiet(from, to, piece)),
        }
    }
}

fn pawn_moves(
    position: &Position,
    from: Square,
    piece: Piece,
    promotions: Promotions,
    moves: &mut MoveList,
) {
    let us = piece.color;
    let forward = us.forward();

    if let Some(one) = from.offset(0, forward).filter(|sq| position.is_empty_at(*sq)) {
        push_pawn_move(from, one, piece, None, promotions, moves);

        if from.rank() == us.pawn_rank() {
            if let Some(two) = one.offset(0, forward).filter(|sq| position.is_empty_at(*sq)) {
                moves.push(Move::double_push(from, two, piece));
            }
        }
    }

    for to in pawn_attacks(from, us) {
        if let Some(target) = position.piece_at(to).filter(|p| p.color != us) {
            push_pawn_move(from, to, piece, Some(target), promotions, moves);
        }
    }

    // Rank and adjacency only: whether the enemy pawn just double-pushed is
    // not tracked.
    if from.rank() == us.en_passant_rank() {
        let victim = Piece::new(PieceKind::Pawn, us.opposite());
        for df in [-1, 1] {
            let beside = from.offset(df, 0);
            let behind = from.offset(df, forward);
            if let (Some(beside), Some(to)) = (beside, behind) {
                if position.piece_at(beside) == Some(victim) && position.is_empty_at(to) {
                    moves.push(Move::en_passant(from, to, piece, victim));
                }
            }
        }
    }
}

fn push_pawn_move(
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    promotions: Promotions,
    moves: &mut MoveList,
) {
    if to.rank() == piece.color.promotion_rank() {
        for &kind in promotions.kinds() {
            moves.push(Move::promotion(from, to, piece, kind, captured));
        }
    } else {
        match captured {
            Some(captured) => moves.push(Move::capture(from, to, piece, captured)),
            None => moves.push(Move::quiet(from, to, piece)),
        }
    }
}

/// Castling from the king's home square with the matching rook at home and
/// nothing in between. Attacked squares are not considered.
fn castling_moves(position: &Position, from: Square, king: Piece, moves: &mut MoveList) {
    let back_rank = king.color.back_rank();
    if from != Square::new(File::E, back_rank) {
        return;
    }

    let rook = Piece::new(PieceKind::Rook, king.color);
    for (king_side, target_file) in [(true, File::G), (false, File::C)] {
        let (rook_home, _) = castling_rook(king.color, king_side);
        if position.piece_at(rook_home) == Some(rook) && position.is_path_clear(from, rook_home) {
            let to = Square::new(target_file, back_rank);
            moves.push(Move::castle(from, to, king, king_side));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::MoveFlag;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn count_flag(moves: &MoveList, pred: impl Fn(MoveFlag) -> bool) -> usize {
        moves.iter().filter(|m| pred(m.flag())).count()
    }

    #[test]
    fn movelist_push_and_retain() {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let mut list = MoveList::new();
        assert!(list.is_empty());
        list.push(Move::quiet(sq("e2"), sq("e3"), pawn));
        list.push(Move::double_push(sq("e2"), sq("e4"), pawn));
        list.push(Move::quiet(sq("d2"), sq("d3"), pawn));
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].to(), sq("e4"));

        list.retain(|m| m.from() == sq("e2"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let position = Position::startpos();
        for color in Color::BOTH {
            let moves = generate_moves(&position, color);
            assert_eq!(moves.len(), 20);
            assert_eq!(count_flag(&moves, |f| f == MoveFlag::DoublePawnPush), 8);
            assert!(moves.iter().all(|m| m.piece().color == color));
        }
    }

    #[test]
    fn pawn_push_is_blocked() {
        let position = Position::from_fen("8/8/8/8/8/4p3/4P3/8").unwrap();
        let moves = moves_from(&position, sq("e2"));
        assert!(moves.is_empty());

        let position = Position::from_fen("8/8/8/8/4p3/8/4P3/8").unwrap();
        let moves = moves_from(&position, sq("e2"));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to(), sq("e3"));
    }

    #[test]
    fn pawn_captures_only_enemies() {
        let position = Position::from_fen("8/8/8/3p1P2/4P3/8/8/8").unwrap();
        let moves = moves_from(&position, sq("e4"));
        let captures: Vec<_> = moves.iter().filter(|m| m.is_capture()).collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].to(), sq("d5"));
        assert_eq!(captures[0].flag(), MoveFlag::Capture);
    }

    #[test]
    fn exhaustive_promotions() {
        let position = Position::from_fen("1r6/P7/8/8/8/8/8/4K2k").unwrap();
        let moves = moves_from(&position, sq("a7"));
        // four quiet promotions on a8, four capturing promotions on b8
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.flag().promotion_piece().is_some()));
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 4);
    }

    #[test]
    fn queen_only_promotions() {
        let position = Position::from_fen("8/P7/8/8/8/8/8/4K2k").unwrap();
        let moves = generate_moves_with(&position, Color::White, Promotions::QueenOnly);
        let promos: Vec<_> = moves
            .iter()
            .filter_map(|m| m.flag().promotion_piece())
            .collect();
        assert_eq!(promos, vec![PieceKind::Queen]);
    }

    #[test]
    fn en_passant_on_rank_and_adjacency() {
        let position = Position::from_fen("8/8/8/3pP3/8/8/8/8").unwrap();
        let moves = moves_from(&position, sq("e5"));
        let ep: Vec<_> = moves
            .iter()
            .filter(|m| m.flag() == MoveFlag::EnPassantCapture)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to(), sq("d6"));
        assert_eq!(ep[0].captured(), Some(Piece::new(PieceKind::Pawn, Color::Black)));
    }

    #[test]
    fn black_en_passant() {
        let position = Position::from_fen("8/8/8/8/3pP3/8/8/8").unwrap();
        let moves = moves_from(&position, sq("d4"));
        assert_eq!(count_flag(&moves, |f| f == MoveFlag::EnPassantCapture), 1);
    }

    #[test]
    fn no_en_passant_off_rank() {
        let position = Position::from_fen("8/8/8/8/3pP3/8/8/8").unwrap();
        let moves = moves_from(&position, sq("e4"));
        assert_eq!(count_flag(&moves, |f| f == MoveFlag::EnPassantCapture), 0);
    }

    #[test]
    fn knight_skips_own_pieces() {
        let position = Position::startpos();
        let moves = moves_from(&position, Square::B1);
        let targets: Vec<_> = moves.iter().map(|m| m.to()).collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&sq("a3")));
        assert!(targets.contains(&sq("c3")));
    }

    #[test]
    fn sliders_stop_at_first_piece() {
        let position = Position::from_fen("8/8/3p4/8/3R4/8/3P4/8").unwrap();
        let moves = moves_from(&position, sq("d4"));
        let targets: Vec<_> = moves.iter().map(|m| m.to()).collect();
        assert!(targets.contains(&sq("d6")));
        assert!(!targets.contains(&sq("d7")));
        assert!(!targets.contains(&sq("d2")));
        assert!(targets.contains(&sq("d3")));
        // 1 up + capture, 1 down, 7 sideways
        assert_eq!(targets.len(), 10);
    }

    #[test]
    fn castling_both_sides() {
        let position = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R").unwrap();
        let moves = generate_moves(&position, Color::White);
        let castles: Vec<_> = moves.iter().filter(|m| m.flag().is_castling()).collect();
        assert_eq!(castles.len(), 2);
        assert!(castles.iter().any(|m| m.to() == Square::G1));
        assert!(castles.iter().any(|m| m.to() == Square::C1));
    }

    #[test]
    fn castling_needs_empty_path_and_rook() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2n").unwrap();
        let moves = generate_moves(&position, Color::White);
        assert_eq!(count_flag(&moves, |f| f.is_castling()), 0);
    }

    #[test]
    fn crowded_board_keeps_every_move() {
        // Far more than 256 pseudo-legal moves; nothing may be dropped.
        let position = Position::from_fen("QQQQQQQQ/Q6Q/Q6Q/Q6Q/Q6Q/Q6Q/Q6Q/BQQQQQQQ").unwrap();
        let moves = generate_moves(&position, Color::White);
        let per_piece: usize = position
            .occupied_by(Color::White)
            .into_iter()
            .map(|from| moves_from(&position, from).len())
            .sum();
        assert_eq!(moves.len(), per_piece);
        assert_eq!(moves.len(), 288);
        assert!(moves.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn castling_ignores_attacks() {
        // The e-file rook attacks the white king; castling is still produced.
        let position = Position::from_fen("4r3/8/8/8/8/8/8/4K2R").unwrap();
        let moves = generate_moves(&position, Color::White);
        assert_eq!(count_flag(&moves, |f| f == MoveFlag::KingSideCastling), 1);
    }
}
