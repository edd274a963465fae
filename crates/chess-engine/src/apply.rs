//! Move application: turning a resolved [`Move`] into a new placement.
//!
//! Nothing here checks legality. Moves come from the generator or the SAN
//! parser, which are responsible for that.

use crate::Position;
use chess_core::{Color, File, Move, MoveFlag, Piece, PieceKind, Square};

/// Home and post-castling squares of the rook that moves with the king.
pub fn castling_rook(color: Color, king_side: bool) -> (Square, Square) {
    let rank = color.back_rank();
    let (home, target) = if king_side {
        (File::H, File::F)
    } else {
        (File::A, File::D)
    };
    (Square::new(home, rank), Square::new(target, rank))
}

/// Square of the pawn taken by an en passant capture: the mover's rank and
/// the destination's file.
#[inline]
pub fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::new(to.file(), from.rank())
}

/// Applies `m` to `position` in place.
pub fn apply_move(m: &Move, position: &mut Position) {
    let from = m.from();
    let to = m.to();
    let piece = m.piece();

    position.remove(from);

    match m.flag() {
        MoveFlag::EnPassantCapture => {
            position.remove(en_passant_victim(from, to));
        }
        _ if m.is_capture() => {
            position.remove(to);
        }
        _ => {}
    }

    let landed = match m.flag().promotion_piece() {
        Some(kind) => Piece::new(kind, piece.color),
        None => piece,
    };
    position.put(to, landed);

    if m.flag().is_castling() {
        let king_side = m.flag() == MoveFlag::KingSideCastling;
        let (rook_from, rook_to) = castling_rook(piece.color, king_side);
        let rook = Piece::new(PieceKind::Rook, piece.color);
        if position.piece_at(rook_from) == Some(rook) {
            position.remove(rook_from);
            position.put(rook_to, rook);
        } else {
            tracing::debug!(%rook_from, "castling without a rook on its home square");
        }
    }
}

/// Returns a copy of `position` with `m` applied.
#[inline]
pub fn make_move(position: &Position, m: &Move) -> Position {
    let mut next = *position;
    apply_move(m, &mut next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn white(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::White)
    }

    fn black(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Black)
    }

    #[test]
    fn quiet_move() {
        let before = Position::startpos();
        let m = Move::quiet(Square::G1, sq("f3"), white(PieceKind::Knight));
        let after = make_move(&before, &m);
        assert_eq!(after.piece_at(sq("f3")), Some(white(PieceKind::Knight)));
        assert_eq!(after.piece_at(Square::G1), None);
        // The original is untouched.
        assert_eq!(before.piece_at(Square::G1), Some(white(PieceKind::Knight)));
    }

    #[test]
    fn capture_replaces_victim() {
        let mut pos = Position::from_fen("8/8/8/3p4/4P3/8/8/8").unwrap();
        let m = Move::capture(sq("e4"), sq("d5"), white(PieceKind::Pawn), black(PieceKind::Pawn));
        apply_move(&m, &mut pos);
        assert_eq!(pos.piece_at(sq("d5")), Some(white(PieceKind::Pawn)));
        assert_eq!(pos.occupied().count(), 1);
        assert!(pos.pieces(PieceKind::Pawn, Color::Black).is_empty());
    }

    #[test]
    fn en_passant_removes_pawn_beside_origin() {
        let mut pos = Position::from_fen("8/8/8/3pP3/8/8/8/8").unwrap();
        let m = Move::en_passant(sq("e5"), sq("d6"), white(PieceKind::Pawn), black(PieceKind::Pawn));
        apply_move(&m, &mut pos);
        assert_eq!(pos.piece_at(sq("d6")), Some(white(PieceKind::Pawn)));
        assert_eq!(pos.piece_at(sq("d5")), None);
        assert_eq!(pos.piece_at(sq("e5")), None);
        assert_eq!(pos.occupied().count(), 1);
    }

    #[test]
    fn promotion_substitutes_piece() {
        let mut pos = Position::from_fen("1r6/P7/8/8/8/8/8/8").unwrap();
        let m = Move::promotion(
            sq("a7"),
            sq("b8"),
            white(PieceKind::Pawn),
            PieceKind::Knight,
            Some(black(PieceKind::Rook)),
        );
        apply_move(&m, &mut pos);
        assert_eq!(pos.piece_at(sq("b8")), Some(white(PieceKind::Knight)));
        assert!(pos.pieces(PieceKind::Pawn, Color::White).is_empty());
        assert!(pos.occupied_by(Color::Black).is_empty());
    }

    #[test]
    fn king_side_castling_moves_rook() {
        let mut pos = Position::from_fen("8/8/8/8/8/8/8/4K2R").unwrap();
        let m = Move::castle(Square::E1, Square::G1, white(PieceKind::King), true);
        apply_move(&m, &mut pos);
        assert_eq!(pos.piece_at(Square::G1), Some(white(PieceKind::King)));
        assert_eq!(pos.piece_at(Square::F1), Some(white(PieceKind::Rook)));
        assert_eq!(pos.piece_at(Square::H1), None);
        assert_eq!(pos.piece_at(Square::E1), None);
    }

    #[test]
    fn queen_side_castling_moves_rook() {
        let mut pos = Position::from_fen("r3k3/8/8/8/8/8/8/8").unwrap();
        let m = Move::castle(Square::E8, Square::C8, black(PieceKind::King), false);
        apply_move(&m, &mut pos);
        assert_eq!(pos.piece_at(Square::C8), Some(black(PieceKind::King)));
        assert_eq!(pos.piece_at(Square::D8), Some(black(PieceKind::Rook)));
        assert_eq!(pos.piece_at(Square::A8), None);
    }

    #[test]
    fn castling_geometry() {
        assert_eq!(castling_rook(Color::White, true), (Square::H1, Square::F1));
        assert_eq!(castling_rook(Color::Black, false), (Square::A8, Square::D8));
        assert_eq!(en_passant_victim(sq("e5"), sq("d6")), sq("d5"));
        assert_eq!(en_passant_victim(sq("d4"), sq("e3")), sq("e4"));
    }
}
