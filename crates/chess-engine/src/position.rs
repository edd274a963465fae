//! Board position: twelve bitboards, one per piece kind and color.

use chess_core::{Color, FenError, File, Piece, PieceKind, Placement, Rank, Square};
use std::fmt;

use crate::Bitboard;

/// Piece placement on the board.
///
/// Every square is set in at most one of the twelve bitboards; [`put`] and
/// [`remove`] are the only mutators and both keep it that way.
///
/// [`put`]: Position::put
/// [`remove`]: Position::remove
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Bitboards indexed by `[color][kind]`.
    boards: [[Bitboard; 6]; 2],
}

impl Position {
    /// Creates a position with no pieces.
    pub const fn empty() -> Self {
        Position {
            boards: [[Bitboard::EMPTY; 6]; 2],
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
            for color in Color::BOTH {
                position.put(Square::new(file, color.back_rank()), Piece::new(kind, color));
                position.put(
                    Square::new(file, color.pawn_rank()),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }
        position
    }

    /// Decodes the piece-placement field of a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let placement = Placement::parse(fen)?;
        let mut position = Position::empty();
        for (sq, piece) in placement.iter() {
            position.put(sq, piece);
        }
        Ok(position)
    }

    /// Decodes a FEN string, falling back to the starting position.
    pub fn from_fen_or_startpos(fen: &str) -> Self {
        match Self::from_fen(fen) {
            Ok(position) => position,
            Err(err) => {
                tracing::warn!(%fen, %err, "FEN rejected, using the starting position");
                Self::startpos()
            }
        }
    }

    /// Encodes the piece placement as a FEN field.
    pub fn to_fen(&self) -> String {
        Placement::encode(self.iter())
    }

    /// Returns the piece on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                if self.boards[color.index()][kind.index()].contains(sq) {
                    return Some(Piece::new(kind, color));
                }
            }
        }
        None
    }

    /// Returns a bitboard of pieces of the given kind and color.
    #[inline]
    pub fn pieces(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.boards[color.index()][kind.index()]
    }

    /// Returns a bitboard of every square holding a piece of `color`.
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.boards[color.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, bb| acc | *bb)
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied_by(Color::White) | self.occupied_by(Color::Black)
    }

    /// Returns true when nothing stands on `sq`.
    #[inline]
    pub fn is_empty_at(&self, sq: Square) -> bool {
        !self.occupied().contains(sq)
    }

    /// Places `piece` on `sq`, replacing whatever stood there.
    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.remove(sq);
        self.boards[piece.color.index()][piece.kind.index()].insert(sq);
    }

    /// Clears `sq`, returning the piece that stood there.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.boards[piece.color.index()][piece.kind.index()].remove(sq);
        Some(piece)
    }

    /// Iterates every occupied square with its piece, a1 first.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Returns true if no square strictly between `from` and `to` is occupied.
    ///
    /// The squares must share a file, a rank or a diagonal; any other pair is
    /// reported as blocked. Adjacent squares and `from == to` are clear.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let (df, dr) = from.delta(to);
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return false;
        }

        let step = (df.signum(), dr.signum());
        let occupied = self.occupied();
        let mut current = from;
        loop {
            current = match current.offset(step.0, step.1) {
                Some(next) if next != to => next,
                _ => return true,
            };
            if occupied.contains(current) {
                return false;
            }
        }
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

/// Renders an 8x8 diagram, rank 8 at the top.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, *rank))
                    .map_or('.', Piece::to_fen_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::STARTPOS;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_matches_fen() {
        assert_eq!(Position::startpos(), Position::from_fen(STARTPOS).unwrap());
        assert_eq!(
            Position::startpos().to_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(
            pos.piece_at(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            pos.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn counts() {
        let pos = Position::startpos();
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.occupied_by(Color::Black).count(), 16);
        assert_eq!(pos.pieces(PieceKind::Pawn, Color::White).count(), 8);
        assert_eq!(pos.pieces(PieceKind::King, Color::Black).count(), 1);
    }

    #[test]
    fn put_replaces_existing_piece() {
        let mut pos = Position::startpos();
        let knight = Piece::new(PieceKind::Knight, Color::Black);
        pos.put(sq("e2"), knight);
        assert_eq!(pos.piece_at(sq("e2")), Some(knight));
        assert_eq!(pos.pieces(PieceKind::Pawn, Color::White).count(), 7);
        assert_eq!(pos.occupied().count(), 32);
    }

    #[test]
    fn remove_returns_piece() {
        let mut pos = Position::startpos();
        assert_eq!(
            pos.remove(Square::A1),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(pos.remove(Square::A1), None);
        assert!(pos.is_empty_at(Square::A1));
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R";
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn invalid_fen_falls_back() {
        assert!(Position::from_fen("not a fen").is_err());
        assert_eq!(Position::from_fen_or_startpos("8/8/8"), Position::startpos());
    }

    #[test]
    fn iter_visits_every_piece_once() {
        let pos = Position::startpos();
        let pieces: Vec<_> = pos.iter().collect();
        assert_eq!(pieces.len(), 32);
        assert_eq!(
            pieces[0],
            (Square::A1, Piece::new(PieceKind::Rook, Color::White))
        );
    }

    #[test]
    fn path_clear_on_lines() {
        let pos = Position::startpos();
        // a1 rook to a3 is blocked by the a2 pawn
        assert!(!pos.is_path_clear(Square::A1, sq("a3")));
        // a2 to a7 crosses empty ranks only
        assert!(pos.is_path_clear(sq("a2"), sq("a7")));
        // c1 to e3 passes d2
        assert!(!pos.is_path_clear(Square::C1, sq("e3")));
        assert!(pos.is_path_clear(sq("c3"), sq("f6")));
        assert!(pos.is_path_clear(sq("h3"), sq("a3")));
    }

    #[test]
    fn path_clear_adjacent_and_non_aligned() {
        let pos = Position::startpos();
        assert!(pos.is_path_clear(Square::E1, sq("e2")));
        assert!(pos.is_path_clear(Square::E1, sq("d2")));
        assert!(pos.is_path_clear(Square::E1, Square::E1));
        assert!(!pos.is_path_clear(Square::B1, sq("c3")));
    }

    #[test]
    fn display_diagram() {
        let text = Position::startpos().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r ");
        assert!(text.ends_with("  a b c d e f g h"));
    }
}
