//! Move representation.

use crate::{Piece, PieceKind, Square};
use std::fmt;

/// What kind of move this is, beyond moving a piece from one square to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Quiet move onto an empty square.
    Normal,
    /// Capture of the piece standing on the destination.
    Capture,
    /// Pawn advance of two ranks from its starting rank.
    DoublePawnPush,
    /// O-O.
    KingSideCastling,
    /// O-O-O.
    QueenSideCastling,
    /// Pawn reaching the far rank, with or without a capture.
    Promotion(PieceKind),
    /// Pawn capture of an adjacent pawn, landing behind it.
    EnPassantCapture,
}

impl MoveFlag {
    /// Returns the promotion kind if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self {
            MoveFlag::Promotion(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::KingSideCastling | MoveFlag::QueenSideCastling)
    }
}

/// A fully resolved chess move.
///
/// `captured` is set exactly when the flag is [`MoveFlag::Capture`],
/// [`MoveFlag::EnPassantCapture`], or a [`MoveFlag::Promotion`] that takes a
/// piece. The constructors are the only way to build a move, so that holds
/// for every value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    flag: MoveFlag,
}

impl Move {
    /// A move onto an empty square.
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            flag: MoveFlag::Normal,
        }
    }

    /// A capture of the piece on `to`.
    #[inline]
    pub const fn capture(from: Square, to: Square, piece: Piece, captured: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: Some(captured),
            flag: MoveFlag::Capture,
        }
    }

    /// A two-rank pawn advance.
    #[inline]
    pub const fn double_push(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            flag: MoveFlag::DoublePawnPush,
        }
    }

    /// A promotion, optionally capturing on the promotion square.
    #[inline]
    pub const fn promotion(
        from: Square,
        to: Square,
        piece: Piece,
        promote_to: PieceKind,
        captured: Option<Piece>,
    ) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            flag: MoveFlag::Promotion(promote_to),
        }
    }

    /// An en passant capture; `captured` stands beside `from`, not on `to`.
    #[inline]
    pub const fn en_passant(from: Square, to: Square, piece: Piece, captured: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: Some(captured),
            flag: MoveFlag::EnPassantCapture,
        }
    }

    /// A castling king move.
    #[inline]
    pub const fn castle(from: Square, to: Square, piece: Piece, king_side: bool) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            flag: if king_side {
                MoveFlag::KingSideCastling
            } else {
                MoveFlag::QueenSideCastling
            },
        }
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the moving piece.
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    /// Returns the captured piece, if any.
    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.flag.promotion_piece() {
            Some(kind) => format!(
                "{}{}{}",
                self.from,
                self.to,
                kind.san_char().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {:?}", self.to_uci(), self.flag)?;
        if let Some(captured) = self.captured {
            write!(f, " x{}", captured.to_fen_char())?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
