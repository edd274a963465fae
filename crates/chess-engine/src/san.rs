//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! Origins are resolved against the current position with per-piece rules
//! rather than by matching generator output: pawn push and pawn capture are
//! told apart by the token's capture marker, and queens and kings are only
//! checked for destination occupancy.

use crate::apply::en_passant_victim;
use crate::movegen::KNIGHT_OFFSETS;
use crate::Position;
use chess_core::{Color, File, Move, MoveFlag, Piece, PieceKind, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The token does not have the shape of a SAN move.
    #[error("invalid SAN format: {0}")]
    InvalidMoveFormat(String),
    /// The destination text is not a square.
    #[error("invalid destination square in {0}")]
    InvalidDestination(String),
    /// More than one piece could make the move.
    #[error("ambiguous move {san}: {count} candidates")]
    AmbiguousMove { san: String, count: usize },
    /// No piece of the named kind can make the move.
    #[error("no legal candidate for {0}")]
    NoLegalCandidate(String),
    /// The resolved origin does not hold the expected piece.
    #[error("no {piece} on {square}")]
    PieceNotFoundAtOrigin { piece: Piece, square: Square },
}

/// Origin hint written between the piece letter and the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Hint {
    file: Option<File>,
    rank: Option<Rank>,
}

impl Hint {
    fn parse(s: &str) -> Option<Hint> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (None, _, _) => Some(Hint::default()),
            (Some(c), None, _) => match (File::from_char(c), Rank::from_char(c)) {
                (Some(file), _) => Some(Hint {
                    file: Some(file),
                    rank: None,
                }),
                (None, Some(rank)) => Some(Hint {
                    file: None,
                    rank: Some(rank),
                }),
                (None, None) => None,
            },
            (Some(f), Some(r), None) => Some(Hint {
                file: Some(File::from_char(f)?),
                rank: Some(Rank::from_char(r)?),
            }),
            _ => None,
        }
    }

    fn matches(self, sq: Square) -> bool {
        self.file.map_or(true, |f| sq.file() == f) && self.rank.map_or(true, |r| sq.rank() == r)
    }
}

/// Structural pieces of a non-castling token.
#[derive(Debug)]
struct Token {
    kind: PieceKind,
    hint: Hint,
    to: Square,
    capture: bool,
    promotion: Option<PieceKind>,
}

/// Resolves `san` to a move for `side` in `position`.
pub fn parse_san(san: &str, position: &Position, side: Color) -> Result<Move, SanError> {
    let original = san.trim();
    let body: String = original
        .trim_end_matches(&['!', '?'][..])
        .chars()
        .filter(|c| !matches!(c, '+' | '#' | 'x'))
        .collect();
    let capture = original.contains('x');

    if body.is_empty() {
        return Err(SanError::InvalidMoveFormat(original.to_string()));
    }

    match body.as_str() {
        "O-O" | "0-0" => return castle(original, position, side, true),
        "O-O-O" | "0-0-0" => return castle(original, position, side, false),
        _ => {}
    }

    let token = tokenize(original, &body, capture)?;
    let candidates = candidate_origins(position, side, &token);

    let from = match candidates.as_slice() {
        [from] => *from,
        [] => return Err(SanError::NoLegalCandidate(original.to_string())),
        _ => {
            return Err(SanError::AmbiguousMove {
                san: original.to_string(),
                count: candidates.len(),
            })
        }
    };

    build_move(position, side, from, &token)
}

fn tokenize(original: &str, body: &str, capture: bool) -> Result<Token, SanError> {
    let malformed = || SanError::InvalidMoveFormat(original.to_string());

    let mut rest = body;
    let mut promotion = None;
    if let Some(last) = rest.chars().last() {
        if let Some(kind) = PieceKind::from_san_char(last).filter(|k| k.is_promotion_target()) {
            if rest.len() > 2 {
                promotion = Some(kind);
                rest = rest[..rest.len() - 1].trim_end_matches('=');
            }
        }
    }

    let (kind, rest) = match rest.chars().next() {
        Some(c) if c.is_ascii_uppercase() => {
            let kind = PieceKind::from_san_char(c).ok_or_else(malformed)?;
            (kind, &rest[1..])
        }
        _ => (PieceKind::Pawn, rest),
    };

    if promotion.is_some() && kind != PieceKind::Pawn {
        return Err(malformed());
    }
    if !rest.is_ascii() || rest.len() < 2 {
        return Err(malformed());
    }

    let (prefix, dest) = rest.split_at(rest.len() - 2);
    let hint = match (kind, prefix.len()) {
        (PieceKind::Pawn, 0) => Hint::default(),
        (PieceKind::Pawn, 1) => Hint {
            file: Some(prefix.chars().next().and_then(File::from_char).ok_or_else(malformed)?),
            rank: None,
        },
        (PieceKind::Pawn, _) => return Err(malformed()),
        _ => Hint::parse(prefix).ok_or_else(malformed)?,
    };

    let to = Square::from_algebraic(dest)
        .ok_or_else(|| SanError::InvalidDestination(original.to_string()))?;

    Ok(Token {
        kind,
        hint,
        to,
        capture,
        promotion,
    })
}

/// Castling only needs the king on its home square.
fn castle(
    original: &str,
    position: &Position,
    side: Color,
    king_side: bool,
) -> Result<Move, SanError> {
    let rank = side.back_rank();
    let from = Square::new(File::E, rank);
    let to = Square::new(if king_side { File::G } else { File::C }, rank);
    let king = Piece::new(PieceKind::King, side);

    if position.piece_at(from) != Some(king) {
        return Err(SanError::NoLegalCandidate(original.to_string()));
    }
    Ok(Move::castle(from, to, king, king_side))
}

/// Every square holding a piece of the token's kind that may reach its
/// destination under the per-piece rules.
fn candidate_origins(position: &Position, side: Color, token: &Token) -> Vec<Square> {
    position
        .pieces(token.kind, side)
        .into_iter()
        .filter(|from| token.hint.matches(*from))
        .filter(|from| can_reach(position, side, token, *from))
        .collect()
}

fn can_reach(position: &Position, side: Color, token: &Token, from: Square) -> bool {
    let to = token.to;
    let (df, dr) = from.delta(to);

    match token.kind {
        PieceKind::Pawn => {
            if token.promotion.is_some() && to.rank() != side.promotion_rank() {
                return false;
            }
            pawn_can_reach(position, side, from, to, token.capture)
        }
        PieceKind::Knight => {
            KNIGHT_OFFSETS.contains(&(df, dr)) && occupancy_agrees(position, side, to, token.capture)
        }
        PieceKind::Bishop => {
            df != 0
                && df.abs() == dr.abs()
                && position.is_path_clear(from, to)
                && occupancy_agrees(position, side, to, token.capture)
        }
        PieceKind::Rook => {
            (df == 0) != (dr == 0)
                && position.is_path_clear(from, to)
                && occupancy_agrees(position, side, to, token.capture)
        }
        PieceKind::Queen | PieceKind::King => occupancy_agrees(position, side, to, token.capture),
    }
}

fn pawn_can_reach(position: &Position, side: Color, from: Square, to: Square, capture: bool) -> bool {
    let forward = side.forward();
    let (df, dr) = from.delta(to);

    if !capture {
        if df != 0 || !position.is_empty_at(to) {
            return false;
        }
        if dr == forward {
            return true;
        }
        return dr == 2 * forward
            && from.rank() == side.pawn_rank()
            && from.offset(0, forward).map_or(false, |mid| position.is_empty_at(mid));
    }

    if df.abs() != 1 || dr != forward {
        return false;
    }
    match position.piece_at(to) {
        Some(target) => target.color != side,
        None => position.piece_at(en_passant_victim(from, to)) == Some(enemy_pawn(side)),
    }
}

/// A capture must land on an enemy piece and a quiet move on an empty square.
fn occupancy_agrees(position: &Position, side: Color, to: Square, capture: bool) -> bool {
    match position.piece_at(to) {
        Some(target) => capture && target.color != side,
        None => !capture,
    }
}

fn enemy_pawn(side: Color) -> Piece {
    Piece::new(PieceKind::Pawn, side.opposite())
}

fn build_move(position: &Position, side: Color, from: Square, token: &Token) -> Result<Move, SanError> {
    let piece = Piece::new(token.kind, side);
    if position.piece_at(from) != Some(piece) {
        return Err(SanError::PieceNotFoundAtOrigin {
            piece,
            square: from,
        });
    }

    let to = token.to;
    let on_target = position.piece_at(to).filter(|p| p.color != side);

    if token.kind == PieceKind::Pawn {
        let (df, dr) = from.delta(to);

        if df != 0 && on_target.is_none() {
            let victim = position
                .piece_at(en_passant_victim(from, to))
                .filter(|p| *p == enemy_pawn(side));
            if let Some(victim) = victim {
                return Ok(Move::en_passant(from, to, piece, victim));
            }
        }
        if to.rank() == side.promotion_rank() {
            let promote_to = token.promotion.unwrap_or(PieceKind::Queen);
            return Ok(Move::promotion(from, to, piece, promote_to, on_target));
        }
        if on_target.is_none() && dr.abs() == 2 {
            return Ok(Move::double_push(from, to, piece));
        }
    }

    Ok(match on_target {
        Some(captured) => Move::capture(from, to, piece, captured),
        None => Move::quiet(from, to, piece),
    })
}

/// Formats `m` in SAN for the position before the move.
///
/// Check and mate suffixes are never added. A disambiguator is written only
/// when [`parse_san`] would otherwise find more than one origin.
pub fn move_to_san(position: &Position, m: &Move) -> String {
    match m.flag() {
        MoveFlag::KingSideCastling => return "O-O".to_string(),
        MoveFlag::QueenSideCastling => return "O-O-O".to_string(),
        _ => {}
    }

    let piece = m.piece();
    let from = m.from();
    let to = m.to();
    let mut san = String::new();

    if piece.kind == PieceKind::Pawn {
        if m.is_capture() {
            san.push(from.file().to_char());
            san.push('x');
        }
        san.push_str(&to.to_algebraic());
        if let Some(kind) = m.flag().promotion_piece() {
            san.push('=');
            san.push(kind.san_char());
        }
        return san;
    }

    san.push(piece.kind.san_char());

    let token = Token {
        kind: piece.kind,
        hint: Hint::default(),
        to,
        capture: m.is_capture(),
        promotion: None,
    };
    let rivals: Vec<Square> = candidate_origins(position, piece.color, &token)
        .into_iter()
        .filter(|sq| *sq != from)
        .collect();

    if !rivals.is_empty() {
        if rivals.iter().all(|sq| sq.file() != from.file()) {
            san.push(from.file().to_char());
        } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
            san.push(from.rank().to_char());
        } else {
            san.push_str(&from.to_algebraic());
        }
    }

    if m.is_capture() {
        san.push('x');
    }
    san.push_str(&to.to_algebraic());
    san
}
