//! FEN (Forsyth-Edwards Notation) piece-placement codec.
//!
//! Only the first field of a FEN record is decoded here. Side to move is
//! tracked by the game layer; castling rights, en passant target and clocks
//! are not used by this engine and are ignored.

use crate::{Color, File, Piece, Rank, Square};
use thiserror::Error;

/// Errors that can occur when decoding a FEN piece placement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 8 ranks, got {0}")]
    RankCount(usize),

    #[error("invalid FEN: rank {rank} covers {width} files, expected 8")]
    RankWidth { rank: u8, width: u32 },

    #[error("invalid FEN: unrecognized character '{ch}' in rank {rank}")]
    UnrecognizedChar { ch: char, rank: u8 },

    #[error("invalid FEN: empty run '{run}' in rank {rank} is outside 1-8")]
    EmptyRun { run: char, rank: u8 },
}

/// The standard starting position.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A decoded piece placement: every occupied square with its piece.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Placement {
    pieces: Vec<(Square, Piece)>,
}

impl Placement {
    /// Decodes the piece-placement field of `fen`.
    ///
    /// Anything after the first whitespace is ignored, so both a bare
    /// placement and a full six-field record are accepted.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let field = fen.split_whitespace().next().unwrap_or("");
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut pieces = Vec::with_capacity(32);
        for (rank, text) in Rank::ALL.iter().rev().zip(ranks) {
            let rank_no = rank.index() + 1;
            let mut width = 0u32;
            for ch in text.chars() {
                if let Some(run) = ch.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::EmptyRun { run: ch, rank: rank_no });
                    }
                    width += run;
                } else if let Some(piece) = Piece::from_fen_char(ch) {
                    if let Some(file) = File::from_index(width as u8) {
                        pieces.push((Square::new(file, *rank), piece));
                    }
                    width += 1;
                } else {
                    return Err(FenError::UnrecognizedChar { ch, rank: rank_no });
                }
            }
            if width != 8 {
                return Err(FenError::RankWidth { rank: rank_no, width });
            }
        }

        Ok(Placement { pieces })
    }

    /// Occupied squares in decode order (rank 8 first, a-file first).
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Encodes pieces as a FEN placement field.
    ///
    /// When a square is listed twice, the later entry wins.
    pub fn encode<I>(pieces: I) -> String
    where
        I: IntoIterator<Item = (Square, Piece)>,
    {
        let mut board = [None::<Piece>; 64];
        for (sq, piece) in pieces {
            board[sq.index() as usize] = Some(piece);
        }

        let mut fen = String::with_capacity(64);
        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0u8;
            for file in File::ALL {
                match board[Square::new(file, *rank).index() as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push((b'0' + empty) as char);
            }
            if *rank != Rank::R1 {
                fen.push('/');
            }
        }
        fen
    }
}

/// Reads the active-color field (second field) of a full FEN record.
///
/// Returns `None` for a bare placement or an unrecognized field.
pub fn active_color(fen: &str) -> Option<Color> {
    let field = fen.split_whitespace().nth(1)?;
    let mut chars = field.chars();
    let color = Color::from_fen_char(chars.next()?)?;
    chars.next().is_none().then_some(color)
}
