//! Core types for chess.
//!
//! This crate provides the value types shared by the engine and its callers:
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Color`], [`PieceKind`] and [`Piece`] for piece identity
//! - [`Move`] and [`MoveFlag`] for fully resolved moves
//! - [`Placement`] for the FEN piece-placement field

mod color;
pub mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, Placement, STARTPOS};
pub use mov::{Move, MoveFlag};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square, SquareParseError};
