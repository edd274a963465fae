//! Chess position and notation engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - piece placement as twelve bitboards
//! - Pseudo-legal move generation ([`generate_moves`], [`moves_from`])
//! - Move application ([`apply_move`], [`make_move`])
//! - SAN parsing and generation ([`parse_san`], [`move_to_san`])
//! - PGN parsing and serialization ([`parse_pgn`], [`ParsedGame::to_pgn`])
//! - Game sequencing and replay ([`GameState`], [`replay`])
//!
//! Moves are pseudo-legal throughout: nothing checks whether the mover's own
//! king is left in check.
//!
//! # Example
//!
//! ```
//! use chess_engine::{parse_pgn, replay, GameState};
//!
//! let game = parse_pgn("1. e4 e5 2. Nf3 Nc6 *");
//! let replay = replay(&game);
//! assert!(replay.is_complete());
//! println!("{}", replay.final_state());
//!
//! let (_, next) = GameState::new_game(None).play_san("d4").unwrap();
//! assert_eq!(next.position.to_fen(), "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR");
//! ```

mod apply;
mod bitboard;
mod game;
pub mod movegen;
pub mod pgn;
mod position;
pub mod san;

pub use apply::{apply_move, castling_rook, en_passant_victim, make_move};
pub use bitboard::Bitboard;
pub use game::{replay, replay_from, GameState, PlyRecord, Replay, ReplayError};
pub use movegen::{generate_moves, generate_moves_with, moves_from, MoveList, Promotions};
pub use pgn::{parse_games, parse_pgn, split_games, ParsedGame};
pub use position::Position;
pub use san::{move_to_san, parse_san, SanError};
