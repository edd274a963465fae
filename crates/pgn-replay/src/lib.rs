//! PGN Replay - plays PGN files through the chess engine.
//!
//! # Modules
//!
//! - [`config`] - `replay.toml` loading
//! - [`report`] - text and JSON replay reports

pub mod config;
pub mod report;

use chess_core::fen;
use chess_engine::{replay, replay_from, GameState, ParsedGame, Replay};

/// Replays `game`, starting games without a `FEN` tag from `default_fen`
/// when one is given.
pub fn replay_game(game: &ParsedGame, default_fen: Option<&str>) -> Replay {
    match default_fen {
        Some(start) if game.initial_fen().is_none() => {
            let side = fen::active_color(start).unwrap_or_default();
            let initial = GameState::new_game_with_side(Some(start), side);
            replay_from(initial, &game.moves)
        }
        _ => replay(game),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, PieceKind, Square};
    use chess_engine::parse_pgn;

    const ROOK_ENDING: &str = "4k3/8/8/8/8/8/8/4K2R b K - 0 1";

    #[test]
    fn test_default_fen_applies_without_tag() {
        let game = parse_pgn("1... Kd7 2. O-O *");
        let replay = replay_game(&game, Some(ROOK_ENDING));
        assert!(replay.is_complete());
        assert_eq!(replay.initial.side_to_move, Color::Black);
        assert_eq!(
            replay.final_state().position.piece_at(Square::F1).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn test_fen_tag_wins_over_default() {
        let game = parse_pgn("[FEN \"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\"]\n\n1. e4 *");
        let replay = replay_game(&game, Some(ROOK_ENDING));
        assert!(replay.is_complete());
        assert_eq!(replay.final_state().position.occupied().count(), 32);
    }

    #[test]
    fn test_no_default_uses_startpos() {
        let game = parse_pgn("1. Nf3 *");
        let replay = replay_game(&game, None);
        assert!(replay.is_complete());
        assert_eq!(replay.records.len(), 1);
    }
}
