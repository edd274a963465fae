//! Game sequencing: a position plus the side to move, advanced one move at a
//! time, and replay of parsed PGN games.

use crate::apply::make_move;
use crate::pgn::ParsedGame;
use crate::san::{parse_san, SanError};
use crate::Position;
use chess_core::{Color, Move};
use std::fmt;
use thiserror::Error;

/// A position together with the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    pub position: Position,
    pub side_to_move: Color,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            position: Position::startpos(),
            side_to_move: Color::White,
        }
    }
}

impl GameState {
    /// Starts a game from `fen` or the standard position, white to move.
    ///
    /// Only the placement field is read; an unreadable FEN gives the
    /// standard position.
    pub fn new_game(fen: Option<&str>) -> Self {
        Self::new_game_with_side(fen, Color::White)
    }

    /// Starts a game from `fen` or the standard position with `side` to move.
    pub fn new_game_with_side(fen: Option<&str>, side: Color) -> Self {
        let position = fen.map_or_else(Position::startpos, Position::from_fen_or_startpos);
        GameState {
            position,
            side_to_move: side,
        }
    }

    /// Returns the state after `m`. The move is not checked.
    #[must_use]
    pub fn apply_move(&self, m: &Move) -> GameState {
        GameState {
            position: make_move(&self.position, m),
            side_to_move: self.side_to_move.opposite(),
        }
    }

    /// Resolves a SAN token for the side to move and plays it.
    pub fn play_san(&self, san: &str) -> Result<(Move, GameState), SanError> {
        let m = parse_san(san, &self.position, self.side_to_move)?;
        Ok((m, self.apply_move(&m)))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position)?;
        write!(f, "{} to move", self.side_to_move)
    }
}

/// A SAN token that could not be played during replay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ply {ply}: cannot play {token:?}")]
pub struct ReplayError {
    /// 1-based half-move number of the failing token.
    pub ply: usize,
    pub token: String,
    #[source]
    pub source: SanError,
}

/// One successfully played token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyRecord {
    pub san: String,
    pub mv: Move,
    /// State after the move.
    pub state: GameState,
}

/// Outcome of replaying a parsed game.
///
/// Replay stops at the first token that does not resolve; every state
/// reached before it is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub initial: GameState,
    pub records: Vec<PlyRecord>,
    pub error: Option<ReplayError>,
}

impl Replay {
    /// State after the last successfully played token.
    pub fn final_state(&self) -> GameState {
        self.records.last().map_or(self.initial, |r| r.state)
    }

    /// True when every token was played.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Every state from the start through the last played move.
    pub fn states(&self) -> impl Iterator<Item = GameState> + '_ {
        std::iter::once(self.initial).chain(self.records.iter().map(|r| r.state))
    }
}

/// Plays every token of `game` from its start position.
pub fn replay(game: &ParsedGame) -> Replay {
    let initial = GameState {
        position: game.start_position(),
        side_to_move: game.side_to_move(),
    };
    replay_from(initial, &game.moves)
}

/// Plays `tokens` in order from `initial`.
pub fn replay_from<S: AsRef<str>>(initial: GameState, tokens: &[S]) -> Replay {
    let mut records = Vec::with_capacity(tokens.len());
    let mut state = initial;

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        match state.play_san(token) {
            Ok((mv, next)) => {
                state = next;
                records.push(PlyRecord {
                    san: token.to_string(),
                    mv,
                    state,
                });
            }
            Err(source) => {
                tracing::debug!(ply = i + 1, token, %source, "replay halted");
                return Replay {
                    initial,
                    records,
                    error: Some(ReplayError {
                        ply: i + 1,
                        token: token.to_string(),
                        source,
                    }),
                };
            }
        }
    }

    Replay {
        initial,
        records,
        error: None,
    }
}
