//! Replay reports in text and JSON form.

use chess_engine::{ParsedGame, Replay};
use serde::Serialize;
use std::io::{self, Write};

/// One played half-move.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PlyReport {
    /// 1-based half-move number.
    pub ply: usize,
    pub san: String,
    pub uci: String,
    /// Piece placement after the move.
    pub fen: String,
}

/// The token replay stopped at.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorReport {
    pub ply: usize,
    pub token: String,
    pub message: String,
}

/// Everything known about one game after replay.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GameReport {
    /// 1-based position of the game in the input file.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub start_fen: String,
    pub plies: Vec<PlyReport>,
    pub error: Option<ErrorReport>,
}

impl GameReport {
    pub fn new(index: usize, game: &ParsedGame, replay: &Replay) -> Self {
        let plies = replay
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| PlyReport {
                ply: i + 1,
                san: record.san.clone(),
                uci: record.mv.to_uci(),
                fen: record.state.position.to_fen(),
            })
            .collect();

        let error = replay.error.as_ref().map(|err| ErrorReport {
            ply: err.ply,
            token: err.token.clone(),
            message: err.source.to_string(),
        });

        GameReport {
            index,
            event: game.tag("Event").map(str::to_string),
            white: game.tag("White").map(str::to_string),
            black: game.tag("Black").map(str::to_string),
            result: game.result.clone(),
            start_fen: replay.initial.position.to_fen(),
            plies,
            error,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a whole input file.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub games: &'a [GameReport],
    pub failed: usize,
}

impl<'a> FileReport<'a> {
    pub fn new(games: &'a [GameReport]) -> Self {
        let failed = games.iter().filter(|g| !g.is_complete()).count();
        FileReport { games, failed }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Writes one game as text: a header line, then one line per ply.
///
/// With `board`, the position diagram after each ply is printed too; the
/// diagrams come from `replay`, which must be the replay `report` was built
/// from.
pub fn write_text<W: Write>(
    out: &mut W,
    report: &GameReport,
    replay: &Replay,
    board: bool,
) -> io::Result<()> {
    let white = report.white.as_deref().unwrap_or("?");
    let black = report.black.as_deref().unwrap_or("?");
    writeln!(out, "Game {}: {} - {}", report.index, white, black)?;
    writeln!(out, "  start {}", report.start_fen)?;

    for (ply, record) in report.plies.iter().zip(&replay.records) {
        writeln!(out, "  {:>3}. {:<8} {}", ply.ply, ply.san, ply.fen)?;
        if board {
            for line in record.state.position.to_string().lines() {
                writeln!(out, "       {}", line)?;
            }
        }
    }

    match &report.error {
        Some(err) => writeln!(
            out,
            "  stopped at ply {} ({}): {}",
            err.ply, err.token, err.message
        )?,
        None => writeln!(out, "  result {}", report.result.as_deref().unwrap_or("*"))?,
    }
    Ok(())
}
