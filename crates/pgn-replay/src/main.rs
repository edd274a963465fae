//! PGN Replay - replays every game of a PGN file and reports each position.

use anyhow::Context;
use chess_engine::parse_games;
use clap::Parser;
use pgn_replay::config::ReplayConfig;
use pgn_replay::report::{write_text, FileReport, GameReport};
use pgn_replay::replay_game;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// PGN Replay - plays PGN games move by move.
#[derive(Parser)]
#[command(name = "pgn-replay")]
#[command(about = "Replays PGN games and prints the position after every move")]
struct Args {
    /// PGN file to read, or "-" for stdin
    input: PathBuf,

    /// Configuration file (defaults to replay.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Print a board diagram after every move
    #[arg(long)]
    board: bool,

    /// Start position for games without a FEN tag
    #[arg(long)]
    fen: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = ReplayConfig::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(io::stderr)
        .init();

    let text = read_input(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let json = args.json || config.output.json;
    let board = args.board || config.output.board;
    let default_fen = args.fen.as_deref().or(config.start_fen.as_deref());

    let games = parse_games(&text);
    tracing::info!("Replaying {} game(s) from {}", games.len(), args.input.display());

    let mut stdout = io::stdout().lock();
    let mut reports = Vec::with_capacity(games.len());
    for (i, game) in games.iter().enumerate() {
        let replay = replay_game(game, default_fen);
        if let Some(err) = &replay.error {
            tracing::warn!("Game {} stopped: {}: {}", i + 1, err, err.source);
        }
        let report = GameReport::new(i + 1, game, &replay);
        if !json {
            write_text(&mut stdout, &report, &replay, board)?;
        }
        reports.push(report);
    }

    let summary = FileReport::new(&reports);
    if json {
        writeln!(stdout, "{}", summary.to_json(config.output.pretty)?)?;
    }

    if summary.failed > 0 {
        tracing::info!("{} of {} game(s) did not replay", summary.failed, reports.len());
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}
