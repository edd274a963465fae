//! PGN (Portable Game Notation) reading and writing.
//!
//! Parsing is lenient: malformed tag lines are skipped, and comments,
//! variations, move numbers, NAGs and check marks are dropped from the
//! movetext. The SAN tokens themselves are not checked here; see
//! [`crate::replay`] for that.

use crate::Position;
use chess_core::{fen, Color};

/// Game termination markers recognised at the end of the movetext.
pub const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A game read from PGN text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGame {
    /// Tag pairs in file order.
    pub tags: Vec<(String, String)>,
    /// SAN tokens, stripped of numbers and decorations.
    pub moves: Vec<String>,
    /// Trailing result marker, if any.
    pub result: Option<String>,
}

impl ParsedGame {
    /// Returns the value of the first tag named `key`.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `FEN` tag, if the game does not start from the standard position.
    pub fn initial_fen(&self) -> Option<&str> {
        self.tag("FEN")
    }

    /// Starting placement: the `FEN` tag when present and valid, otherwise
    /// the standard start.
    pub fn start_position(&self) -> Position {
        match self.initial_fen() {
            Some(fen) => Position::from_fen_or_startpos(fen),
            None => Position::startpos(),
        }
    }

    /// Side to make the first move, read from the `FEN` tag. Defaults to white.
    pub fn side_to_move(&self) -> Color {
        self.initial_fen()
            .and_then(fen::active_color)
            .unwrap_or_default()
    }

    /// Serializes the game back to PGN text.
    ///
    /// Tags come first, one per line, followed by a blank line and the
    /// numbered movetext wrapped at 80 columns.
    pub fn to_pgn(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.tags {
            out.push_str(&format!("[{} \"{}\"]\n", key, escape(value)));
        }
        if !self.tags.is_empty() {
            out.push('\n');
        }

        let mut words = Vec::with_capacity(self.moves.len() * 3 / 2 + 1);
        let mut number = self.initial_fen().and_then(fullmove_number).unwrap_or(1);
        let mut color = self.side_to_move();
        for (i, token) in self.moves.iter().enumerate() {
            match color {
                Color::White => words.push(format!("{}.", number)),
                Color::Black if i == 0 => words.push(format!("{}...", number)),
                Color::Black => {}
            }
            words.push(token.clone());
            if color == Color::Black {
                number += 1;
            }
            color = color.opposite();
        }
        if let Some(result) = &self.result {
            words.push(result.clone());
        }

        let mut line_len = 0;
        for word in words {
            if line_len > 0 && line_len + 1 + word.len() > 80 {
                out.push('\n');
                line_len = 0;
            } else if line_len > 0 {
                out.push(' ');
                line_len += 1;
            }
            line_len += word.len();
            out.push_str(&word);
        }
        out.push('\n');
        out
    }
}

/// Parses a single game.
pub fn parse_pgn(text: &str) -> ParsedGame {
    let mut game = ParsedGame::default();
    let mut lines = text.lines();
    let mut movetext = String::new();

    for line in lines.by_ref() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('[') {
            match parse_tag(trimmed) {
                Some(tag) => game.tags.push(tag),
                None => tracing::debug!(line = trimmed, "skipping malformed PGN tag"),
            }
            continue;
        }
        movetext.push_str(line);
        movetext.push('\n');
        break;
    }
    for line in lines {
        movetext.push_str(line);
        movetext.push('\n');
    }

    game.moves = strip_annotations(&movetext)
        .split_whitespace()
        .filter_map(clean_token)
        .map(str::to_string)
        .collect();

    if game
        .moves
        .last()
        .is_some_and(|last| RESULTS.contains(&last.as_str()))
    {
        game.result = game.moves.pop();
    }
    game
}

/// Splits a multi-game PGN file into the text of each game.
///
/// A game ends where a tag line follows movetext, or after a movetext line
/// whose last token is a result marker.
pub fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut in_moves = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && in_moves {
            games.push(std::mem::take(&mut current));
            in_moves = false;
        } else if !trimmed.is_empty() && !trimmed.starts_with('[') {
            in_moves = true;
        }
        current.push_str(line);
        current.push('\n');

        let ends_game = in_moves
            && trimmed
                .split_whitespace()
                .last()
                .is_some_and(|last| RESULTS.contains(&last));
        if ends_game {
            games.push(std::mem::take(&mut current));
            in_moves = false;
        }
    }
    if !current.trim().is_empty() {
        games.push(current);
    }
    games
}

/// Parses every game in a multi-game PGN file.
pub fn parse_games(text: &str) -> Vec<ParsedGame> {
    split_games(text).iter().map(|g| parse_pgn(g)).collect()
}

/// `[Key "Value"]` → `(Key, Value)`.
fn parse_tag(line: &str) -> Option<(String, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    let (key, rest) = inner.split_once(char::is_whitespace)?;
    let value = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), unescape(value)))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

/// Removes `{}` comments, `;` line comments and nested `()` variations.
fn strip_annotations(movetext: &str) -> String {
    let mut out = String::with_capacity(movetext.len());
    let mut chars = movetext.chars();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                chars.by_ref().find(|&c| c == '}');
                out.push(' ');
            }
            ';' => {
                chars.by_ref().find(|&c| c == '\n');
                out.push(' ');
            }
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(' ');
            }
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Strips move numbers, NAGs and check marks; `None` when nothing is left.
fn clean_token(token: &str) -> Option<&str> {
    if token.starts_with('$') {
        return None;
    }

    let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let token = if digits > 0 && token[digits..].starts_with('.') {
        token[digits..].trim_start_matches('.')
    } else {
        token
    };

    let token = token.trim_end_matches(&['+', '#'][..]);
    (!token.is_empty()).then_some(token)
}

/// Sixth FEN field.
fn fullmove_number(fen: &str) -> Option<u32> {
    fen.split_whitespace().nth(5)?.parse().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Piece, PieceKind, Square};

    const MORPHY: &str = "[Event \"Paris\"]\n\
        [White \"Paul Morphy\"]\n\
        [Black \"Duke Karl / Count Isouard\"]\n\
        [Result \"1-0\"]\n\
        \n\
        1. e4 e5 2. Nf3 d6 3. d4 Bg4 4. dxe5 Bxf3 5. Qxf3 dxe5 6. Bc4 Nf6 7. Qb3 Qe7\n\
        8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5 11. Bxb5+ Nbd7 12. O-O-O Rd8 13. Rxd7 Rxd7\n\
        14. Rd1 Qe6 15. Bxd7+ Nxd7 16. Qb8+ Nxb8 17. Rd8# 1-0\n";

    #[test]
    fn parses_tags_and_moves() {
        let game = parse_pgn(MORPHY);
        assert_eq!(game.tags.len(), 4);
        assert_eq!(game.tag("White"), Some("Paul Morphy"));
        assert_eq!(game.tag("Missing"), None);
        assert_eq!(game.moves.len(), 33);
        assert_eq!(game.moves[0], "e4");
        assert_eq!(game.moves[20], "Bxb5");
        assert_eq!(game.moves.last().map(String::as_str), Some("Rd8"));
        assert_eq!(game.result.as_deref(), Some("1-0"));
    }

    #[test]
    fn movetext_without_tags() {
        let game = parse_pgn("1. d4 d5 2. c4 *");
        assert!(game.tags.is_empty());
        assert_eq!(game.moves, vec!["d4", "d5", "c4"]);
        assert_eq!(game.result.as_deref(), Some("*"));
    }

    #[test]
    fn strips_comments_variations_and_nags() {
        let text = "1. e4 {best by test} e5 (1... c5 2. Nf3 (2. c3) d6) 2. Nf3 $1 ; a comment\n\
                    2... Nc6 3.Bb5 a6!? 1/2-1/2";
        let game = parse_pgn(text);
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6!?"]);
        assert_eq!(game.result.as_deref(), Some("1/2-1/2"));
    }

    #[test]
    fn castling_tokens_survive_number_stripping() {
        let game = parse_pgn("1. e4 e5 2. 0-0 0-0-0");
        assert_eq!(game.moves, vec!["e4", "e5", "0-0", "0-0-0"]);
        assert_eq!(game.result, None);
    }

    #[test]
    fn malformed_tags_are_skipped() {
        let text = "[Event \"Test\"]\n[Broken\n[NoQuotes value]\n[Site \"Here\"]\n\n1. e4";
        let game = parse_pgn(text);
        assert_eq!(
            game.tags,
            vec![
                ("Event".to_string(), "Test".to_string()),
                ("Site".to_string(), "Here".to_string())
            ]
        );
        assert_eq!(game.moves, vec!["e4"]);
    }

    #[test]
    fn escaped_tag_values() {
        let game = parse_pgn("[Annotator \"The \\\"Doctor\\\"\"]\n\n1. e4");
        assert_eq!(game.tag("Annotator"), Some("The \"Doctor\""));
        assert!(game.to_pgn().contains("[Annotator \"The \\\"Doctor\\\"\"]"));
    }

    #[test]
    fn fen_tag_sets_start() {
        let text = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/8/4K2R b K - 0 12\"]\n\n12... Kd7 13. O-O *";
        let game = parse_pgn(text);
        assert_eq!(game.side_to_move(), Color::Black);
        let start = game.start_position();
        assert_eq!(
            start.piece_at(Square::H1),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(start.occupied().count(), 3);
        assert_eq!(game.moves, vec!["Kd7", "O-O"]);
    }

    #[test]
    fn bad_fen_tag_falls_back() {
        let game = parse_pgn("[FEN \"not/a/fen\"]\n\n1. e4");
        assert_eq!(game.start_position(), Position::startpos());
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn to_pgn_round_trip() {
        let game = parse_pgn(MORPHY);
        let text = game.to_pgn();
        assert!(text.starts_with("[Event \"Paris\"]\n"));
        assert!(text.contains("\n\n1. e4 e5 2. Nf3 d6"));
        assert!(text.lines().all(|l| l.len() <= 80));
        assert_eq!(parse_pgn(&text), game);
    }

    #[test]
    fn to_pgn_numbers_from_fen() {
        let game = parse_pgn("[FEN \"4k3/8/8/8/8/8/8/4K2R b K - 0 12\"]\n\n12... Kd7 13. O-O *");
        assert!(game.to_pgn().ends_with("12... Kd7 13. O-O *\n"));
    }

    #[test]
    fn splits_multiple_games() {
        let text = format!("{MORPHY}\n[Event \"Second\"]\n\n1. d4 d5 *\n\n1. c4 *\n");
        let games = split_games(&text);
        assert_eq!(games.len(), 3);

        let parsed = parse_games(&text);
        assert_eq!(parsed[0].result.as_deref(), Some("1-0"));
        assert_eq!(parsed[1].tag("Event"), Some("Second"));
        assert_eq!(parsed[1].moves, vec!["d4", "d5"]);
        assert_eq!(parsed[1].result.as_deref(), Some("*"));
        assert!(parsed[2].tags.is_empty());
        assert_eq!(parsed[2].moves, vec!["c4"]);
    }

    #[test]
    fn result_ends_headerless_games() {
        let games = parse_games("1. e4 e5 1-0
1. d4 0-1

1. c4
2. Nf3 1/2-1/2
");
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].moves, vec!["e4", "e5"]);
        assert_eq!(games[1].result.as_deref(), Some("0-1"));
        assert_eq!(games[2].moves, vec!["c4", "Nf3"]);
        assert!(games.iter().all(|g| !g.moves.iter().any(|m| RESULTS.contains(&m.as_str()))));
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_pgn(""), ParsedGame::default());
        assert!(split_games("\n\n").is_empty());
    }
}
