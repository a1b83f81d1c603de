//! Common helpers: score-string parsing, odds conversion and name normalisation.

use serde::Serialize;

/// Points in one game of a match, home side first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GamePoints {
    pub home: u32,
    pub away: u32,
}

/// A score string such as `"3-1 (11-9, 8-11, 11-7, 11-8)"` split into parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedScore {
    /// The sets-won prefix, e.g. `"3-1"`.
    pub match_score: String,
    pub games: Vec<GamePoints>,
}

/// Split `"H-A"` into its two integers.
pub fn parse_pair(score: &str) -> Option<(u32, u32)> {
    let (home, away) = score.trim().split_once('-')?;
    Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
}

/// Parse a match score with an optional per-game breakdown.
///
/// Returns `None` for an empty string or a malformed game entry.
///
/// ```rust
/// use tabletennis_api::core::parse_score;
///
/// let parsed = parse_score("3-1 (11-9, 8-11, 11-7, 11-8)").unwrap();
/// assert_eq!(parsed.match_score, "3-1");
/// assert_eq!(parsed.games.len(), 4);
/// assert_eq!(parsed.games[1].away, 11);
/// ```
pub fn parse_score(score: &str) -> Option<ParsedScore> {
    if score.trim().is_empty() {
        return None;
    }

    let (match_score, breakdown) = match score.split_once(" (") {
        Some((head, tail)) => (head.trim(), Some(tail.trim_end_matches(')'))),
        None => (score.trim(), None),
    };

    let mut games = Vec::new();
    if let Some(breakdown) = breakdown {
        for game in breakdown.split(',') {
            let (home, away) = parse_pair(game)?;
            games.push(GamePoints { home, away });
        }
    }

    Some(ParsedScore {
        match_score: match_score.to_string(),
        games,
    })
}

/// Convert American odds (`-150`, `+200`) to decimal odds.
///
/// `0` is not a valid American price and yields `None`.
pub fn american_to_decimal(odds: i32) -> Option<f64> {
    let odds = f64::from(odds);
    if odds > 0.0 {
        Some(1.0 + odds / 100.0)
    } else if odds < 0.0 {
        Some(1.0 + 100.0 / odds.abs())
    } else {
        None
    }
}

/// Implied probability, in percent, of decimal odds. `None` unless the odds
/// are finite and positive.
pub fn implied_probability(decimal_odds: f64) -> Option<f64> {
    (decimal_odds.is_finite() && decimal_odds > 0.0).then(|| 100.0 / decimal_odds)
}

/// Lowercase, trim and drop `.`/`,` so name variants compare equal.
pub fn normalize_player_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect()
}
