//! Aggregated snapshot of one tournament (league).

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventSummary, Player};

/// Every match of a tournament across the ended/upcoming/live listings.
///
/// Invariant: `completed_matches + live_matches + upcoming_matches ==
/// total_matches`. Any match that is neither finished nor live counts as
/// upcoming, including unrecognised status codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentData {
    pub tournament_id: String,
    pub tournament_name: String,
    pub matches: Vec<EventSummary>,
    /// Unique by id, in order of first appearance.
    pub players: Vec<Player>,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub live_matches: usize,
    pub upcoming_matches: usize,
    /// Earliest and latest start time; both `None` without timed matches.
    pub date_range: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
    pub has_odds_data: bool,
}

impl TournamentData {
    pub fn from_matches(
        tournament_id: impl Into<String>,
        tournament_name: impl Into<String>,
        matches: Vec<EventSummary>,
        has_odds_data: bool,
    ) -> Self {
        let total_matches = matches.len();
        let completed_matches = matches.iter().filter(|m| m.is_finished()).count();
        let live_matches = matches.iter().filter(|m| m.is_live()).count();

        let mut seen = HashSet::new();
        let mut players = Vec::new();
        for m in &matches {
            for player in [&m.home_player, &m.away_player] {
                if seen.insert(player.id.clone()) {
                    players.push(player.clone());
                }
            }
        }

        let times = matches.iter().filter_map(|m| m.time);
        let date_range = (times.clone().min(), times.max());

        Self {
            tournament_id: tournament_id.into(),
            tournament_name: tournament_name.into(),
            matches,
            players,
            total_matches,
            completed_matches,
            live_matches,
            upcoming_matches: total_matches - completed_matches - live_matches,
            date_range,
            has_odds_data,
        }
    }

    /// Share of finished matches; 0.0 with no matches.
    pub fn completion_rate(&self) -> f64 {
        if self.total_matches == 0 {
            return 0.0;
        }
        self.completed_matches as f64 / self.total_matches as f64
    }

    /// Sorted distinct participant names.
    pub fn unique_players(&self) -> Vec<String> {
        self.matches
            .iter()
            .flat_map(|m| [m.home_player.name.clone(), m.away_player.name.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
