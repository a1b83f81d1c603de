//! Aggregated match history for one player.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::EventSummary;

/// Number of matches reported by [`PlayerMatchHistory::recent_form`].
pub const RECENT_FORM_LEN: usize = 10;

/// A player's recent matches with derived statistics.
///
/// Invariants: `total_matches == matches.len()` and
/// `win_count + loss_count == total_matches`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatchHistory {
    pub player_name: String,
    pub matches: Vec<EventSummary>,
    /// Opponent name -> matches against that opponent.
    pub h2h_records: BTreeMap<String, Vec<EventSummary>>,
    pub total_matches: usize,
    pub win_count: usize,
    pub loss_count: usize,
    /// The requested look-back window, not the observed span.
    pub date_range_days: u32,
    pub tournaments: BTreeSet<String>,
    pub opponents: BTreeSet<String>,
}

impl PlayerMatchHistory {
    pub fn from_matches(
        player_name: impl Into<String>,
        matches: Vec<EventSummary>,
        h2h_records: BTreeMap<String, Vec<EventSummary>>,
        date_range_days: u32,
    ) -> Self {
        let player_name = player_name.into();

        let win_count = matches
            .iter()
            .filter(|m| m.is_winner(&player_name))
            .count();
        let total_matches = matches.len();

        let tournaments = matches
            .iter()
            .filter(|m| !m.league_name.is_empty())
            .map(|m| m.league_name.clone())
            .collect();
        let opponents = matches
            .iter()
            .map(|m| m.opponent_of(&player_name).name.clone())
            .collect();

        Self {
            player_name,
            matches,
            h2h_records,
            total_matches,
            win_count,
            loss_count: total_matches - win_count,
            date_range_days,
            tournaments,
            opponents,
        }
    }

    /// Share of matches won; 0.0 with no matches.
    pub fn win_rate(&self) -> f64 {
        if self.total_matches == 0 {
            return 0.0;
        }
        self.win_count as f64 / self.total_matches as f64
    }

    /// Win/loss of the last ten matches, oldest first.
    ///
    /// Matches without a parseable start time sort before all others.
    pub fn recent_form(&self) -> Vec<bool> {
        let mut sorted: Vec<&EventSummary> = self.matches.iter().collect();
        sorted.sort_by_key(|m| m.time);

        let skip = sorted.len().saturating_sub(RECENT_FORM_LEN);
        sorted
            .into_iter()
            .skip(skip)
            .map(|m| m.is_winner(&self.player_name))
            .collect()
    }
}
