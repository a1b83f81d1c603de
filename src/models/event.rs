//! Event (match) models for listing and detail endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{OddsSummary, Player};
use crate::core::util::parse_pair;

/// `time_status` as reported by the listing endpoints (ended/upcoming/inplay).
///
/// Listings use four codes; the detail view uses three (see [`DetailStatus`]).
/// The two are kept apart until it is confirmed whether "upcoming" and
/// "scheduled" really differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventStatus {
    Upcoming,
    Scheduled,
    Live,
    Finished,
    Other(String),
}

impl EventStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => EventStatus::Upcoming,
            "1" => EventStatus::Scheduled,
            "2" => EventStatus::Live,
            "3" => EventStatus::Finished,
            other => EventStatus::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            EventStatus::Upcoming => "0",
            EventStatus::Scheduled => "1",
            EventStatus::Live => "2",
            EventStatus::Finished => "3",
            EventStatus::Other(code) => code,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Scheduled => "Scheduled",
            EventStatus::Live => "Live",
            EventStatus::Finished => "Finished",
            EventStatus::Other(_) => "Unknown",
        }
    }
}

/// `time_status` as reported by the detail view (`event/view`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DetailStatus {
    Scheduled,
    Live,
    Finished,
    Other(String),
}

impl DetailStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => DetailStatus::Scheduled,
            "2" => DetailStatus::Live,
            "3" => DetailStatus::Finished,
            other => DetailStatus::Other(other.to_string()),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DetailStatus::Scheduled => "Scheduled",
            DetailStatus::Live => "Live",
            DetailStatus::Finished => "Finished",
            DetailStatus::Other(_) => "Unknown",
        }
    }
}

/// Points in a single game (keyed by game number on the event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameScore {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Home,
    Away,
}

/// One point in the detail-view timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: String,
    pub game: String,
    pub side: Side,
    /// Running score in the game, `"home-away"`.
    pub score: String,
}

impl TimelineEntry {
    pub fn home_score(&self) -> Option<u32> {
        parse_pair(&self.score).map(|(home, _)| home)
    }

    pub fn away_score(&self) -> Option<u32> {
        parse_pair(&self.score).map(|(_, away)| away)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stadium {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub capacity: Option<u32>,
    pub coordinates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventExtra {
    pub best_of_sets: Option<String>,
    pub stadium: Option<Stadium>,
}

/// Optional data attached by the bulk resolver after an event is found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventEnrichment {
    pub detail: Option<Event>,
    pub odds: Option<OddsSummary>,
}

impl EventEnrichment {
    pub fn is_empty(&self) -> bool {
        self.detail.is_none() && self.odds.is_none()
    }
}

/// An event as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub sport_id: String,
    /// Start time; `None` when the API sent an unparseable timestamp.
    pub time: Option<DateTime<Utc>>,
    pub time_status: EventStatus,
    pub league_id: String,
    pub league_name: String,
    pub league_country_code: Option<String>,
    pub home_player: Player,
    pub away_player: Player,
    /// Sets won, `"H-A"`. Empty before the match starts.
    pub current_score: String,
    pub game_scores: BTreeMap<u32, GameScore>,
    pub bet365_id: Option<String>,
    pub enrichment: EventEnrichment,
}

impl EventSummary {
    pub fn is_scheduled(&self) -> bool {
        matches!(
            self.time_status,
            EventStatus::Upcoming | EventStatus::Scheduled
        )
    }

    pub fn is_live(&self) -> bool {
        self.time_status == EventStatus::Live
    }

    pub fn is_finished(&self) -> bool {
        self.time_status == EventStatus::Finished
    }

    pub fn status_description(&self) -> &'static str {
        self.time_status.description()
    }

    /// Sets won as `(home, away)`, or `None` if the score is missing or malformed.
    pub fn sets_score(&self) -> Option<(u32, u32)> {
        parse_pair(&self.current_score)
    }

    /// Whether `player_name` won this match.
    ///
    /// Only finished matches with a strict sets lead have a winner; names are
    /// compared exactly, with no normalisation.
    pub fn is_winner(&self, player_name: &str) -> bool {
        if !self.is_finished() {
            return false;
        }
        match self.sets_score() {
            Some((home, away)) if home > away => self.home_player.name == player_name,
            Some((home, away)) if away > home => self.away_player.name == player_name,
            _ => false,
        }
    }

    pub fn involves(&self, player_name: &str) -> bool {
        self.home_player.name == player_name || self.away_player.name == player_name
    }

    /// The counter-party of `player_name`. Falls back to the home side when
    /// `player_name` is not the home player.
    pub fn opponent_of(&self, player_name: &str) -> &Player {
        if self.home_player.name == player_name {
            &self.away_player
        } else {
            &self.home_player
        }
    }
}

/// An event as returned by the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: String,
    pub sport_id: String,
    pub time: Option<DateTime<Utc>>,
    pub time_status: DetailStatus,
    pub league_id: String,
    pub league_name: String,
    pub league_country_code: Option<String>,
    pub home_player: Player,
    pub away_player: Player,
    pub final_score: String,
    pub game_scores: BTreeMap<u32, GameScore>,
    pub timeline: Vec<TimelineEntry>,
    pub extra: Option<EventExtra>,
    pub inplay_created_at: Option<String>,
    pub inplay_updated_at: Option<String>,
    pub confirmed_at: Option<String>,
    pub bet365_id: Option<String>,
}

impl Event {
    pub fn is_scheduled(&self) -> bool {
        self.time_status == DetailStatus::Scheduled
    }

    pub fn is_live(&self) -> bool {
        self.time_status == DetailStatus::Live
    }

    pub fn is_finished(&self) -> bool {
        self.time_status == DetailStatus::Finished
    }

    pub fn status_description(&self) -> &'static str {
        self.time_status.description()
    }

    pub fn home_sets_won(&self) -> Option<u32> {
        parse_pair(&self.final_score).map(|(home, _)| home)
    }

    pub fn away_sets_won(&self) -> Option<u32> {
        parse_pair(&self.final_score).map(|(_, away)| away)
    }

    /// Winning side of a finished match; `None` on a level or malformed score.
    pub fn winner(&self) -> Option<&Player> {
        if !self.is_finished() {
            return None;
        }
        let (home, away) = parse_pair(&self.final_score)?;
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Some(&self.home_player),
            std::cmp::Ordering::Less => Some(&self.away_player),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn total_points_played(&self) -> usize {
        self.timeline.len()
    }
}
