//! Domain models mapped from B365 API responses.
//!
//! Listing and detail payloads are deserialized into wire types in
//! [`crate::b365::types`] and converted into these types, which are what the
//! rest of the crate works with.

pub mod event;
pub mod history;
pub mod league;
pub mod pagination;
pub mod player;
pub mod tournament;

use std::collections::BTreeMap;

pub use event::{
    DetailStatus, Event, EventEnrichment, EventExtra, EventStatus, EventSummary, GameScore, Side,
    Stadium, TimelineEntry,
};
pub use history::PlayerMatchHistory;
pub use league::League;
pub use pagination::{Page, PaginationInfo};
pub use player::Player;
pub use tournament::TournamentData;

/// Odds summary keyed by bookmaker name.
pub type OddsSummary = BTreeMap<String, serde_json::Value>;

/// Detailed odds keyed by market id.
pub type OddsDetail = BTreeMap<String, serde_json::Value>;

/// Previous meetings and recent form around one event (`event/history`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct EventHistory {
    pub h2h: Vec<EventSummary>,
    pub home: Vec<EventSummary>,
    pub away: Vec<EventSummary>,
}
