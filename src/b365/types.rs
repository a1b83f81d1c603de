//! Wire shapes of B365 responses and their mapping onto [`crate::models`].
//!
//! The API is loose with scalar types: ids arrive as strings or numbers,
//! flags as `0`/`1`, and a missing image as `0`. The deserializers below
//! absorb that so the domain types can stay strict.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{
    DetailStatus, Event, EventEnrichment, EventExtra, EventHistory, EventStatus, EventSummary,
    GameScore, League, PaginationInfo, Player, Side, Stadium, TimelineEntry,
};


#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => u8::from(b).to_string(),
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Scalar::Str(s) => !matches!(s.trim(), "" | "0" | "false"),
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Bool(b) => *b,
        }
    }
}

fn de_flex_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .unwrap_or_default())
}

fn de_opt_flex_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .filter(|s| !s.is_empty()))
}

/// `0`, `"0"`, `""` and `null` all mean "no image".
fn de_image_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .filter(Scalar::is_truthy)
        .map(Scalar::into_string))
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(|s| s.is_truthy())
        .unwrap_or(false))
}

fn de_flex_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => u64::try_from(n).map_err(D::Error::custom),
        Scalar::Str(s) => s.trim().parse().map_err(D::Error::custom),
        Scalar::Float(f) if f >= 0.0 => Ok(f as u64),
        other => Err(D::Error::custom(format!(
            "expected a non-negative integer, got {:?}",
            other.into_string()
        ))),
    }
}

fn de_flex_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = de_flex_u64(deserializer)?;
    u32::try_from(n).map_err(D::Error::custom)
}

/// Per-game scores come as an object keyed by game number, or as `[]` when
/// the match has not started.
fn de_scores<'de, D>(deserializer: D) -> Result<BTreeMap<String, WireGameScore>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scores {
        Map(BTreeMap<String, WireGameScore>),
        List(Vec<Value>),
    }

    Ok(match Option::<Scores>::deserialize(deserializer)? {
        Some(Scores::Map(map)) => map,
        _ => BTreeMap::new(),
    })
}

/// The standard response envelope. `success` is checked before this is
/// deserialized.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub pager: Option<WirePager>,
    #[serde(default)]
    pub results: T,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WirePager {
    #[serde(deserialize_with = "de_flex_u32")]
    pub page: u32,
    #[serde(deserialize_with = "de_flex_u32")]
    pub per_page: u32,
    #[serde(deserialize_with = "de_flex_u64")]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePlayer {
    #[serde(deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub name: String,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default, deserialize_with = "de_image_id")]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireLeague {
    #[serde(deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub name: String,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub has_leaguetable: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub has_toplist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireGameScore {
    #[serde(deserialize_with = "de_flex_string")]
    pub home: String,
    #[serde(deserialize_with = "de_flex_string")]
    pub away: String,
}

/// An event from `events/ended`, `events/upcoming`, `events/inplay`,
/// `events/search` and `event/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireEventSummary {
    #[serde(deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub sport_id: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub time: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub time_status: String,
    pub league: WireLeague,
    pub home: WirePlayer,
    pub away: WirePlayer,
    /// Original participants; preferred over `home` when present.
    #[serde(default)]
    pub o_home: Option<WirePlayer>,
    #[serde(default)]
    pub o_away: Option<WirePlayer>,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub ss: String,
    #[serde(default, deserialize_with = "de_scores")]
    pub scores: BTreeMap<String, WireGameScore>,
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    pub bet365_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTimelineEntry {
    #[serde(deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(deserialize_with = "de_flex_string")]
    pub gm: String,
    #[serde(deserialize_with = "de_flex_string")]
    pub te: String,
    #[serde(deserialize_with = "de_flex_string")]
    pub ss: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireStadium {
    #[serde(deserialize_with = "de_flex_string")]
    pub id: String,
    #[serde(default, deserialize_with = "de_flex_string")]
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    pub capacity: Option<String>,
    #[serde(default)]
    pub googlecoords: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEventExtra {
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    pub bestofsets: Option<String>,
    #[serde(default)]
    pub stadium_data: Option<WireStadium>,
}

/// An event from `event/view`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    #[serde(flatten)]
    pub summary: WireEventSummary,
    #[serde(default)]
    pub timeline: Vec<WireTimelineEntry>,
    #[serde(default)]
    pub extra: Option<WireEventExtra>,
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    pub inplay_created_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    pub inplay_updated_at: Option<String>,
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    pub confirmed_at: Option<String>,
}

/// `results` of `event/history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireEventHistory {
    #[serde(default)]
    pub h2h: Vec<WireEventSummary>,
    #[serde(default)]
    pub home: Vec<WireEventSummary>,
    #[serde(default)]
    pub away: Vec<WireEventSummary>,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Unix seconds, as sent in `time`, to a UTC timestamp.
pub fn parse_unix_time(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

fn map_game_scores(scores: BTreeMap<String, WireGameScore>) -> BTreeMap<u32, GameScore> {
    scores
        .into_iter()
        .filter_map(|(game, score)| {
            Some((
                game.trim().parse().ok()?,
                GameScore {
                    home: score.home.trim().parse().ok()?,
                    away: score.away.trim().parse().ok()?,
                },
            ))
        })
        .collect()
}

impl From<WirePager> for PaginationInfo {
    fn from(p: WirePager) -> Self {
        PaginationInfo {
            page: p.page,
            per_page: p.per_page,
            total: p.total,
        }
    }
}

impl From<WirePlayer> for Player {
    fn from(p: WirePlayer) -> Self {
        Player {
            id: p.id,
            name: p.name,
            country_code: p.cc,
            image_id: p.image_id,
        }
    }
}

impl From<WireLeague> for League {
    fn from(l: WireLeague) -> Self {
        League {
            id: l.id,
            name: l.name,
            country_code: l.cc,
            has_leaguetable: l.has_leaguetable,
            has_toplist: l.has_toplist,
        }
    }
}

impl From<WireEventSummary> for EventSummary {
    fn from(e: WireEventSummary) -> Self {
        EventSummary {
            time: parse_unix_time(&e.time),
            time_status: EventStatus::from_code(&e.time_status),
            league_id: e.league.id,
            league_name: e.league.name,
            league_country_code: e.league.cc,
            home_player: e.o_home.unwrap_or(e.home).into(),
            away_player: e.o_away.unwrap_or(e.away).into(),
            current_score: e.ss,
            game_scores: map_game_scores(e.scores),
            bet365_id: e.bet365_id,
            id: e.id,
            sport_id: e.sport_id,
            enrichment: EventEnrichment::default(),
        }
    }
}

impl From<WireTimelineEntry> for TimelineEntry {
    fn from(t: WireTimelineEntry) -> Self {
        TimelineEntry {
            id: t.id,
            game: t.gm,
            side: if t.te.trim() == "0" {
                Side::Home
            } else {
                Side::Away
            },
            score: t.ss,
        }
    }
}

impl From<WireStadium> for Stadium {
    fn from(s: WireStadium) -> Self {
        Stadium {
            id: s.id,
            name: s.name,
            city: s.city,
            country: s.country,
            capacity: s.capacity.and_then(|c| c.trim().parse().ok()),
            coordinates: s.googlecoords,
        }
    }
}

impl From<WireEventExtra> for EventExtra {
    fn from(x: WireEventExtra) -> Self {
        EventExtra {
            best_of_sets: x.bestofsets,
            stadium: x.stadium_data.map(Stadium::from),
        }
    }
}

impl From<WireEvent> for Event {
    fn from(e: WireEvent) -> Self {
        // The detail view always reports the listed participants, never o_home/o_away.
        let s = e.summary;
        Event {
            time: parse_unix_time(&s.time),
            time_status: DetailStatus::from_code(&s.time_status),
            league_id: s.league.id,
            league_name: s.league.name,
            league_country_code: s.league.cc,
            home_player: s.home.into(),
            away_player: s.away.into(),
            final_score: s.ss,
            game_scores: map_game_scores(s.scores),
            timeline: e.timeline.into_iter().map(TimelineEntry::from).collect(),
            extra: e.extra.map(EventExtra::from),
            inplay_created_at: e.inplay_created_at,
            inplay_updated_at: e.inplay_updated_at,
            confirmed_at: e.confirmed_at,
            bet365_id: s.bet365_id,
            id: s.id,
            sport_id: s.sport_id,
        }
    }
}

impl From<WireEventHistory> for EventHistory {
    fn from(h: WireEventHistory) -> Self {
        let map = |events: Vec<WireEventSummary>| {
            events
                .into_iter()
                .map(EventSummary::from)
                .collect::<Vec<_>>()
        };
        EventHistory {
            h2h: map(h.h2h),
            home: map(h.home),
            away: map(h.away),
        }
    }
}
