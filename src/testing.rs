//! Test fixtures: an event builder and an in-memory [`EndpointClient`].
//!
//! Enabled for this crate's own tests and, behind the `test-utils` feature,
//! for downstream crates that want to drive the aggregators without HTTP.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::{
    aggregate::pager::Partition,
    b365::endpoints::EndpointClient,
    models::{
        DetailStatus, Event, EventEnrichment, EventStatus, EventSummary, OddsSummary, Page,
        PaginationInfo, Player,
    },
    Result, TableTennisError,
};

/// Builds [`EventSummary`] values with sensible defaults.
///
/// Defaults: scheduled, started an hour ago, league `29097` "TT Cup",
/// players "Home" vs "Away" and no score.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: EventSummary,
}

impl EventBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            event: EventSummary {
                id: id.into(),
                sport_id: "92".into(),
                time: Some(Utc::now() - Duration::hours(1)),
                time_status: EventStatus::Scheduled,
                league_id: "29097".into(),
                league_name: "TT Cup".into(),
                league_country_code: None,
                home_player: Player::new("h", "Home"),
                away_player: Player::new("a", "Away"),
                current_score: String::new(),
                game_scores: BTreeMap::new(),
                bet365_id: None,
                enrichment: EventEnrichment::default(),
            },
        }
    }

    /// Set both names; ids are derived from the names.
    pub fn players(self, home: &str, away: &str) -> Self {
        self.player_ids((home, home), (away, away))
    }

    pub fn player_ids(mut self, home: (&str, &str), away: (&str, &str)) -> Self {
        self.event.home_player = Player::new(home.0, home.1);
        self.event.away_player = Player::new(away.0, away.1);
        self
    }

    pub fn status(mut self, code: &str) -> Self {
        self.event.time_status = EventStatus::from_code(code);
        self
    }

    pub fn score(mut self, score: &str) -> Self {
        self.event.current_score = score.to_string();
        self
    }

    pub fn finished(self, score: &str) -> Self {
        self.status("3").score(score)
    }

    pub fn league(mut self, id: &str, name: &str) -> Self {
        self.event.league_id = id.to_string();
        self.event.league_name = name.to_string();
        self
    }

    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.event.time = Some(time);
        self
    }

    pub fn untimed(mut self) -> Self {
        self.event.time = None;
        self
    }

    pub fn build(self) -> EventSummary {
        self.event
    }
}

/// Detail-view counterpart of an [`EventSummary`].
pub fn detail_for(summary: &EventSummary) -> Event {
    Event {
        id: summary.id.clone(),
        sport_id: summary.sport_id.clone(),
        time: summary.time,
        time_status: DetailStatus::from_code(summary.time_status.code()),
        league_id: summary.league_id.clone(),
        league_name: summary.league_name.clone(),
        league_country_code: summary.league_country_code.clone(),
        home_player: summary.home_player.clone(),
        away_player: summary.away_player.clone(),
        final_score: summary.current_score.clone(),
        game_scores: summary.game_scores.clone(),
        timeline: Vec::new(),
        extra: None,
        inplay_created_at: None,
        inplay_updated_at: None,
        confirmed_at: None,
        bet365_id: summary.bet365_id.clone(),
    }
}

/// A request seen by [`InMemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List {
        partition: Partition,
        league_id: Option<String>,
        page: u32,
    },
    Detail(Vec<String>),
    Odds(String),
}

/// Serves canned pages per partition and records every call.
///
/// Pages are 1-based; asking past the last page returns an empty page. The
/// pager reports as many pages as were configured.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    pages: HashMap<Partition, Vec<Vec<EventSummary>>>,
    failing_pages: HashSet<(Partition, u32)>,
    failing_partitions: HashSet<Partition>,
    failing_calls: HashSet<(Partition, usize)>,
    details: HashMap<String, Event>,
    failing_detail_ids: HashSet<String>,
    odds: HashMap<String, OddsSummary>,
    failing_odds: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

const PER_PAGE: u32 = 50;

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, partition: Partition, pages: Vec<Vec<EventSummary>>) -> Self {
        self.pages.insert(partition, pages);
        self
    }

    pub fn failing_page(mut self, partition: Partition, page: u32) -> Self {
        self.failing_pages.insert((partition, page));
        self
    }

    pub fn failing_partition(mut self, partition: Partition) -> Self {
        self.failing_partitions.insert(partition);
        self
    }

    /// Only the `nth` listing request (1-based) to `partition` fails.
    pub fn failing_call(mut self, partition: Partition, nth: usize) -> Self {
        self.failing_calls.insert((partition, nth));
        self
    }

    pub fn with_detail(mut self, event: Event) -> Self {
        self.details.insert(event.id.clone(), event);
        self
    }

    /// Any detail batch containing `event_id` fails.
    pub fn failing_detail(mut self, event_id: &str) -> Self {
        self.failing_detail_ids.insert(event_id.to_string());
        self
    }

    pub fn with_odds(mut self, event_id: &str, odds: OddsSummary) -> Self {
        self.odds.insert(event_id.to_string(), odds);
        self
    }

    pub fn failing_odds(mut self, event_id: &str) -> Self {
        self.failing_odds.insert(event_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock_calls().clone()
    }

    /// Listing pages requested from `partition`, in call order.
    pub fn pages_requested(&self, partition: Partition) -> Vec<u32> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                Call::List {
                    partition: p, page, ..
                } if *p == partition => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn detail_batches(&self) -> Vec<Vec<String>> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                Call::Detail(ids) => Some(ids.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn odds_requests(&self) -> Vec<String> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                Call::Odds(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<Call>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: Call) {
        self.lock_calls().push(call);
    }

    fn serve(
        &self,
        partition: Partition,
        league_id: Option<&str>,
        page: u32,
    ) -> Result<Page<EventSummary>> {
        self.record(Call::List {
            partition,
            league_id: league_id.map(str::to_string),
            page,
        });
        let nth = self.pages_requested(partition).len();

        if self.failing_partitions.contains(&partition)
            || self.failing_pages.contains(&(partition, page))
            || self.failing_calls.contains(&(partition, nth))
        {
            return Err(TableTennisError::Server {
                status: 500,
                message: format!("{partition} page {page} unavailable"),
            });
        }

        let pages = self.pages.get(&partition).map(Vec::as_slice).unwrap_or(&[]);
        let results = page
            .checked_sub(1)
            .and_then(|index| pages.get(index as usize))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|e| league_id.map_or(true, |id| e.league_id == id))
            .collect();

        Ok(Page::new(
            results,
            Some(PaginationInfo {
                page,
                per_page: PER_PAGE,
                total: pages.len() as u64 * u64::from(PER_PAGE),
            }),
        ))
    }
}

impl EndpointClient for InMemoryBackend {
    async fn list_ended(&self, league_id: Option<&str>, page: u32) -> Result<Page<EventSummary>> {
        self.serve(Partition::Ended, league_id, page)
    }

    async fn list_upcoming(
        &self,
        league_id: Option<&str>,
        page: u32,
    ) -> Result<Page<EventSummary>> {
        self.serve(Partition::Upcoming, league_id, page)
    }

    async fn list_inplay(&self, league_id: Option<&str>, page: u32) -> Result<Page<EventSummary>> {
        self.serve(Partition::Live, league_id, page)
    }

    async fn get_event_detail(&self, event_ids: &[String]) -> Result<Vec<Event>> {
        self.record(Call::Detail(event_ids.to_vec()));
        if event_ids
            .iter()
            .any(|id| self.failing_detail_ids.contains(id))
        {
            return Err(TableTennisError::Api("INVALID_EVENT_ID".into()));
        }
        Ok(event_ids
            .iter()
            .filter_map(|id| self.details.get(id).cloned())
            .collect())
    }

    async fn get_odds_summary(&self, event_id: &str) -> Result<OddsSummary> {
        self.record(Call::Odds(event_id.to_string()));
        if self.failing_odds.contains(event_id) {
            return Err(TableTennisError::RateLimited { reset: None });
        }
        Ok(self.odds.get(event_id).cloned().unwrap_or_default())
    }
}
