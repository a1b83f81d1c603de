//! Bulk aggregation over the paged event listings.
//!
//! Every operation here issues its sub-fetches one at a time in a fixed
//! order and isolates their failures: a failing page, partition, opponent
//! lookup or odds sample contributes nothing and the aggregation carries on.
//! Only invalid parameters are reported as errors.

pub mod bulk;
pub mod pager;
pub mod player_history;
pub mod tournament;

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::{
    b365::endpoints::EndpointClient,
    models::{EventSummary, PlayerMatchHistory, TournamentData},
    Result, TableTennisError,
};

pub use pager::{PageWalker, Partition, Selection, StopReason, WalkOutcome};
pub use player_history::PlayerHistoryParams;
pub use tournament::TournamentParams;

/// Outcome of one isolated sub-fetch.
#[derive(Debug)]
pub enum SubFetch<T> {
    Fetched(T),
    Failed(TableTennisError),
}

impl<T> SubFetch<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => SubFetch::Fetched(value),
            Err(e) => SubFetch::Failed(e),
        }
    }

    /// The fetched value; a failure is logged under `context` and dropped.
    pub fn into_option(self, context: &str) -> Option<T> {
        match self {
            SubFetch::Fetched(value) => Some(value),
            SubFetch::Failed(e) => {
                warn!(context, error = %e, "sub-fetch failed, continuing without it");
                None
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubFetch::Failed(_))
    }
}

impl SubFetch<Vec<EventSummary>> {
    /// A walk that failed before collecting anything is a failure; one that
    /// failed part way keeps what it had.
    pub fn from_walk(outcome: WalkOutcome) -> Self {
        match outcome.stop {
            StopReason::Failed(e) if outcome.items.is_empty() => SubFetch::Failed(e),
            StopReason::Failed(e) => {
                warn!(
                    kept = outcome.items.len(),
                    error = %e,
                    "walk ended early, keeping partial results"
                );
                SubFetch::Fetched(outcome.items)
            }
            _ => SubFetch::Fetched(outcome.items),
        }
    }
}

/// Drop repeated ids. Each id keeps the position of its first occurrence and
/// the value of its last.
pub fn dedup_by_id(events: Vec<EventSummary>) -> Vec<EventSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<EventSummary> = Vec::with_capacity(events.len());
    for event in events {
        match index.get(&event.id) {
            Some(&at) => unique[at] = event,
            None => {
                index.insert(event.id.clone(), unique.len());
                unique.push(event);
            }
        }
    }
    unique
}

/// Aggregation operations available on every [`EndpointClient`].
///
/// ```rust,no_run
/// use tabletennis_api::{BulkDataExt, PlayerHistoryParams, TableTennisApi};
///
/// # async fn run() -> tabletennis_api::Result<()> {
/// let api = TableTennisApi::new("my-token")?;
/// let history = api
///     .get_player_history(PlayerHistoryParams::new("Jan Kocab").days(60))
///     .await?;
/// println!("win rate {:.1}%", history.win_rate() * 100.0);
/// # Ok(())
/// # }
/// ```
#[allow(async_fn_in_trait)]
pub trait BulkDataExt: EndpointClient {
    /// Recent matches of one player, with optional head-to-head records.
    async fn get_player_history(&self, params: PlayerHistoryParams) -> Result<PlayerMatchHistory>;

    /// Every match of one tournament across ended, upcoming and live.
    async fn get_tournament_complete(&self, params: TournamentParams) -> Result<TournamentData>;

    /// Resolve up to 100 event ids. Ids that cannot be found are left out.
    async fn get_events_bulk<I, S>(
        &self,
        event_ids: I,
        include_odds: bool,
        include_view: bool,
    ) -> Result<BTreeMap<String, EventSummary>>
    where
        I: IntoIterator<Item = S>,
        S: ToString;
}

impl<C: EndpointClient> BulkDataExt for C {
    async fn get_player_history(&self, params: PlayerHistoryParams) -> Result<PlayerMatchHistory> {
        player_history::collect(self, &params).await
    }

    async fn get_tournament_complete(&self, params: TournamentParams) -> Result<TournamentData> {
        tournament::collect(self, &params).await
    }

    async fn get_events_bulk<I, S>(
        &self,
        event_ids: I,
        include_odds: bool,
        include_view: bool,
    ) -> Result<BTreeMap<String, EventSummary>>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids: Vec<String> = event_ids.into_iter().map(|id| id.to_string()).collect();
        bulk::resolve(
            self,
            &ids,
            bulk::Enrichment {
                odds: include_odds,
                detail: include_view,
            },
        )
        .await
    }
}
