//! The narrow endpoint contract the aggregation layer is built on.
//!
//! [`TableTennisApi`](super::http::TableTennisApi) implements it over HTTP;
//! tests implement it in memory. Implementations surface remote failures as
//! [`TableTennisError`](crate::TableTennisError) and never retry.

use crate::{
    models::{Event, EventSummary, OddsSummary, Page},
    Result,
};

/// Most ids `event/view` accepts in one call.
pub const MAX_DETAIL_IDS: usize = 10;

/// Single-resource calls used by the bulk aggregators.
///
/// `page` is 1-based. `league_id` filters server-side when given.
#[allow(async_fn_in_trait)]
pub trait EndpointClient {
    async fn list_ended(&self, league_id: Option<&str>, page: u32) -> Result<Page<EventSummary>>;

    async fn list_upcoming(&self, league_id: Option<&str>, page: u32)
        -> Result<Page<EventSummary>>;

    async fn list_inplay(&self, league_id: Option<&str>, page: u32) -> Result<Page<EventSummary>>;

    /// Detail view for up to [`MAX_DETAIL_IDS`] events.
    async fn get_event_detail(&self, event_ids: &[String]) -> Result<Vec<Event>>;

    async fn get_odds_summary(&self, event_id: &str) -> Result<OddsSummary>;
}
