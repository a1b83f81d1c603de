//! Page-by-page walks over one status partition.
//!
//! A walk stops when the API reports no next page, the page cap is hit, the
//! selector asks to stop, or (optionally) a page after the first yields no
//! selected events. A failing page ends the walk but keeps everything
//! collected so far.

use std::fmt;

use tracing::debug;

use crate::{
    b365::endpoints::EndpointClient,
    models::{EventSummary, Page},
    Result, TableTennisError,
};

/// The three status buckets of the events API, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Ended,
    Upcoming,
    Live,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Ended, Partition::Upcoming, Partition::Live];

    pub fn label(&self) -> &'static str {
        match self {
            Partition::Ended => "ended",
            Partition::Upcoming => "upcoming",
            Partition::Live => "live",
        }
    }

    /// Fetch one page of this partition.
    pub async fn fetch<C: EndpointClient>(
        &self,
        client: &C,
        league_id: Option<&str>,
        page: u32,
    ) -> Result<Page<EventSummary>> {
        match self {
            Partition::Ended => client.list_ended(league_id, page).await,
            Partition::Upcoming => client.list_upcoming(league_id, page).await,
            Partition::Live => client.list_inplay(league_id, page).await,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Verdict of a selector on one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Skip,
    Keep,
    /// Keep this event and end the walk after the current page.
    KeepAndStop,
}

#[derive(Debug)]
pub enum StopReason {
    /// The API reported no further page, or a page came back empty.
    Exhausted,
    PageLimit,
    /// A page after the first had no selected events.
    NoMatchesOnPage,
    /// The selector asked to stop.
    Satisfied,
    Failed(TableTennisError),
}

/// What a walk collected and why it ended.
#[derive(Debug)]
pub struct WalkOutcome {
    pub items: Vec<EventSummary>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl WalkOutcome {
    pub fn error(&self) -> Option<&TableTennisError> {
        match &self.stop {
            StopReason::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Configured walk over one partition.
///
/// ```rust
/// use tabletennis_api::aggregate::pager::{PageWalker, Partition};
///
/// let walker = PageWalker::new(Partition::Ended, 10).stop_on_empty_page(true);
/// assert_eq!(walker.partition(), Partition::Ended);
/// ```
#[derive(Debug, Clone)]
pub struct PageWalker<'a> {
    partition: Partition,
    league_id: Option<&'a str>,
    start_page: u32,
    max_pages: u32,
    stop_on_empty: bool,
}

impl<'a> PageWalker<'a> {
    pub fn new(partition: Partition, max_pages: u32) -> Self {
        Self {
            partition,
            league_id: None,
            start_page: 1,
            max_pages,
            stop_on_empty: false,
        }
    }

    pub fn league(mut self, league_id: &'a str) -> Self {
        self.league_id = Some(league_id);
        self
    }

    pub fn start_page(mut self, page: u32) -> Self {
        self.start_page = page.max(1);
        self
    }

    /// Stop once a page after the first selects nothing.
    pub fn stop_on_empty_page(mut self, enabled: bool) -> Self {
        self.stop_on_empty = enabled;
        self
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Walk pages, keeping the events `select` accepts.
    pub async fn walk<C, F>(&self, client: &C, mut select: F) -> WalkOutcome
    where
        C: EndpointClient,
        F: FnMut(&EventSummary) -> Selection,
    {
        let mut items = Vec::new();
        let mut pages_fetched = 0;
        let mut page = self.start_page;

        let stop = loop {
            if pages_fetched >= self.max_pages {
                break StopReason::PageLimit;
            }

            let response = match self.partition.fetch(client, self.league_id, page).await {
                Ok(response) => response,
                Err(e) => {
                    debug!(partition = %self.partition, page, error = %e, "page fetch failed");
                    break StopReason::Failed(e);
                }
            };
            pages_fetched += 1;

            let has_next = response.has_next_page();
            if response.results.is_empty() {
                break StopReason::Exhausted;
            }

            let mut selected = 0usize;
            let mut satisfied = false;
            for event in response.results {
                match select(&event) {
                    Selection::Skip => {}
                    Selection::Keep => {
                        selected += 1;
                        items.push(event);
                    }
                    Selection::KeepAndStop => {
                        selected += 1;
                        items.push(event);
                        satisfied = true;
                        break;
                    }
                }
            }
            debug!(partition = %self.partition, page, selected, "page scanned");

            if satisfied {
                break StopReason::Satisfied;
            }
            if self.stop_on_empty && selected == 0 && page > self.start_page {
                break StopReason::NoMatchesOnPage;
            }
            if !has_next {
                break StopReason::Exhausted;
            }
            page += 1;
        };

        WalkOutcome {
            items,
            pages_fetched,
            stop,
        }
    }
}
