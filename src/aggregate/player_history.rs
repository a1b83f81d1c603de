//! Player match history with optional head-to-head records.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::{
    dedup_by_id,
    pager::{PageWalker, Partition, Selection},
    SubFetch,
};
use crate::{
    b365::endpoints::EndpointClient,
    models::{EventSummary, PlayerMatchHistory},
    Result, TableTennisError,
};

pub const MAX_DAYS: u32 = 365;
pub const MAX_PAGES: u32 = 50;
/// Opponents looked up for head-to-head records.
pub const MAX_H2H_OPPONENTS: usize = 10;
/// Page cap of each head-to-head walk.
pub const H2H_MAX_PAGES: u32 = 5;

/// Parameters of [`BulkDataExt::get_player_history`](super::BulkDataExt::get_player_history).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHistoryParams {
    /// Matched exactly against home and away names.
    pub player_name: String,
    /// Look-back window, 1 to 365.
    pub days: u32,
    pub include_h2h: bool,
    /// Page cap of the main walk, 1 to 50.
    pub max_pages: u32,
}

impl PlayerHistoryParams {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            days: 30,
            include_h2h: true,
            max_pages: 10,
        }
    }

    pub fn days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn include_h2h(mut self, include: bool) -> Self {
        self.include_h2h = include;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.player_name.trim().is_empty() {
            return Err(TableTennisError::validation("player_name cannot be empty"));
        }
        if !(1..=MAX_DAYS).contains(&self.days) {
            return Err(TableTennisError::validation(format!(
                "days must be between 1 and {MAX_DAYS}"
            )));
        }
        if !(1..=MAX_PAGES).contains(&self.max_pages) {
            return Err(TableTennisError::validation(format!(
                "max_pages must be between 1 and {MAX_PAGES}"
            )));
        }
        Ok(())
    }
}

pub(crate) async fn collect<C: EndpointClient>(
    client: &C,
    params: &PlayerHistoryParams,
) -> Result<PlayerMatchHistory> {
    params.validate()?;
    let name = params.player_name.as_str();
    info!(player = name, days = params.days, "collecting player history");

    let matches = recent_matches(client, name, params.days, params.max_pages)
        .await
        .into_option("recent matches")
        .map(dedup_by_id)
        .unwrap_or_default();
    debug!(player = name, matches = matches.len(), "unique matches");

    let mut h2h_records = BTreeMap::new();
    if params.include_h2h && !matches.is_empty() {
        for opponent in opponents(&matches, name) {
            let lookup = h2h_matches(client, name, &opponent, params.days * 2).await;
            if let Some(found) = lookup.into_option("head-to-head") {
                if !found.is_empty() {
                    h2h_records.insert(opponent, found);
                }
            }
        }
        info!(
            player = name,
            opponents = h2h_records.len(),
            "head-to-head records collected"
        );
    }

    Ok(PlayerMatchHistory::from_matches(
        name,
        matches,
        h2h_records,
        params.days,
    ))
}

/// Ended matches of `player` no older than `days`.
async fn recent_matches<C: EndpointClient>(
    client: &C,
    player: &str,
    days: u32,
    max_pages: u32,
) -> SubFetch<Vec<EventSummary>> {
    let cutoff = Utc::now() - Duration::days(i64::from(days));
    let outcome = PageWalker::new(Partition::Ended, max_pages)
        .stop_on_empty_page(true)
        .walk(client, |event| {
            if event.involves(player) && is_recent(event.time, cutoff) {
                Selection::Keep
            } else {
                Selection::Skip
            }
        })
        .await;
    SubFetch::from_walk(outcome)
}

/// Matches between `player` and `opponent` within `days`.
async fn h2h_matches<C: EndpointClient>(
    client: &C,
    player: &str,
    opponent: &str,
    days: u32,
) -> SubFetch<Vec<EventSummary>> {
    match recent_matches(client, player, days, H2H_MAX_PAGES).await {
        SubFetch::Fetched(found) => SubFetch::Fetched(
            found
                .into_iter()
                .filter(|m| m.opponent_of(player).name == opponent)
                .collect(),
        ),
        failed => failed,
    }
}

fn is_recent(time: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    time.is_some_and(|t| t >= cutoff)
}

/// Distinct counter-parties in first-appearance order, capped.
fn opponents(matches: &[EventSummary], player: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    matches
        .iter()
        .map(|m| m.opponent_of(player).name.clone())
        .filter(|name| seen.insert(name.clone()))
        .take(MAX_H2H_OPPONENTS)
        .collect()
}
