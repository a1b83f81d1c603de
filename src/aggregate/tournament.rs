//! Complete tournament snapshot across the three status partitions.

use tracing::{debug, info};

use super::{
    dedup_by_id,
    pager::{PageWalker, Partition, Selection},
    SubFetch,
};
use crate::{
    b365::endpoints::EndpointClient,
    models::{EventSummary, TournamentData},
    Result, TableTennisError,
};

pub const MAX_PAGES_PER_TYPE: u32 = 20;
/// Matches whose odds are queried when odds sampling is on.
pub const ODDS_SAMPLE_SIZE: usize = 3;

/// Parameters of [`BulkDataExt::get_tournament_complete`](super::BulkDataExt::get_tournament_complete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentParams {
    /// League id the matches must carry.
    pub tournament_id: String,
    pub include_odds: bool,
    /// Page cap of each partition walk, 1 to 20.
    pub max_pages_per_type: u32,
}

impl TournamentParams {
    pub fn new(tournament_id: impl ToString) -> Self {
        Self {
            tournament_id: tournament_id.to_string(),
            include_odds: false,
            max_pages_per_type: 10,
        }
    }

    pub fn include_odds(mut self, include: bool) -> Self {
        self.include_odds = include;
        self
    }

    pub fn max_pages_per_type(mut self, max_pages: u32) -> Self {
        self.max_pages_per_type = max_pages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tournament_id.trim().is_empty() {
            return Err(TableTennisError::validation("tournament_id cannot be empty"));
        }
        if !(1..=MAX_PAGES_PER_TYPE).contains(&self.max_pages_per_type) {
            return Err(TableTennisError::validation(format!(
                "max_pages_per_type must be between 1 and {MAX_PAGES_PER_TYPE}"
            )));
        }
        Ok(())
    }
}

pub(crate) async fn collect<C: EndpointClient>(
    client: &C,
    params: &TournamentParams,
) -> Result<TournamentData> {
    params.validate()?;
    let tournament_id = params.tournament_id.trim();
    info!(tournament_id, "collecting tournament data");

    let mut fetched = Vec::with_capacity(Partition::ALL.len());
    for partition in Partition::ALL {
        let outcome = PageWalker::new(partition, params.max_pages_per_type)
            .league(tournament_id)
            .stop_on_empty_page(true)
            .walk(client, |event| {
                if event.league_id == tournament_id {
                    Selection::Keep
                } else {
                    Selection::Skip
                }
            })
            .await;
        fetched.push((partition, SubFetch::from_walk(outcome)));
    }

    let mut tournament_name = None;
    let mut merged = Vec::new();
    for (partition, sub_fetch) in fetched {
        let Some(matches) = sub_fetch.into_option(partition.label()) else {
            continue;
        };
        debug!(%partition, matches = matches.len(), "partition collected");
        if tournament_name.is_none() {
            tournament_name = first_league_name(&matches);
        }
        merged.extend(matches);
    }

    let matches = dedup_by_id(merged);
    let tournament_name = tournament_name.unwrap_or_else(|| format!("Tournament {tournament_id}"));

    let has_odds_data = params.include_odds && sample_odds(client, &matches).await;

    let data = TournamentData::from_matches(tournament_id, tournament_name, matches, has_odds_data);
    info!(
        tournament_id,
        name = %data.tournament_name,
        total = data.total_matches,
        completed = data.completed_matches,
        live = data.live_matches,
        upcoming = data.upcoming_matches,
        "tournament collected"
    );
    Ok(data)
}

fn first_league_name(matches: &[EventSummary]) -> Option<String> {
    matches
        .iter()
        .map(|m| m.league_name.trim())
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// Whether any of the first few matches has a non-empty odds summary.
async fn sample_odds<C: EndpointClient>(client: &C, matches: &[EventSummary]) -> bool {
    let mut with_odds = 0;
    let sample = &matches[..matches.len().min(ODDS_SAMPLE_SIZE)];
    for event in sample {
        let odds = SubFetch::from_result(client.get_odds_summary(&event.id).await);
        if odds.into_option("odds sample").is_some_and(|o| !o.is_empty()) {
            with_odds += 1;
        }
    }
    debug!(with_odds, sampled = sample.len(), "odds sampled");
    with_odds > 0
}

#[cfg(test)]
mod tests;
