//! Resolve a set of event ids against the listings.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use super::{
    pager::{PageWalker, Partition, Selection},
    SubFetch,
};
use crate::{
    b365::endpoints::{EndpointClient, MAX_DETAIL_IDS},
    models::EventSummary,
    Result, TableTennisError,
};

pub const MAX_BULK_IDS: usize = 100;
/// Pages scanned per partition while looking for ids.
pub const PAGES_PER_PARTITION: u32 = 5;

/// Optional data fetched for each resolved event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub odds: bool,
    pub detail: bool,
}

pub(crate) async fn resolve<C: EndpointClient>(
    client: &C,
    event_ids: &[String],
    enrichment: Enrichment,
) -> Result<BTreeMap<String, EventSummary>> {
    if event_ids.is_empty() {
        return Err(TableTennisError::validation("event_ids cannot be empty"));
    }
    if event_ids.len() > MAX_BULK_IDS {
        return Err(TableTennisError::validation(format!(
            "cannot request more than {MAX_BULK_IDS} events at once"
        )));
    }

    let mut not_found: HashSet<String> = event_ids.iter().cloned().collect();
    let requested = not_found.len();
    let mut resolved = BTreeMap::new();
    info!(requested, "resolving events");

    for partition in Partition::ALL {
        if not_found.is_empty() {
            break;
        }
        let outcome = PageWalker::new(partition, PAGES_PER_PARTITION)
            .walk(client, |event| {
                if !not_found.remove(&event.id) {
                    Selection::Skip
                } else if not_found.is_empty() {
                    Selection::KeepAndStop
                } else {
                    Selection::Keep
                }
            })
            .await;

        if let Some(e) = outcome.error() {
            warn!(%partition, error = %e, "search stopped early in partition");
        }
        debug!(%partition, found = outcome.items.len(), "partition searched");
        for event in outcome.items {
            resolved.insert(event.id.clone(), event);
        }
    }

    if enrichment.detail {
        attach_details(client, &mut resolved).await;
    }
    if enrichment.odds {
        attach_odds(client, &mut resolved).await;
    }

    info!(found = resolved.len(), requested, "events resolved");
    if !not_found.is_empty() {
        let mut missing: Vec<_> = not_found.into_iter().collect();
        missing.sort();
        debug!(missing = %missing.join(", "), "events not found");
    }
    Ok(resolved)
}

/// Detail views in batches of [`MAX_DETAIL_IDS`]. A failed batch is retried
/// one id at a time so only the event that fails goes without detail.
async fn attach_details<C: EndpointClient>(
    client: &C,
    resolved: &mut BTreeMap<String, EventSummary>,
) {
    let ids: Vec<String> = resolved.keys().cloned().collect();
    for batch in ids.chunks(MAX_DETAIL_IDS) {
        let details = match client.get_event_detail(batch).await {
            Ok(details) => details,
            Err(e) if batch.len() > 1 => {
                debug!(error = %e, size = batch.len(), "detail batch failed, fetching singly");
                let mut details = Vec::with_capacity(batch.len());
                for id in batch {
                    let single = SubFetch::from_result(
                        client.get_event_detail(std::slice::from_ref(id)).await,
                    );
                    details.extend(single.into_option("event detail").unwrap_or_default());
                }
                details
            }
            Err(e) => {
                warn!(error = %e, "event detail failed");
                Vec::new()
            }
        };
        for detail in details {
            if let Some(event) = resolved.get_mut(&detail.id) {
                event.enrichment.detail = Some(detail);
            }
        }
    }
}

async fn attach_odds<C: EndpointClient>(client: &C, resolved: &mut BTreeMap<String, EventSummary>) {
    for (id, event) in resolved.iter_mut() {
        let odds = SubFetch::from_result(client.get_odds_summary(id).await);
        event.enrichment.odds = odds.into_option("odds summary");
    }
}
