//! Unit tests for the tournament aggregator

use super::*;
use crate::{
    aggregate::BulkDataExt,
    models::OddsSummary,
    testing::{EventBuilder, InMemoryBackend},
};
use serde_json::json;

fn in_league(id: &str, league: &str, status: &str) -> EventSummary {
    EventBuilder::new(id)
        .league(league, "TT Cup")
        .status(status)
        .build()
}

fn odds() -> OddsSummary {
    OddsSummary::from([("Bet365".to_string(), json!({"odds_update": {}}))])
}

#[tokio::test]
async fn test_invalid_params_rejected() {
    let backend = InMemoryBackend::new();
    for params in [
        TournamentParams::new(""),
        TournamentParams::new(" "),
        TournamentParams::new("1").max_pages_per_type(0),
        TournamentParams::new("1").max_pages_per_type(21),
    ] {
        let err = backend.get_tournament_complete(params).await.unwrap_err();
        assert!(err.is_validation());
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_merges_partitions_and_counts() {
    let backend = InMemoryBackend::new()
        .with_pages(
            Partition::Ended,
            vec![vec![
                in_league("1", "29097", "3"),
                in_league("2", "29097", "3"),
                in_league("x", "1", "3"),
            ]],
        )
        .with_pages(
            Partition::Upcoming,
            vec![vec![in_league("3", "29097", "1"), in_league("4", "29097", "0")]],
        )
        .with_pages(Partition::Live, vec![vec![in_league("5", "29097", "2")]]);

    let data = backend
        .get_tournament_complete(TournamentParams::new(29097))
        .await
        .unwrap();

    assert_eq!(data.tournament_id, "29097");
    assert_eq!(data.tournament_name, "TT Cup");
    assert_eq!(data.total_matches, 5);
    assert_eq!(data.completed_matches, 2);
    assert_eq!(data.upcoming_matches, 2);
    assert_eq!(data.live_matches, 1);
    assert!((data.completion_rate() - 0.4).abs() < 1e-12);
    assert!(!data.has_odds_data);
    assert!(backend.odds_requests().is_empty());

    let ids: Vec<_> = data.matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn test_match_in_two_partitions_counted_once() {
    let backend = InMemoryBackend::new()
        .with_pages(Partition::Ended, vec![vec![in_league("7", "29097", "3")]])
        .with_pages(Partition::Live, vec![vec![in_league("7", "29097", "2")]]);

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097"))
        .await
        .unwrap();

    assert_eq!(data.total_matches, 1);
    assert_eq!(data.matches.len(), 1);
    assert_eq!(
        data.completed_matches + data.live_matches + data.upcoming_matches,
        data.total_matches
    );
}

#[tokio::test]
async fn test_failed_partition_does_not_block_others() {
    let backend = InMemoryBackend::new()
        .failing_partition(Partition::Ended)
        .with_pages(
            Partition::Upcoming,
            vec![vec![EventBuilder::new("1").league("29097", "Upcoming Cup").build()]],
        )
        .with_pages(Partition::Live, vec![vec![in_league("2", "29097", "2")]]);

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097"))
        .await
        .unwrap();

    assert_eq!(data.total_matches, 2);
    assert_eq!(data.tournament_name, "Upcoming Cup");
    assert_eq!(backend.pages_requested(Partition::Live), vec![1]);
}

#[tokio::test]
async fn test_fallback_name_when_empty() {
    let backend = InMemoryBackend::new()
        .failing_partition(Partition::Ended)
        .failing_partition(Partition::Upcoming)
        .failing_partition(Partition::Live);

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097").include_odds(true))
        .await
        .unwrap();

    assert_eq!(data.tournament_name, "Tournament 29097");
    assert_eq!(data.total_matches, 0);
    assert_eq!(data.completion_rate(), 0.0);
    assert_eq!(data.date_range, (None, None));
    assert!(!data.has_odds_data);
    assert!(backend.odds_requests().is_empty());
}

#[tokio::test]
async fn test_name_skips_matches_without_league_name() {
    let backend = InMemoryBackend::new()
        .with_pages(
            Partition::Ended,
            vec![vec![EventBuilder::new("1").league("29097", "").build()]],
        )
        .with_pages(Partition::Upcoming, vec![vec![in_league("2", "29097", "1")]]);

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097"))
        .await
        .unwrap();

    assert_eq!(data.tournament_name, "TT Cup");
}

#[tokio::test]
async fn test_walks_pass_league_filter_and_cap() {
    let pages = (1..=5)
        .map(|i| vec![in_league(&i.to_string(), "29097", "3")])
        .collect();
    let backend = InMemoryBackend::new().with_pages(Partition::Ended, pages);

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097").max_pages_per_type(2))
        .await
        .unwrap();

    assert_eq!(data.total_matches, 2);
    assert_eq!(backend.pages_requested(Partition::Ended), vec![1, 2]);
    assert!(backend.calls().iter().all(|call| matches!(
        call,
        crate::testing::Call::List { league_id: Some(id), .. } if id == "29097"
    )));
}

#[tokio::test]
async fn test_odds_sampling_first_three_only() {
    let matches = (1..=5)
        .map(|i| in_league(&i.to_string(), "29097", "3"))
        .collect();
    let backend = InMemoryBackend::new()
        .with_pages(Partition::Ended, vec![matches])
        .failing_odds("1")
        .with_odds("3", odds())
        .with_odds("4", odds());

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097").include_odds(true))
        .await
        .unwrap();

    assert!(data.has_odds_data);
    assert_eq!(backend.odds_requests(), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_odds_sampling_without_odds() {
    let backend = InMemoryBackend::new()
        .with_pages(Partition::Ended, vec![vec![in_league("1", "29097", "3")]])
        .with_odds("9", odds());

    let data = backend
        .get_tournament_complete(TournamentParams::new("29097").include_odds(true))
        .await
        .unwrap();

    assert!(!data.has_odds_data);
    assert_eq!(backend.odds_requests(), vec!["1"]);
}

#[test]
fn test_first_league_name() {
    let matches = vec![
        EventBuilder::new("1").league("1", "  ").build(),
        EventBuilder::new("2").league("1", "Cup").build(),
    ];
    assert_eq!(first_league_name(&matches).as_deref(), Some("Cup"));
    assert_eq!(first_league_name(&[]), None);
}
