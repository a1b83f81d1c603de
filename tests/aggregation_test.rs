//! End-to-end tests of the aggregation layer over HTTP with a mocked B365 API

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tabletennis_api::{
    BulkDataExt, ClientConfig, PlayerHistoryParams, TableTennisApi, TableTennisError,
    TournamentParams,
};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn event(id: &str, league: (&str, &str), home: &str, away: &str, status: &str, ss: &str) -> Value {
    let time = (Utc::now() - Duration::hours(3)).timestamp().to_string();
    json!({
        "id": id,
        "sport_id": "92",
        "time": time,
        "time_status": status,
        "league": {"id": league.0, "name": league.1, "cc": "cz"},
        "home": {"id": format!("{home}-id"), "name": home, "image_id": 0, "cc": null},
        "away": {"id": format!("{away}-id"), "name": away, "image_id": 0, "cc": null},
        "ss": ss,
        "scores": {}
    })
}

fn page(results: Vec<Value>, page: u32, total: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": 1,
        "pager": {"page": page, "per_page": 50, "total": total},
        "results": results
    }))
}

async fn mount_listing(server: &MockServer, endpoint: &str, page_no: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v3/events/{endpoint}")))
        .and(query_param("page", page_no.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn api(server: &MockServer) -> TableTennisApi {
    TableTennisApi::with_config(ClientConfig::new("test-token").with_base_url(server.uri()))
        .expect("valid config")
}

#[tokio::test]
async fn test_player_history_over_http() {
    let server = MockServer::start().await;
    let cup = ("29097", "TT Cup");
    mount_listing(
        &server,
        "ended",
        1,
        page(
            vec![
                event("1", cup, "Jan Kocab", "Jan Benak", "3", "3-1"),
                event("2", cup, "Petr Novak", "Jan Kocab", "3", "3-0"),
                event("3", ("1", "Other"), "X", "Y", "3", "3-0"),
            ],
            1,
            50,
        ),
    )
    .await;

    let history = api(&server)
        .get_player_history(PlayerHistoryParams::new("Jan Kocab"))
        .await
        .unwrap();

    assert_eq!(history.total_matches, 2);
    assert_eq!(history.win_count, 1);
    assert_eq!(history.loss_count, 1);
    assert_eq!(history.recent_form().len(), 2);
    assert_eq!(history.h2h_records.len(), 2);
    assert_eq!(history.h2h_records["Jan Benak"].len(), 1);
}

#[tokio::test]
async fn test_player_history_survives_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let history = api(&server)
        .get_player_history(PlayerHistoryParams::new("Jan Kocab"))
        .await
        .unwrap();

    assert_eq!(history.total_matches, 0);
    assert_eq!(history.win_rate(), 0.0);
}

#[tokio::test]
async fn test_validation_errors_propagate() {
    let server = MockServer::start().await;
    let api = api(&server);

    assert!(matches!(
        api.get_player_history(PlayerHistoryParams::new("")).await,
        Err(TableTennisError::Validation(_))
    ));
    assert!(matches!(
        api.get_tournament_complete(TournamentParams::new("29097").max_pages_per_type(99))
            .await,
        Err(TableTennisError::Validation(_))
    ));
    assert!(matches!(
        api.get_events_bulk(Vec::<String>::new(), false, false).await,
        Err(TableTennisError::Validation(_))
    ));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_tournament_over_http_with_one_partition_down() {
    let server = MockServer::start().await;
    let cup = ("29097", "TT Cup");
    mount_listing(
        &server,
        "ended",
        1,
        page(
            vec![
                event("1", cup, "A", "B", "3", "3-0"),
                event("2", cup, "C", "A", "3", "1-3"),
            ],
            1,
            2,
        ),
    )
    .await;
    mount_listing(&server, "upcoming", 1, ResponseTemplate::new(503)).await;
    mount_listing(
        &server,
        "inplay",
        1,
        page(vec![event("2", cup, "C", "A", "2", "1-2")], 1, 1),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v2/event/odds/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "results": {"Bet365": {"matching_dir": 1}}
        })))
        .mount(&server)
        .await;

    let data = api(&server)
        .get_tournament_complete(TournamentParams::new("29097").include_odds(true))
        .await
        .unwrap();

    assert_eq!(data.tournament_name, "TT Cup");
    assert_eq!(data.total_matches, 2);
    assert_eq!(
        data.completed_matches + data.live_matches + data.upcoming_matches,
        2
    );
    assert_eq!(data.unique_players(), vec!["A", "B", "C"]);
    assert!(data.has_odds_data);
}

#[tokio::test]
async fn test_events_bulk_over_http() {
    let server = MockServer::start().await;
    let cup = ("29097", "TT Cup");
    mount_listing(
        &server,
        "ended",
        1,
        page(vec![event("10385512", cup, "A", "B", "3", "3-0")], 1, 1),
    )
    .await;
    mount_listing(&server, "upcoming", 1, page(vec![], 1, 0)).await;
    mount_listing(&server, "inplay", 1, page(vec![], 1, 0)).await;

    let mut detail = event("10385512", cup, "A", "B", "3", "3-0");
    detail["timeline"] = json!([{"id": "1", "gm": "1", "te": "1", "ss": "0-1"}]);
    Mock::given(method("GET"))
        .and(path("/v1/event/view"))
        .and(query_param("event_id", "10385512"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": 1, "results": [detail]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = api(&server)
        .get_events_bulk(["10385512", "99"], false, true)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    let event = &found["10385512"];
    let detail = event.enrichment.detail.as_ref().unwrap();
    assert_eq!(detail.total_points_played(), 1);
    assert_eq!(detail.winner().map(|p| p.name.as_str()), Some("A"));
    assert!(event.enrichment.odds.is_none());
}
