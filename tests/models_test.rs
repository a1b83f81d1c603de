//! Tests for B365 wire payloads mapped into the public models

use serde_json::json;
use tabletennis_api::{
    b365::types::{Envelope, WireEvent, WireEventSummary, WireLeague, WirePlayer},
    core::{american_to_decimal, implied_probability, parse_score},
    models::{DetailStatus, EventStatus, Side},
    Event, EventSummary, League, PaginationInfo, Player,
};

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_inplay_listing_page() {
        let envelope: Envelope<Vec<WireEventSummary>> = serde_json::from_value(json!({
            "success": 1,
            "pager": {"page": 1, "per_page": 50, "total": 2},
            "results": [
                {
                    "id": "10393376",
                    "sport_id": "92",
                    "time": "1753893000",
                    "time_status": "2",
                    "league": {"id": "29128", "name": "Czech Liga Pro", "cc": "cz"},
                    "home": {"id": "1032211", "name": "Tomas Holik", "image_id": 0, "cc": "cz"},
                    "away": {"id": "727651", "name": "Michal Vedmoch", "image_id": 0, "cc": "cz"},
                    "ss": "1-1",
                    "scores": {
                        "1": {"home": "11", "away": "7"},
                        "2": {"home": "9", "away": "11"},
                        "3": {"home": "4", "away": "2"}
                    },
                    "bet365_id": "177487512"
                },
                {
                    "id": "10393377",
                    "sport_id": "92",
                    "time": "1753894800",
                    "time_status": "0",
                    "league": {"id": "29128", "name": "Czech Liga Pro", "cc": "cz"},
                    "home": {"id": "1", "name": "Kocab J/Benak J", "image_id": 0},
                    "away": {"id": "2", "name": "Holik T/Vedmoch M", "image_id": 0},
                    "o_away": {"id": "3", "name": "Holik Tomas/Vedmoch Michal", "image_id": "99"},
                    "ss": null,
                    "scores": []
                }
            ]
        }))
        .unwrap();

        let pager = PaginationInfo::from(envelope.pager.unwrap());
        assert_eq!(pager.total_pages(), 1);
        assert!(!pager.has_next_page());

        let events: Vec<EventSummary> = envelope.results.into_iter().map(Into::into).collect();

        let live = &events[0];
        assert!(live.is_live());
        assert_eq!(live.sets_score(), Some((1, 1)));
        assert_eq!(live.game_scores.len(), 3);
        assert!(!live.is_winner("Tomas Holik"));
        assert!(!live.is_winner("Michal Vedmoch"));

        let doubles = &events[1];
        assert_eq!(doubles.time_status, EventStatus::Upcoming);
        assert!(doubles.is_scheduled());
        assert!(doubles.home_player.is_doubles_pair());
        assert_eq!(doubles.away_player.id, "3");
        assert_eq!(
            doubles.away_player.player_names(),
            vec!["Holik Tomas", "Vedmoch Michal"]
        );
        assert!(doubles.away_player.has_image());
        assert_eq!(doubles.sets_score(), None);
    }

    #[test]
    fn test_summary_serializes_for_output() {
        let wire: WireEventSummary = serde_json::from_value(json!({
            "id": "1",
            "sport_id": "92",
            "time": "1753811700",
            "time_status": "3",
            "league": {"id": "29097", "name": "TT Cup"},
            "home": {"id": "1", "name": "A"},
            "away": {"id": "2", "name": "B"},
            "ss": "3-2"
        }))
        .unwrap();
        let event = EventSummary::from(wire);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["home_player"]["name"], "A");
        assert_eq!(value["current_score"], "3-2");
        assert_eq!(value["time"], "2025-07-29T17:55:00Z");
    }
}

#[cfg(test)]
mod detail_tests {
    use super::*;

    #[test]
    fn test_event_view_payload() {
        let envelope: Envelope<Vec<WireEvent>> = serde_json::from_value(json!({
            "success": 1,
            "results": [{
                "id": "10385512",
                "sport_id": "92",
                "time": "1753811700",
                "time_status": "3",
                "league": {"id": "29097", "name": "TT Cup", "cc": "cz"},
                "home": {"id": "704817", "name": "Jan Kocab", "image_id": 0, "cc": null},
                "away": {"id": "910936", "name": "Jan Benak", "image_id": 0, "cc": null},
                "ss": "1-3",
                "scores": {"1": {"home": "11", "away": "6"}},
                "timeline": [
                    {"id": "254604195", "gm": "1", "te": "0", "ss": "1-0"},
                    {"id": "254604214", "gm": "1", "te": "0", "ss": "2-0"},
                    {"id": "254604232", "gm": "1", "te": "1", "ss": "2-1"}
                ],
                "extra": {"bestofsets": "5", "stadium_data": null},
                "inplay_created_at": "1753811000",
                "inplay_updated_at": "1753814000",
                "confirmed_at": "1753814500",
                "bet365_id": "177439380"
            }]
        }))
        .unwrap();

        let event: Event = envelope.results.into_iter().next().unwrap().into();
        assert_eq!(event.time_status, DetailStatus::Finished);
        assert_eq!(event.status_description(), "Finished");
        assert_eq!(event.away_sets_won(), Some(3));
        assert_eq!(event.winner().map(|p| p.name.as_str()), Some("Jan Benak"));
        assert_eq!(event.total_points_played(), 3);
        assert_eq!(event.timeline[2].side, Side::Away);
        assert_eq!(event.timeline[2].home_score(), Some(2));
        let extra = event.extra.unwrap();
        assert_eq!(extra.best_of_sets.as_deref(), Some("5"));
        assert!(extra.stadium.is_none());
    }
}

#[cfg(test)]
mod reference_data_tests {
    use super::*;

    #[test]
    fn test_league_and_player_payloads() {
        let league: League = serde_json::from_value::<WireLeague>(json!({
            "id": "29097",
            "name": "TT Cup",
            "cc": "cz",
            "has_leaguetable": 0,
            "has_toplist": 1
        }))
        .unwrap()
        .into();
        assert!(!league.supports_standings());
        assert!(league.supports_rankings());

        let player: Player = serde_json::from_value::<WirePlayer>(json!({
            "id": 704817,
            "name": "Jan Kocab",
            "cc": "cz",
            "image_id": 0
        }))
        .unwrap()
        .into();
        assert_eq!(player.id, "704817");
        assert!(!player.has_image());
        assert_eq!(player.display_name(), "Jan Kocab");
    }

    #[test]
    fn test_score_and_odds_helpers() {
        let parsed = parse_score("3-2 (11-9, 9-11, 11-8, 8-11, 11-6)").unwrap();
        assert_eq!(parsed.games.len(), 5);
        let decimal = american_to_decimal(150).unwrap();
        assert!((decimal - 2.5).abs() < 1e-9);
        assert!((implied_probability(decimal).unwrap() - 40.0).abs() < 1e-9);
        assert!(american_to_decimal(0).and_then(implied_probability).is_none());
    }
}
