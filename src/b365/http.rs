use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use reqwest::{header::HeaderMap, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    endpoints::{EndpointClient, MAX_DETAIL_IDS},
    types::{
        Envelope, WireEvent, WireEventHistory, WireEventSummary, WireLeague, WirePlayer,
    },
};
use crate::{
    core::{
        config::{needs_sport_id, ApiVersion, ClientConfig, SPORT_ID},
        RateLimitInfo,
    },
    models::{
        Event, EventHistory, EventSummary, League, OddsDetail, OddsSummary, Page, Player,
    },
    Result, TableTennisError,
};


/// Most `event/history` entries per category.
pub const MAX_HISTORY_QTY: u32 = 20;

/// Pages scanned by [`TableTennisApi::search_players`] before giving up.
pub const PLAYER_SEARCH_MAX_PAGES: u32 = 10;

pub const DEFAULT_ODDS_SOURCE: &str = "bet365";

/// Client for the B365 table tennis endpoints.
///
/// Every request carries the API token; sport-scoped endpoints also get
/// `sport_id=92`. Rate-limit headers from each response are recorded and
/// can be read back with [`rate_limit_info`](Self::rate_limit_info).
///
/// Calls are meant to be issued one at a time; concurrent use is memory
/// safe but the recorded rate-limit state is simply last-write-wins.
///
/// ```rust,no_run
/// use tabletennis_api::{EndpointClient, TableTennisApi};
///
/// # async fn run() -> tabletennis_api::Result<()> {
/// let api = TableTennisApi::new("my-token")?;
/// let live = api.list_inplay(Some("29097"), 1).await?;
/// for event in &live.results {
///     println!("{} vs {}: {}", event.home_player.name, event.away_player.name, event.current_score);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TableTennisApi {
    http: Client,
    config: ClientConfig,
    rate_limit: RwLock<RateLimitInfo>,
}

impl TableTennisApi {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            rate_limit: RwLock::new(RateLimitInfo::default()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Quota state from the most recent response.
    pub fn rate_limit_info(&self) -> RateLimitInfo {
        *self
            .rate_limit
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// True when fewer than ten requests remain in the current window.
    pub fn is_rate_limited(&self) -> bool {
        self.rate_limit_info().is_rate_limited()
    }

    fn record_rate_limit(&self, headers: &HeaderMap) {
        self.rate_limit
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .update_from_headers(headers);
    }

    /// GET an endpoint and return the checked envelope as raw JSON.
    async fn get_value(
        &self,
        version: ApiVersion,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value> {
        let url = self.config.endpoint_url(version, endpoint);

        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("token", self.config.api_key.clone()));
        if needs_sport_id(endpoint) && !params.iter().any(|(k, _)| *k == "sport_id") {
            query.push(("sport_id", SPORT_ID.to_string()));
        }

        debug!(%url, ?params, "GET");
        let response = self.http.get(&url).query(&query).send().await?;
        self.record_rate_limit(response.headers());

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, message));
        }

        let body: Value = response.json().await?;
        if !is_success(&body) {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Unknown API error");
            return Err(TableTennisError::Api(message.to_string()));
        }
        Ok(body)
    }

    async fn get<T>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Envelope<T>>
    where
        T: DeserializeOwned + Default,
    {
        let body = self.get_value(version, endpoint, params).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get_page<W, T>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Page<T>>
    where
        W: DeserializeOwned,
        T: From<W>,
    {
        let envelope: Envelope<Vec<W>> = self.get(version, endpoint, params).await?;
        Ok(Page::new(
            envelope.results.into_iter().map(T::from).collect(),
            envelope.pager.map(Into::into),
        ))
    }

    fn status_error(&self, status: StatusCode, message: String) -> TableTennisError {
        match status {
            StatusCode::UNAUTHORIZED => TableTennisError::Authentication,
            StatusCode::TOO_MANY_REQUESTS => TableTennisError::RateLimited {
                reset: self.rate_limit_info().reset_time,
            },
            s if s.is_server_error() => TableTennisError::Server {
                status: s.as_u16(),
                message,
            },
            s => TableTennisError::Request {
                status: s.as_u16(),
                message,
            },
        }
    }

    async fn list_events(
        &self,
        endpoint: &str,
        league_id: Option<&str>,
        page: u32,
    ) -> Result<Page<EventSummary>> {
        let mut params = vec![("page", checked_page(page)?.to_string())];
        if let Some(league_id) = league_id.filter(|id| !id.is_empty()) {
            params.push(("league_id", league_id.to_string()));
        }
        self.get_page::<WireEventSummary, _>(ApiVersion::V3, endpoint, &params)
            .await
    }

    /// Search events between two players on one day (`events/search`).
    ///
    /// The API only answers table tennis searches when home, away and date
    /// are all given.
    pub async fn search_events(
        &self,
        home: &str,
        away: &str,
        date: NaiveDate,
        page: u32,
    ) -> Result<Page<EventSummary>> {
        if home.trim().is_empty() || away.trim().is_empty() {
            return Err(TableTennisError::validation(
                "home and away are both required for an event search",
            ));
        }
        let params = [
            ("page", checked_page(page)?.to_string()),
            ("home", home.to_string()),
            ("away", away.to_string()),
            ("time", date.format("%Y%m%d").to_string()),
        ];
        self.get_page::<WireEventSummary, _>(ApiVersion::V1, "events/search", &params)
            .await
    }

    /// Head-to-head and recent matches around one event (`event/history`).
    pub async fn get_event_history(&self, event_id: &str, qty: u32) -> Result<EventHistory> {
        if event_id.trim().is_empty() {
            return Err(TableTennisError::validation("event_id cannot be empty"));
        }
        if !(1..=MAX_HISTORY_QTY).contains(&qty) {
            return Err(TableTennisError::validation(format!(
                "qty must be between 1 and {MAX_HISTORY_QTY}"
            )));
        }
        let params = [("event_id", event_id.to_string()), ("qty", qty.to_string())];
        let envelope: Envelope<WireEventHistory> =
            self.get(ApiVersion::V1, "event/history", &params).await?;
        Ok(envelope.results.into())
    }

    pub async fn list_leagues(
        &self,
        country_code: Option<&str>,
        page: u32,
    ) -> Result<Page<League>> {
        let params = country_params(country_code, checked_page(page)?);
        self.get_page::<WireLeague, _>(ApiVersion::V1, "league", &params)
            .await
    }

    /// Every league, following the pager to the end.
    pub async fn list_all_leagues(&self, country_code: Option<&str>) -> Result<Vec<League>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let response = self.list_leagues(country_code, page).await?;
            let more = response.has_next_page();
            all.extend(response.results);
            if !more {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    /// Standings for leagues where [`League::supports_standings`] holds.
    pub async fn league_table(&self, league_id: &str) -> Result<Vec<Value>> {
        let params = [("league_id", league_id.to_string())];
        Ok(self
            .get::<Vec<Value>>(ApiVersion::V1, "league/table", &params)
            .await?
            .results)
    }

    /// Rankings for leagues where [`League::supports_rankings`] holds.
    pub async fn league_rankings(&self, league_id: &str) -> Result<Vec<Value>> {
        let params = [("league_id", league_id.to_string())];
        Ok(self
            .get::<Vec<Value>>(ApiVersion::V1, "league/toplist", &params)
            .await?
            .results)
    }

    pub async fn list_players(
        &self,
        country_code: Option<&str>,
        page: u32,
    ) -> Result<Page<Player>> {
        let params = country_params(country_code, checked_page(page)?);
        self.get_page::<WirePlayer, _>(ApiVersion::V2, "team", &params)
            .await
    }

    /// Every player, following the pager to the end. This is hundreds of calls
    /// without a country filter.
    pub async fn list_all_players(&self, country_code: Option<&str>) -> Result<Vec<Player>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let response = self.list_players(country_code, page).await?;
            let more = response.has_next_page();
            all.extend(response.results);
            if !more {
                break;
            }
            page += 1;
        }
        Ok(all)
    }

    /// Case-insensitive substring search over player names.
    ///
    /// Filters client side over at most [`PLAYER_SEARCH_MAX_PAGES`] pages. A
    /// failing page ends the search with whatever was found so far.
    pub async fn search_players(
        &self,
        query: &str,
        limit: usize,
        country_code: Option<&str>,
    ) -> Vec<Player> {
        let needle = query.to_lowercase();
        let mut found = Vec::new();
        let mut page = 1;

        while found.len() < limit && page <= PLAYER_SEARCH_MAX_PAGES {
            let response = match self.list_players(country_code, page).await {
                Ok(response) => response,
                Err(e) => {
                    debug!(page, error = %e, "player search stopped");
                    break;
                }
            };
            let more = response.has_next_page();
            found.extend(
                response
                    .results
                    .into_iter()
                    .filter(|p| p.name.to_lowercase().contains(&needle)),
            );
            if !more {
                break;
            }
            page += 1;
        }

        found.truncate(limit);
        found
    }

    /// One page of players without doubles pairs.
    pub async fn singles_players(
        &self,
        country_code: Option<&str>,
        page: u32,
    ) -> Result<Page<Player>> {
        Ok(self
            .list_players(country_code, page)
            .await?
            .filter(|p| !p.is_doubles_pair()))
    }

    pub async fn doubles_pairs(&self, country_code: Option<&str>, page: u32) -> Result<Page<Player>> {
        Ok(self
            .list_players(country_code, page)
            .await?
            .filter(Player::is_doubles_pair))
    }

    pub async fn players_with_images(
        &self,
        country_code: Option<&str>,
        page: u32,
    ) -> Result<Page<Player>> {
        Ok(self
            .list_players(country_code, page)
            .await?
            .filter(Player::has_image))
    }

    /// Odds history from one bookmaker (`event/odds`), keyed by market.
    pub async fn get_odds_detailed(&self, event_id: &str, source: Option<&str>) -> Result<OddsDetail> {
        let params = [
            ("event_id", event_id.to_string()),
            ("source", source.unwrap_or(DEFAULT_ODDS_SOURCE).to_string()),
        ];
        Ok(self
            .get::<OddsDetail>(ApiVersion::V2, "event/odds", &params)
            .await?
            .results)
    }
}

impl EndpointClient for TableTennisApi {
    async fn list_ended(&self, league_id: Option<&str>, page: u32) -> Result<Page<EventSummary>> {
        self.list_events("events/ended", league_id, page).await
    }

    async fn list_upcoming(
        &self,
        league_id: Option<&str>,
        page: u32,
    ) -> Result<Page<EventSummary>> {
        self.list_events("events/upcoming", league_id, page).await
    }

    async fn list_inplay(&self, league_id: Option<&str>, page: u32) -> Result<Page<EventSummary>> {
        self.list_events("events/inplay", league_id, page).await
    }

    async fn get_event_detail(&self, event_ids: &[String]) -> Result<Vec<Event>> {
        if event_ids.is_empty() {
            return Err(TableTennisError::validation("at least one event id is required"));
        }
        if event_ids.len() > MAX_DETAIL_IDS {
            return Err(TableTennisError::validation(format!(
                "at most {MAX_DETAIL_IDS} event ids per request"
            )));
        }
        let params = [("event_id", event_ids.join(","))];
        let envelope: Envelope<Vec<WireEvent>> =
            self.get(ApiVersion::V1, "event/view", &params).await?;
        Ok(envelope.results.into_iter().map(Event::from).collect())
    }

    async fn get_odds_summary(&self, event_id: &str) -> Result<OddsSummary> {
        let params = [("event_id", event_id.to_string())];
        Ok(self
            .get::<OddsSummary>(ApiVersion::V2, "event/odds/summary", &params)
            .await?
            .results)
    }
}

fn checked_page(page: u32) -> Result<u32> {
    if page == 0 {
        return Err(TableTennisError::validation("page number must be >= 1"));
    }
    Ok(page)
}

fn country_params(country_code: Option<&str>, page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", page.to_string())];
    if let Some(cc) = country_code.filter(|cc| !cc.is_empty()) {
        params.push(("cc", cc.to_lowercase()));
    }
    params
}

/// `success` is `1` on every good response; some proxies send it as a string.
fn is_success(body: &Value) -> bool {
    match body.get("success") {
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => s == "1",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}
