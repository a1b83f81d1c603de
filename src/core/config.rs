//! Client configuration.

use std::time::Duration;

use crate::{Result, TableTennisError};

/// Table tennis sport id on the B365 API.
pub const SPORT_ID: u32 = 92;

/// Default API root. A trailing version segment is accepted and ignored.
pub const DEFAULT_BASE_URL: &str = "https://api.b365api.com/v3/";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "tabletennis-api/0.3";

/// Endpoint prefixes that require `sport_id` in the query string.
const SPORT_SCOPED_PREFIXES: [&str; 4] = ["events/", "event/", "league", "team"];

/// API version segment. Endpoints are spread across v1, v2 and v3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
    V3,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }
}

/// Settings for [`TableTennisApi`](crate::b365::http::TableTennisApi).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tabletennis_api::core::ClientConfig;
///
/// let config = ClientConfig::new("my-token")
///     .with_base_url("https://api.b365api.com")
///     .with_timeout(Duration::from_secs(30));
///
/// assert_eq!(config.api_root(), "https://api.b365api.com");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject configurations that could never authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TableTennisError::MissingApiKey);
        }
        Ok(())
    }

    /// Base URL without trailing slash or version segment.
    pub fn api_root(&self) -> &str {
        let trimmed = self.base_url.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some((root, last)) if is_version_segment(last) => root,
            _ => trimmed,
        }
    }

    /// Full URL for `endpoint` under the given API version.
    pub fn endpoint_url(&self, version: ApiVersion, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_root(),
            version.as_str(),
            endpoint.trim_start_matches('/')
        )
    }
}

/// Whether the endpoint needs `sport_id` injected.
pub fn needs_sport_id(endpoint: &str) -> bool {
    let endpoint = endpoint.trim_start_matches('/');
    SPORT_SCOPED_PREFIXES
        .iter()
        .any(|prefix| endpoint.starts_with(prefix))
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}
