//! Rate-limit bookkeeping from `X-Ratelimit-*` response headers.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Serialize;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Below this many remaining requests the client reports itself as rate limited.
pub const LOW_REMAINING_THRESHOLD: u32 = 10;

/// Last known quota state. Fields stay `None` until a response carries them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset_time: Option<DateTime<Utc>>,
}

impl RateLimitInfo {
    /// Overwrite fields present in `headers`; absent headers keep their value.
    pub fn update_from_headers(&mut self, headers: &HeaderMap) {
        if let Some(limit) = header_u32(headers, LIMIT_HEADER) {
            self.limit = Some(limit);
        }
        if let Some(remaining) = header_u32(headers, REMAINING_HEADER) {
            self.remaining = Some(remaining);
        }
        if let Some(reset) = header_i64(headers, RESET_HEADER) {
            if let Some(at) = DateTime::from_timestamp(reset, 0) {
                self.reset_time = Some(at);
            }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.remaining
            .map(|remaining| remaining < LOW_REMAINING_THRESHOLD)
            .unwrap_or(false)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok().map(str::trim)
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    header_str(headers, name)?.parse().ok()
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    header_str(headers, name)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, HeaderValue::from_static(v));
        }
        h
    }

    #[test]
    fn test_default_is_unknown() {
        let info = RateLimitInfo::default();
        assert_eq!(info.limit, None);
        assert_eq!(info.remaining, None);
        assert_eq!(info.reset_time, None);
        assert!(!info.is_rate_limited());
    }

    #[test]
    fn test_update_from_headers() {
        let mut info = RateLimitInfo::default();
        info.update_from_headers(&headers(&[
            ("x-ratelimit-limit", "3600"),
            ("x-ratelimit-remaining", "3595"),
            ("x-ratelimit-reset", "1753912800"),
        ]));

        assert_eq!(info.limit, Some(3600));
        assert_eq!(info.remaining, Some(3595));
        assert_eq!(
            info.reset_time,
            Some(Utc.with_ymd_and_hms(2025, 7, 30, 22, 0, 0).unwrap())
        );
        assert!(!info.is_rate_limited());
    }

    #[test]
    fn test_partial_headers_keep_previous_values() {
        let mut info = RateLimitInfo {
            limit: Some(3600),
            remaining: Some(100),
            reset_time: None,
        };
        info.update_from_headers(&headers(&[("x-ratelimit-remaining", "9")]));

        assert_eq!(info.limit, Some(3600));
        assert_eq!(info.remaining, Some(9));
        assert!(info.is_rate_limited());
    }

    #[test]
    fn test_malformed_headers_ignored() {
        let mut info = RateLimitInfo::default();
        info.update_from_headers(&headers(&[
            ("x-ratelimit-limit", "lots"),
            ("x-ratelimit-remaining", "-1"),
        ]));
        assert_eq!(info, RateLimitInfo::default());
    }

    #[test]
    fn test_threshold_boundary() {
        let at = |remaining| RateLimitInfo {
            remaining: Some(remaining),
            ..Default::default()
        };
        assert!(at(0).is_rate_limited());
        assert!(at(9).is_rate_limited());
        assert!(!at(10).is_rate_limited());
    }
}
