//! Core utilities for the table tennis API client
//!
//! This module consolidates plumbing shared by the HTTP client and the
//! aggregation layer:
//! - `config`: client configuration (token, base URL, timeout)
//! - `rate_limit`: rate-limit state parsed from response headers
//! - `util`: score parsing, odds conversion and name helpers

pub mod config;
pub mod rate_limit;
pub mod util;

// Re-export commonly used items for convenience
pub use config::{ApiVersion, ClientConfig, DEFAULT_BASE_URL, SPORT_ID};
pub use rate_limit::RateLimitInfo;
pub use util::{american_to_decimal, implied_probability, normalize_player_name, parse_score};
