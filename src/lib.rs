//! B365 Table Tennis API Library
//!
//! A typed Rust client for the B365 table tennis API, with a bulk aggregation
//! layer that builds player histories, tournament snapshots and batched event
//! lookups on top of the paged single-resource endpoints.
//!
//! ## Features
//!
//! - **Endpoint Client**: events, leagues, players and odds with token and sport id injection
//! - **Rate Limit Tracking**: quota state read from `X-Ratelimit-*` headers
//! - **Player History**: recent matches, win rate, form and head-to-head records
//! - **Tournament Snapshot**: every match of a league across ended, upcoming and live
//! - **Bulk Resolution**: up to 100 event ids with optional detail and odds enrichment
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabletennis_api::{BulkDataExt, PlayerHistoryParams, TableTennisApi, TournamentParams};
//!
//! # async fn example() -> tabletennis_api::Result<()> {
//! let api = TableTennisApi::new("my-token")?;
//!
//! let history = api
//!     .get_player_history(PlayerHistoryParams::new("Jan Kocab").days(14))
//!     .await?;
//! println!("{} matches, form {:?}", history.total_matches, history.recent_form());
//!
//! let cup = api
//!     .get_tournament_complete(TournamentParams::new("29097").include_odds(true))
//!     .await?;
//! println!("{}: {:.0}% complete", cup.tournament_name, cup.completion_rate() * 100.0);
//!
//! let events = api.get_events_bulk(["10385512", "10382865"], false, true).await?;
//! println!("resolved {} events", events.len());
//! # Ok(())
//! # }
//! ```
//!
//! Aggregations never fail on network errors: failed sub-fetches are logged
//! through `tracing` and contribute nothing. Only invalid parameters are
//! returned as [`TableTennisError::Validation`].

pub mod aggregate;
pub mod b365;
pub mod core;
pub mod error;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types
pub use aggregate::{BulkDataExt, PlayerHistoryParams, TournamentParams};
pub use b365::{EndpointClient, TableTennisApi};
pub use crate::core::{ClientConfig, RateLimitInfo};
pub use error::{Result, TableTennisError};
pub use models::{
    Event, EventStatus, EventSummary, League, Page, PaginationInfo, Player, PlayerMatchHistory,
    TournamentData,
};
