//! Error types for the table tennis API client

use chrono::{DateTime, Utc};
use thiserror::Error;


pub type Result<T> = std::result::Result<T, TableTennisError>;

#[derive(Error, Debug)]
pub enum TableTennisError {
    /// Caller input rejected before any request was made.
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("API key is required")]
    MissingApiKey,

    #[error("Invalid API token")]
    Authentication,

    #[error("Rate limit exceeded. Resets at: {}", format_reset(.reset))]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("API server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("API request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// The API answered 2xx but flagged the call as unsuccessful.
    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TableTennisError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        TableTennisError::Validation(message.into())
    }

    /// True for errors raised from caller input rather than from the remote API.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TableTennisError::Validation(_) | TableTennisError::MissingApiKey
        )
    }
}

fn format_reset(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => at.to_rfc3339(),
        None => "unknown".to_string(),
    }
}
