//! B365 API access: wire types, the endpoint contract and the HTTP client.

pub mod endpoints;
pub mod http;
pub mod types;

pub use endpoints::{EndpointClient, MAX_DETAIL_IDS};
pub use http::TableTennisApi;
