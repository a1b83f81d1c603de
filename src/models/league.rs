//! League (tournament) model.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub country_code: Option<String>,
    pub has_leaguetable: bool,
    pub has_toplist: bool,
}

impl League {
    /// Whether `league/table` returns standings for this league.
    pub fn supports_standings(&self) -> bool {
        self.has_leaguetable
    }

    /// Whether `league/toplist` returns player rankings for this league.
    pub fn supports_rankings(&self) -> bool {
        self.has_toplist
    }
}
