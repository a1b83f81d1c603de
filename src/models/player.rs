//! Player model.

use serde::Serialize;

/// A table tennis player, or a doubles pair named `"A/B"`.
///
/// Doubles pairs are not a separate type: any name containing `/` is treated
/// as a pair. A singles player whose real name contains `/` would be
/// misclassified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub country_code: Option<String>,
    pub image_id: Option<String>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country_code: None,
            image_id: None,
        }
    }

    pub fn is_doubles_pair(&self) -> bool {
        self.name.contains('/')
    }

    pub fn has_image(&self) -> bool {
        self.image_id.is_some()
    }

    /// Individual names; a doubles pair splits on `/`.
    pub fn player_names(&self) -> Vec<&str> {
        if self.is_doubles_pair() {
            self.name.split('/').map(str::trim).collect()
        } else {
            vec![self.name.as_str()]
        }
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }
}
