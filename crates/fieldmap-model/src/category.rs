//! Record categories that partition the synonym dictionary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A record category.
///
/// Headers are only ever matched against dictionary entries of the category
/// currently being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The single primary subject of the upload (the company itself).
    Entity,
    /// Parties associated with the entity (shareholders, partners), one per row.
    RelatedParty,
}

impl Category {
    /// All categories, in resolution order.
    pub const ALL: [Category; 2] = [Category::Entity, Category::RelatedParty];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::RelatedParty => "related_party",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "entity" | "company" | "company_info" => Ok(Self::Entity),
            "related_party" | "shareholder" | "shareholder_info" => Ok(Self::RelatedParty),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}
