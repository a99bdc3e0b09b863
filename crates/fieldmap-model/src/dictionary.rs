//! Synonym dictionary entry types.

use serde::{Deserialize, Serialize};

use crate::Category;

/// Alternate spellings of a canonical field, per supported language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonyms {
    /// Spanish spellings.
    #[serde(default)]
    pub es: Vec<String>,
    /// English spellings.
    #[serde(default)]
    pub en: Vec<String>,
}

impl Synonyms {
    pub fn new(es: Vec<String>, en: Vec<String>) -> Self {
        Self { es, en }
    }

    /// Both languages pooled, Spanish first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.es.iter().chain(self.en.iter()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.es.len() + self.en.len()
    }

    pub fn is_empty(&self) -> bool {
        self.es.is_empty() && self.en.is_empty()
    }
}

/// One canonical field of the synonym dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Canonical field identifier, unique within its category.
    pub canonical: String,
    pub synonyms: Synonyms,
    /// Whether a record of this category needs the field to be valid.
    pub required: bool,
    pub category: Category,
}
