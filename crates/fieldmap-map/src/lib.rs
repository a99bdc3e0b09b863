//! Header normalization, the synonym dictionary, and header-to-field mapping.
//!
//! - [`normalize_header`] turns raw headers into comparison keys
//! - [`similarity`] scores two keys by Levenshtein distance
//! - [`SynonymDictionary`] holds the canonical fields per category
//! - [`FieldMapper`] resolves headers (profile, exact, synonym, fuzzy)
//! - [`MappingProfileStore`] persists approved per-organization mappings

#![deny(unsafe_code)]

pub mod dictionary;
pub mod error;
pub mod mapper;
pub mod normalize;
pub mod profile;
pub mod repository;
pub mod similarity;

pub use dictionary::{DICTIONARY_ENV_VAR, EMBEDDED_DICTIONARY, SynonymDictionary};
pub use error::{DictionaryError, Result};
pub use mapper::{FieldMapper, MatcherConfig, ResolvedColumn};
pub use normalize::normalize_header;
pub use profile::{InMemoryProfileStore, MappingProfile, MappingProfileStore, ProfileField};
pub use repository::{FileProfileStore, ProfileMetadata};
pub use similarity::similarity;
