//! Shared data model for the field mapping pipeline.

#![deny(unsafe_code)]

pub mod category;
pub mod dictionary;
pub mod error;
pub mod ids;
pub mod mapping;
pub mod processing;
pub mod records;
pub mod response;

pub use category::Category;
pub use dictionary::{DictionaryEntry, Synonyms};
pub use error::{ModelError, Result};
pub use ids::{OrganizationId, ProfileId};
pub use mapping::{ConfidenceLevel, ConfidenceThresholds, FieldMapping, MatchSource};
pub use processing::{ProcessingResult, ProcessingStats, UploadRequest};
pub use records::{EntityRecord, RelatedPartyRecord, parse_integer, parse_percentage};
pub use response::{ErrorCode, ErrorResponse, SuccessResponse, UploadResponse};
