use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::ProfileId;
use crate::mapping::{ConfidenceLevel, ConfidenceThresholds, FieldMapping};
use crate::records::{EntityRecord, RelatedPartyRecord};

/// A single upload to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Tenant the upload belongs to; selects the mapping profile.
    pub organization_id: String,
    pub user_id: Option<String>,
    pub file_name: Option<String>,
    /// Raw file content.
    #[serde(default)]
    pub payload: Vec<u8>,
    /// Caller-supplied correlation id, echoed in error responses.
    pub request_id: Option<String>,
}

impl UploadRequest {
    pub fn new(organization_id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            organization_id: organization_id.into(),
            payload: payload.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_columns: usize,
    pub mapped_columns: usize,
    /// Required canonical fields (all categories) resolved from some header.
    pub required_fields_mapped: usize,
    pub required_fields_total: usize,
    pub average_confidence: f64,
    pub data_rows: usize,
}

/// Output of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Mean confidence of every resolved header.
    pub confidence_score: f64,
    pub needs_review: bool,
    /// Raw header to its resolved mapping.
    pub mapped_fields: BTreeMap<String, FieldMapping>,
    /// Raw headers without an acceptable match, in column order.
    pub unmapped_columns: Vec<String>,
    pub mapping_profile_used: Option<ProfileId>,
    pub entity: EntityRecord,
    pub related_parties: Vec<RelatedPartyRecord>,
    pub stats: ProcessingStats,
}

impl ProcessingResult {
    /// Returns mappings grouped by their confidence level.
    #[must_use]
    pub fn group_by_level(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, Vec<&FieldMapping>> {
        let mut groups: BTreeMap<ConfidenceLevel, Vec<&FieldMapping>> = BTreeMap::new();
        for mapping in self.mapped_fields.values() {
            if let Some(level) = mapping.level(thresholds) {
                groups.entry(level).or_default().push(mapping);
            }
        }
        groups
    }
}
