//! Upload processing pipeline.
//!
//! # Stages
//!
//! 1. **Input checks** - organization id and payload present, size ceiling
//! 2. **Parsing** - decode, detect the delimiter, split rows
//! 3. **Profile lookup** - best effort; failures degrade to dictionary matching
//! 4. **Mapping** - every header is resolved once per category
//! 5. **Required gate** - every required entity field must have a header
//! 6. **Extraction** - entity from the first data row, related parties from all rows
//! 7. **Scoring** - mean confidence of the mapped headers and the review flag
//!
//! # Example
//!
//! ```ignore
//! use fieldmap_core::{Pipeline, PipelineOptions};
//! use fieldmap_map::SynonymDictionary;
//! use fieldmap_model::UploadRequest;
//!
//! let pipeline = Pipeline::new(SynonymDictionary::load_default()?, PipelineOptions::default());
//! let response = pipeline.handle(&UploadRequest::new("acme", bytes));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, error, info, info_span, warn};

use fieldmap_ingest::{RawTable, check_payload_size, parse_payload};
use fieldmap_map::{FieldMapper, MappingProfile, MappingProfileStore, ResolvedColumn, SynonymDictionary};
use fieldmap_model::{
    Category, FieldMapping, MatchSource, OrganizationId, ProcessingResult, ProcessingStats,
    UploadRequest, UploadResponse,
};

use crate::error::{PipelineError, Result};
use crate::extract::{extract_entity, extract_related_parties};
use crate::options::PipelineOptions;
use crate::validate::{aggregate_confidence, unfilled_required, unresolved_required};

/// Resolved columns of one upload, per category.
type Resolution = BTreeMap<Category, Vec<ResolvedColumn>>;

/// Turns uploads into [`ProcessingResult`]s.
///
/// A pipeline holds only read-only state and can be shared across threads.
pub struct Pipeline {
    mapper: FieldMapper,
    options: PipelineOptions,
    profiles: Option<Arc<dyn MappingProfileStore>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("mapper", &self.mapper)
            .field("options", &self.options)
            .field("profiles", &self.profiles.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn new(dictionary: SynonymDictionary, options: PipelineOptions) -> Self {
        Self {
            mapper: FieldMapper::new(dictionary, options.matcher),
            options,
            profiles: None,
        }
    }

    /// Consults `store` for an organization profile on every upload.
    #[must_use]
    pub fn with_profile_store(mut self, store: Arc<dyn MappingProfileStore>) -> Self {
        self.profiles = Some(store);
        self
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Processes an upload into a response, logging failures.
    pub fn handle(&self, request: &UploadRequest) -> UploadResponse {
        match self.process(request) {
            Ok(result) => UploadResponse::success(result),
            Err(err) => {
                let request_id = request.request_id.as_deref().unwrap_or("-");
                if let PipelineError::Internal(cause) = &err {
                    error!(
                        org = %request.organization_id,
                        request_id,
                        error = %format!("{cause:#}"),
                        "upload processing failed"
                    );
                } else {
                    info!(
                        org = %request.organization_id,
                        request_id,
                        code = err.code().as_str(),
                        "upload rejected: {err}"
                    );
                }
                err.to_response(request.request_id.clone()).into()
            }
        }
    }

    /// Processes an upload.
    pub fn process(&self, request: &UploadRequest) -> Result<ProcessingResult> {
        let span = info_span!("upload", org = %request.organization_id);
        let _guard = span.enter();

        let organization = require_organization(&request.organization_id)?;
        if request.payload.is_empty() {
            return Err(PipelineError::MissingInput("file"));
        }
        check_payload_size(request.payload.len() as u64, self.options.max_file_size)?;

        let table = parse_payload(&request.payload)?;
        let profile = self.lookup_profile(&organization);
        let resolution = self.resolve(&table, profile.as_ref())?;

        let dictionary = self.mapper.dictionary();
        let entity_columns = columns_of(&resolution, Category::Entity);
        let entity_required = dictionary.required_fields(Category::Entity);
        let missing = unresolved_required(&entity_required, entity_columns);
        if !missing.is_empty() {
            return Err(PipelineError::MissingRequiredFields { missing });
        }

        if table.rows.is_empty() {
            return Err(PipelineError::InvalidRecord(
                "the file has a header row but no data rows".to_string(),
            ));
        }
        let entity = extract_entity(&table, entity_columns);
        let unfilled = unfilled_required(&entity_required, &entity);
        if !unfilled.is_empty() {
            return Err(PipelineError::InvalidRecord(format!(
                "the first data row has no usable value for: {}",
                unfilled.join(", ")
            )));
        }
        let related_parties =
            extract_related_parties(&table, columns_of(&resolution, Category::RelatedParty));

        let (mapped_fields, unmapped_columns) = summarize_columns(&table.headers, &resolution);
        let confidence_score = aggregate_confidence(mapped_fields.values());
        let needs_review = self.options.matcher.thresholds.needs_review(confidence_score);

        let mapping_profile_used = profile
            .filter(|_| {
                resolution
                    .values()
                    .flatten()
                    .any(|column| column.mapping.source == MatchSource::Profile)
            })
            .map(|profile| profile.profile_id);

        let stats = self.stats(&table, &resolution, mapped_fields.len(), confidence_score);
        info!(
            columns = stats.total_columns,
            mapped = stats.mapped_columns,
            unmapped = unmapped_columns.len(),
            rows = stats.data_rows,
            related_parties = related_parties.len(),
            confidence = confidence_score,
            needs_review,
            "processed upload"
        );

        Ok(ProcessingResult {
            confidence_score,
            needs_review,
            mapped_fields,
            unmapped_columns,
            mapping_profile_used,
            entity,
            related_parties,
            stats,
        })
    }

    fn lookup_profile(&self, organization: &OrganizationId) -> Option<MappingProfile> {
        let store = self.profiles.as_ref()?;
        match store.latest(organization) {
            Ok(Some(profile)) => {
                debug!(
                    profile = %profile.profile_id,
                    fields = profile.len(),
                    "using organization mapping profile"
                );
                Some(profile)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(
                    error = %format!("{err:#}"),
                    "profile lookup failed; falling back to dictionary matching"
                );
                None
            }
        }
    }

    fn resolve(&self, table: &RawTable, profile: Option<&MappingProfile>) -> Result<Resolution> {
        let mut resolution = Resolution::new();
        for category in Category::ALL {
            if self
                .mapper
                .dictionary()
                .entries_for(category)
                .next()
                .is_none()
            {
                return Err(PipelineError::Internal(anyhow!(
                    "synonym dictionary has no {category} fields"
                )));
            }
            let columns = self.mapper.resolve(&table.headers, category, profile);
            for column in &columns {
                debug!(
                    category = category.as_str(),
                    header = %column.mapping.detected,
                    canonical = %column.mapping.canonical,
                    source = column.mapping.source.as_str(),
                    confidence = column.mapping.confidence_score,
                    "mapped header"
                );
            }
            resolution.insert(category, columns);
        }
        Ok(resolution)
    }

    fn stats(
        &self,
        table: &RawTable,
        resolution: &Resolution,
        mapped_columns: usize,
        average_confidence: f64,
    ) -> ProcessingStats {
        let dictionary = self.mapper.dictionary();
        let (required_fields_mapped, required_fields_total) =
            Category::ALL
                .into_iter()
                .fold((0, 0), |(mapped, total), category| {
                    let required = dictionary.required_fields(category);
                    let missing =
                        unresolved_required(&required, columns_of(resolution, category)).len();
                    (mapped + required.len() - missing, total + required.len())
                });
        ProcessingStats {
            total_columns: table.column_count(),
            mapped_columns,
            required_fields_mapped,
            required_fields_total,
            average_confidence,
            data_rows: table.row_count(),
        }
    }
}

/// The organization id of a request; blank ids are missing input.
pub fn require_organization(organization_id: &str) -> Result<OrganizationId> {
    OrganizationId::new(organization_id).map_err(|_| PipelineError::MissingInput("organization id"))
}

fn columns_of(resolution: &Resolution, category: Category) -> &[ResolvedColumn] {
    resolution
        .get(&category)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Splits headers into the mapped table and the unmapped list.
///
/// Each column keeps its best mapping across categories; on equal scores the
/// earlier category wins. A repeated header is reported once as mapped and
/// its later copies as unmapped, so every header lands in exactly one side.
fn summarize_columns(
    headers: &[String],
    resolution: &Resolution,
) -> (BTreeMap<String, FieldMapping>, Vec<String>) {
    let mut best: Vec<Option<&FieldMapping>> = vec![None; headers.len()];
    for category in Category::ALL {
        for column in columns_of(resolution, category) {
            let Some(slot) = best.get_mut(column.index) else {
                continue;
            };
            let better = slot
                .is_none_or(|current| column.mapping.confidence_score > current.confidence_score);
            if better {
                *slot = Some(&column.mapping);
            }
        }
    }

    let mut mapped_fields = BTreeMap::new();
    let mut unmapped_columns = Vec::new();
    for (header, mapping) in headers.iter().zip(best) {
        match mapping {
            Some(mapping) if !mapped_fields.contains_key(header) => {
                mapped_fields.insert(header.clone(), mapping.clone());
            }
            _ => unmapped_columns.push(header.clone()),
        }
    }
    (mapped_fields, unmapped_columns)
}
