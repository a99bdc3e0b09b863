//! Builds a pipeline from command-line sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use fieldmap_core::{Pipeline, PipelineError, PipelineOptions, require_organization};
use fieldmap_ingest::{IngestError, read_upload};
use fieldmap_map::{FileProfileStore, SynonymDictionary};
use fieldmap_model::{ConfidenceThresholds, UploadRequest, UploadResponse};

/// Where the pipeline's dictionary, options and profiles come from.
#[derive(Debug, Clone, Default)]
pub struct PipelineSources {
    pub dictionary: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Replaces the thresholds read from `config`.
    pub thresholds: Option<ConfidenceThresholds>,
    pub profiles: Option<PathBuf>,
}

/// Explicit path, else `FIELDMAP_DICTIONARY`, else the built-in dictionary.
pub fn load_dictionary(path: Option<&Path>) -> Result<SynonymDictionary> {
    match path {
        Some(path) => SynonymDictionary::from_path(path)
            .with_context(|| format!("load dictionary {}", path.display())),
        None => SynonymDictionary::load_default().context("load synonym dictionary"),
    }
}

pub fn load_options(path: Option<&Path>) -> Result<PipelineOptions> {
    match path {
        Some(path) => PipelineOptions::from_path(path),
        None => Ok(PipelineOptions::default()),
    }
}

pub fn build_pipeline(sources: &PipelineSources) -> Result<Pipeline> {
    let dictionary = load_dictionary(sources.dictionary.as_deref())?;
    let mut options = load_options(sources.config.as_deref())?;
    if let Some(thresholds) = sources.thresholds {
        options.matcher.thresholds = thresholds;
    }
    let mut pipeline = Pipeline::new(dictionary, options);
    if let Some(dir) = &sources.profiles {
        pipeline = pipeline.with_profile_store(Arc::new(FileProfileStore::new(dir)));
    }
    Ok(pipeline)
}

/// Reads and processes one file.
///
/// The organization id is checked before the file is touched. An oversized
/// file becomes a `FILE_TOO_LARGE` response; other read failures are
/// command errors.
pub fn process_file(
    pipeline: &Pipeline,
    path: &Path,
    organization: &str,
    request_id: Option<String>,
) -> Result<UploadResponse> {
    if let Err(error) = require_organization(organization) {
        return Ok(error.to_response(request_id).into());
    }
    let payload = match read_upload(path, pipeline.options().max_file_size) {
        Ok(payload) => payload,
        Err(error @ IngestError::FileTooLarge { .. }) => {
            return Ok(PipelineError::from(error).to_response(request_id).into());
        }
        Err(error) => {
            return Err(error).with_context(|| format!("read upload {}", path.display()));
        }
    };
    let mut request = UploadRequest::new(organization, payload);
    request.request_id = request_id;
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        request = request.with_file_name(name);
    }
    Ok(pipeline.handle(&request))
}
